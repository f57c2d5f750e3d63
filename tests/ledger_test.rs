use chrono::NaiveDate;
use farmledger::db;
use farmledger::domain::{DomainError, PaymentStatus, Principal};
use farmledger::infrastructure::seed::DefaultData;
use farmledger::models::{boat, customer, product_type, sale};
use farmledger::services::boat_service::{self, BoatInput};
use farmledger::services::expense_service::{self, ExpenseInput};
use farmledger::services::purchase_service::{self, PurchaseInput, PurchaseUpdate};
use farmledger::services::sale_service::{self, SaleInput, SaleUpdate};
use farmledger::services::tenant_service::{self, RegisterAdminInput};
use farmledger::services::{customer_service, product_type_service};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::str::FromStr;

struct Tenant {
    principal: Principal,
    boat: boat::Model,
    customer: customer::Model,
    product_type: product_type::Model,
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn tenant(db: &DatabaseConnection, suffix: &str) -> Tenant {
    let registered = tenant_service::register_admin(
        db,
        RegisterAdminInput {
            name: format!("Admin {suffix}"),
            email: format!("admin{suffix}@example.com"),
            phone: format!("09000000{suffix}"),
            password: "secret1".to_string(),
            password_confirmation: "secret1".to_string(),
            farm_name: format!("Farm {suffix}"),
            farm_address: "Cảng cá".to_string(),
            farm_phone: "0911111111".to_string(),
            farm_description: None,
        },
        &DefaultData::standard(),
    )
    .await
    .expect("registration failed");

    let principal = tenant_service::resolve_principal(db, registered.user.id)
        .await
        .unwrap();
    let boat = boat_service::create(
        db,
        &principal,
        BoatInput {
            name: format!("Boat {suffix}"),
            owner_name: "Ông Năm".to_string(),
            phone: "0922222222".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let customer = customer_service::list(db, &principal).await.unwrap().remove(0);
    let product_type = product_type_service::list(db, &principal).await.unwrap().remove(0);

    Tenant {
        principal,
        boat,
        customer,
        product_type,
    }
}

fn sale_input(t: &Tenant, weight: &str, unit_price: &str, status: PaymentStatus) -> SaleInput {
    SaleInput {
        customer_id: t.customer.id,
        product_type_id: t.product_type.id,
        weight: dec(weight),
        unit_price: dec(unit_price),
        sale_date: day("2024-05-10"),
        payment_status: status,
        notes: None,
    }
}

fn purchase_input(t: &Tenant, weight: &str, unit_price: &str) -> PurchaseInput {
    PurchaseInput {
        boat_id: t.boat.id,
        product_type_id: t.product_type.id,
        weight: dec(weight),
        unit_price: dec(unit_price),
        purchase_date: day("2024-05-10"),
        notes: None,
    }
}

#[tokio::test]
async fn sale_total_follows_weight_and_price() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    let created = sale_service::create(&db, &t.principal, sale_input(&t, "100.00", "150000.00", PaymentStatus::Unpaid))
        .await
        .unwrap();
    assert_eq!(created.total_amount, dec("15000000.00"));
    assert_eq!(created.customer.as_ref().map(|c| c.id), Some(t.customer.id));

    let updated = sale_service::update(
        &db,
        &t.principal,
        created.id,
        SaleUpdate {
            weight: Some(dec("50.00")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.unit_price, dec("150000.00"));
    assert_eq!(updated.total_amount, dec("7500000.00"));

    let stored = sale::Entity::find_by_id(created.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.weight, "50.00");
    assert_eq!(stored.total_amount, "7500000.00");
}

#[tokio::test]
async fn caller_supplied_total_is_ignored() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;
    let created = sale_service::create(&db, &t.principal, sale_input(&t, "50.00", "10.00", PaymentStatus::Paid))
        .await
        .unwrap();

    let update: SaleUpdate = serde_json::from_value(serde_json::json!({
        "unit_price": "200.00",
        "total_amount": "1.00"
    }))
    .unwrap();
    let updated = sale_service::update(&db, &t.principal, created.id, update).await.unwrap();
    assert_eq!(updated.weight, dec("50.00"));
    assert_eq!(updated.total_amount, dec("10000.00"));
}

#[tokio::test]
async fn purchase_total_follows_partial_updates() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    let created = purchase_service::create(&db, &t.principal, purchase_input(&t, "12.50", "80000.00"))
        .await
        .unwrap();
    assert_eq!(created.total_amount, dec("1000000.00"));
    assert_eq!(created.boat.as_ref().map(|b| b.id), Some(t.boat.id));

    let updated = purchase_service::update(
        &db,
        &t.principal,
        created.id,
        PurchaseUpdate {
            unit_price: Some(dec("90000.00")),
            notes: Some("second haul".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.weight, dec("12.50"));
    assert_eq!(updated.total_amount, dec("1125000.00"));
    assert_eq!(updated.notes.as_deref(), Some("second haul"));
}

#[tokio::test]
async fn amounts_are_validated() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    match sale_service::create(&db, &t.principal, sale_input(&t, "-1.00", "10.00", PaymentStatus::Paid)).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("weight")),
        other => panic!("expected validation error, got {other:?}"),
    }
    match purchase_service::create(&db, &t.principal, purchase_input(&t, "1.00", "10.001")).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("unit_price")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let created = purchase_service::create(&db, &t.principal, purchase_input(&t, "1.00", "10.00"))
        .await
        .unwrap();
    let result = purchase_service::update(
        &db,
        &t.principal,
        created.id,
        PurchaseUpdate {
            weight: Some(dec("-3")),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn oversized_amounts_are_rejected_not_overflowed() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    let huge = sale_input(&t, "1000000000000000", "1000000000000000", PaymentStatus::Unpaid);
    match sale_service::create(&db, &t.principal, huge).await {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.contains_key("weight"));
            assert!(errors.contains_key("unit_price"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // each factor fits its column, the product does not
    let widest = purchase_input(&t, "99999999.99", "9999999999999.99");
    match purchase_service::create(&db, &t.principal, widest).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("total_amount")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let created = sale_service::create(&db, &t.principal, sale_input(&t, "100.00", "10.00", PaymentStatus::Paid))
        .await
        .unwrap();
    let result = sale_service::update(
        &db,
        &t.principal,
        created.id,
        SaleUpdate {
            unit_price: Some(dec("9999999999999.99")),
            ..Default::default()
        },
    )
    .await;
    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("total_amount")),
        other => panic!("expected validation error, got {other:?}"),
    }
    let stored = sale::Entity::find_by_id(created.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.total_amount, "1000.00");
}

#[tokio::test]
async fn business_dates_need_four_digit_years() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    let mut input = sale_input(&t, "1.00", "5.00", PaymentStatus::Paid);
    input.sale_date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    match sale_service::create(&db, &t.principal, input).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("sale_date")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let created = purchase_service::create(&db, &t.principal, purchase_input(&t, "1.00", "1.00"))
        .await
        .unwrap();
    let result = purchase_service::update(
        &db,
        &t.principal,
        created.id,
        PurchaseUpdate {
            purchase_date: Some(NaiveDate::MAX),
            ..Default::default()
        },
    )
    .await;
    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("purchase_date")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let expense = ExpenseInput {
        expense_type: "fuel".to_string(),
        amount: dec("10.00"),
        expense_date: NaiveDate::from_ymd_opt(10000, 1, 1).unwrap(),
        notes: None,
    };
    match expense_service::create(&db, &t.principal, expense).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("expense_date")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_required_text_is_rejected() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;

    let blank_boat = BoatInput {
        name: "   ".to_string(),
        owner_name: "Ông Năm".to_string(),
        phone: " ".to_string(),
        description: None,
    };
    match boat_service::create(&db, &t.principal, blank_boat).await {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.contains_key("name"));
            assert!(errors.contains_key("phone"));
            assert!(!errors.contains_key("owner_name"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let blank_expense = ExpenseInput {
        expense_type: "\t ".to_string(),
        amount: dec("10.00"),
        expense_date: day("2024-05-10"),
        notes: None,
    };
    match expense_service::create(&db, &t.principal, blank_expense).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("expense_type")),
        other => panic!("expected validation error, got {other:?}"),
    }

    assert_eq!(boat_service::list(&db, &t.principal).await.unwrap().len(), 1);
    assert!(expense_service::list(&db, &t.principal).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_reference_change_leaves_sale_untouched() {
    let db = setup_test_db().await;
    let t1 = tenant(&db, "01").await;
    let t2 = tenant(&db, "02").await;

    let created = sale_service::create(&db, &t1.principal, sale_input(&t1, "2.00", "3.00", PaymentStatus::Unpaid))
        .await
        .unwrap();
    let result = sale_service::update(
        &db,
        &t1.principal,
        created.id,
        SaleUpdate {
            weight: Some(dec("4.00")),
            product_type_id: Some(t2.product_type.id),
            ..Default::default()
        },
    )
    .await;
    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("product_type_id")),
        other => panic!("expected validation error, got {other:?}"),
    }

    // the connection is usable again and the row kept its values
    let stored = sale_service::get(&db, &t1.principal, created.id).await.unwrap();
    assert_eq!(stored.weight, dec("2.00"));
    assert_eq!(stored.product_type_id, t1.product_type.id);
    assert_eq!(stored.total_amount, dec("6.00"));
}

#[tokio::test]
async fn cross_tenant_references_are_rejected() {
    let db = setup_test_db().await;
    let t1 = tenant(&db, "01").await;
    let t2 = tenant(&db, "02").await;

    let mut input = sale_input(&t1, "1.00", "1.00", PaymentStatus::Paid);
    input.customer_id = t2.customer.id;
    match sale_service::create(&db, &t1.principal, input).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("customer_id")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let mut input = purchase_input(&t1, "1.00", "1.00");
    input.product_type_id = t2.product_type.id;
    match purchase_service::create(&db, &t1.principal, input).await {
        Err(DomainError::Validation(errors)) => assert!(errors.contains_key("product_type_id")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let created = purchase_service::create(&db, &t1.principal, purchase_input(&t1, "1.00", "1.00"))
        .await
        .unwrap();
    let result = purchase_service::update(
        &db,
        &t1.principal,
        created.id,
        PurchaseUpdate {
            boat_id: Some(t2.boat.id),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn foreign_records_cannot_be_changed() {
    let db = setup_test_db().await;
    let t1 = tenant(&db, "01").await;
    let t2 = tenant(&db, "02").await;
    let sale = sale_service::create(&db, &t2.principal, sale_input(&t2, "2.00", "5.00", PaymentStatus::Unpaid))
        .await
        .unwrap();

    assert!(matches!(
        sale_service::get(&db, &t1.principal, sale.id).await,
        Err(DomainError::Authorization)
    ));
    assert!(matches!(
        sale_service::update_payment_status(&db, &t1.principal, sale.id, PaymentStatus::Paid).await,
        Err(DomainError::Authorization)
    ));
    assert!(matches!(
        sale_service::delete(&db, &t1.principal, sale.id).await,
        Err(DomainError::Authorization)
    ));
    assert!(matches!(
        boat_service::delete(&db, &t1.principal, t2.boat.id).await,
        Err(DomainError::Authorization)
    ));

    let untouched = sale_service::get(&db, &t2.principal, sale.id).await.unwrap();
    assert_eq!(untouched.payment_status, PaymentStatus::Unpaid);
    assert!(sale_service::list(&db, &t1.principal).await.unwrap().is_empty());
}

#[tokio::test]
async fn referenced_reference_data_cannot_be_deleted() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;
    let purchase = purchase_service::create(&db, &t.principal, purchase_input(&t, "1.00", "1.00"))
        .await
        .unwrap();
    let sale = sale_service::create(&db, &t.principal, sale_input(&t, "1.00", "1.00", PaymentStatus::Paid))
        .await
        .unwrap();

    assert!(matches!(
        boat_service::delete(&db, &t.principal, t.boat.id).await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        customer_service::delete(&db, &t.principal, t.customer.id).await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        product_type_service::delete(&db, &t.principal, t.product_type.id).await,
        Err(DomainError::Conflict(_))
    ));

    // records and their references are intact
    let details = boat_service::get(&db, &t.principal, t.boat.id).await.unwrap();
    assert_eq!(details.purchases.len(), 1);
    let details = customer_service::get(&db, &t.principal, t.customer.id).await.unwrap();
    assert_eq!(details.sales.len(), 1);
    let details = product_type_service::get(&db, &t.principal, t.product_type.id).await.unwrap();
    assert_eq!((details.purchases.len(), details.sales.len()), (1, 1));

    purchase_service::delete(&db, &t.principal, purchase.id).await.unwrap();
    sale_service::delete(&db, &t.principal, sale.id).await.unwrap();
    boat_service::delete(&db, &t.principal, t.boat.id).await.unwrap();
    customer_service::delete(&db, &t.principal, t.customer.id).await.unwrap();
    product_type_service::delete(&db, &t.principal, t.product_type.id).await.unwrap();
}

#[tokio::test]
async fn payment_status_change_keeps_amounts() {
    let db = setup_test_db().await;
    let t = tenant(&db, "01").await;
    let sale = sale_service::create(&db, &t.principal, sale_input(&t, "3.00", "7.00", PaymentStatus::Unpaid))
        .await
        .unwrap();

    let paid = sale_service::update_payment_status(&db, &t.principal, sale.id, PaymentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.total_amount, dec("21.00"));
    assert_eq!(paid.weight, sale.weight);
}

#[tokio::test]
async fn expense_types_are_distinct_sorted_and_scoped() {
    let db = setup_test_db().await;
    let t1 = tenant(&db, "01").await;
    let t2 = tenant(&db, "02").await;

    for (t, expense_type) in [(&t1, "ice"), (&t1, "fuel"), (&t1, "ice"), (&t2, "wages")] {
        expense_service::create(
            &db,
            &t.principal,
            ExpenseInput {
                expense_type: expense_type.to_string(),
                amount: dec("100.00"),
                expense_date: day("2024-05-10"),
                notes: None,
            },
        )
        .await
        .unwrap();
    }

    let types = expense_service::list_expense_types(&db, &t1.principal).await.unwrap();
    assert_eq!(types, vec!["fuel".to_string(), "ice".to_string()]);
    assert_eq!(expense_service::list(&db, &t1.principal).await.unwrap().len(), 3);
    assert_eq!(expense_service::list(&db, &t2.principal).await.unwrap().len(), 1);
}

#[tokio::test]
async fn purchase_options_list_own_farm_choices() {
    let db = setup_test_db().await;
    let t1 = tenant(&db, "01").await;
    tenant(&db, "02").await;

    let options = purchase_service::options(&db, &t1.principal).await.unwrap();
    assert_eq!(options.boats.len(), 1);
    assert_eq!(options.boats[0].id, t1.boat.id);
    assert_eq!(options.product_types.len(), 3);
}
