use chrono::{Duration, Local};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::domain::{DomainError, PaymentStatus, Principal, Role};
use crate::models::user::{self, Entity as User};
use crate::services::customer_service::{self, CustomerInput};
use crate::services::product_type_service::{self, ProductTypeInput};
use crate::services::tenant_service::{self, NewUser, RegisterAdminInput};
use crate::services::{boat_service, expense_service, purchase_service, sale_service};

/// Reference data given to every newly registered farm
#[derive(Debug, Clone)]
pub struct DefaultData {
    pub product_types: Vec<ProductTypeInput>,
    pub customers: Vec<CustomerInput>,
}

impl DefaultData {
    pub fn standard() -> Self {
        let product_types = [
            ("Mực ống", "Mực ống tươi sống"),
            ("Mực nang", "Mực nang tươi sống"),
            ("Mực lá", "Mực lá tươi sống"),
        ]
        .into_iter()
        .map(|(name, description)| ProductTypeInput {
            name: name.to_string(),
            description: Some(description.to_string()),
            unit: Some("kg".to_string()),
        })
        .collect();

        let customers = [
            (
                "Nhà hàng Hải Sản Xanh",
                "0123456789",
                "123 Đường Biển, Quận 1, TP.HCM",
                "Nhà hàng chuyên về hải sản",
            ),
            (
                "Công ty Thực Phẩm Sạch",
                "0987654321",
                "456 Đường Thủy Sản, Quận 4, TP.HCM",
                "Công ty phân phối thực phẩm",
            ),
            (
                "Chợ Hải Sản Trung Tâm",
                "0369852147",
                "789 Đường Chợ, Quận 5, TP.HCM",
                "Chợ đầu mối hải sản",
            ),
        ]
        .into_iter()
        .map(|(name, phone, address, description)| CustomerInput {
            name: name.to_string(),
            phone: phone.to_string(),
            address: Some(address.to_string()),
            description: Some(description.to_string()),
        })
        .collect();

        Self {
            product_types,
            customers,
        }
    }

    /// Insert the catalog for one farm. Runs inside the caller's transaction.
    pub async fn seed_farm<C: ConnectionTrait>(
        &self,
        conn: &C,
        farm_id: i32,
    ) -> Result<(), DomainError> {
        for input in &self.product_types {
            product_type_service::insert(conn, farm_id, input.clone()).await?;
        }
        for input in &self.customers {
            customer_service::insert(conn, farm_id, input.clone()).await?;
        }
        Ok(())
    }
}

const DEMO_ADMIN_PHONE: &str = "0900000000";

/// Demo farm with a few days of activity in the current month, plus one staff
/// account attached to it. Skipped when the demo admin already exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    let existing = User::find()
        .filter(user::Column::Phone.eq(DEMO_ADMIN_PHONE))
        .count(db)
        .await?;
    if existing > 0 {
        tracing::debug!("demo data already present");
        return Ok(());
    }

    let registered = tenant_service::register_admin(
        db,
        RegisterAdminInput {
            name: "Demo Admin".to_string(),
            email: "demo@farmledger.local".to_string(),
            phone: DEMO_ADMIN_PHONE.to_string(),
            password: "demo123".to_string(),
            password_confirmation: "demo123".to_string(),
            farm_name: "Trại Demo".to_string(),
            farm_address: "Cảng cá Demo".to_string(),
            farm_phone: "0900000001".to_string(),
            farm_description: None,
        },
        &DefaultData::standard(),
    )
    .await?;

    let principal = Principal {
        id: registered.user.id,
        role: Role::Admin,
        farm_id: Some(registered.farm.id),
    };

    tenant_service::create_user(
        db,
        NewUser {
            name: "Demo Staff".to_string(),
            email: "staff@farmledger.local".to_string(),
            phone: "0900000002".to_string(),
            password: "staff123".to_string(),
            role: Role::Staff,
            farm_id: Some(registered.farm.id),
        },
    )
    .await?;

    let boat = boat_service::create(
        db,
        &principal,
        boat_service::BoatInput {
            name: "Tàu Biển Xanh".to_string(),
            owner_name: "Nguyễn Văn A".to_string(),
            phone: "0911111111".to_string(),
            description: None,
        },
    )
    .await?;

    let product_types = product_type_service::list(db, &principal).await?;
    let customers = customer_service::list(db, &principal).await?;
    let (Some(squid), Some(customer)) = (product_types.first(), customers.first()) else {
        return Ok(());
    };

    let today = Local::now().date_naive();
    for offset in 0..3i64 {
        let date = today - Duration::days(offset);
        purchase_service::create(
            db,
            &principal,
            purchase_service::PurchaseInput {
                boat_id: boat.id,
                product_type_id: squid.id,
                weight: Decimal::new(12000 + offset * 500, 2),
                unit_price: Decimal::new(9_000_000, 2),
                purchase_date: date,
                notes: None,
            },
        )
        .await?;

        sale_service::create(
            db,
            &principal,
            sale_service::SaleInput {
                customer_id: customer.id,
                product_type_id: squid.id,
                weight: Decimal::new(10000, 2),
                unit_price: Decimal::new(15_000_000, 2),
                sale_date: date,
                payment_status: if offset == 0 {
                    PaymentStatus::Unpaid
                } else {
                    PaymentStatus::Paid
                },
                notes: None,
            },
        )
        .await?;

        expense_service::create(
            db,
            &principal,
            expense_service::ExpenseInput {
                expense_type: if offset % 2 == 0 { "Đá" } else { "Xăng dầu" }.to_string(),
                amount: Decimal::new(50_000_000, 2),
                expense_date: date,
                notes: None,
            },
        )
        .await?;
    }

    tracing::info!(farm_id = registered.farm.id, "demo data seeded");
    Ok(())
}
