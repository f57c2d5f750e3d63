//! Sale Service - goods sold to customers, with payment tracking

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Deserialize;
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

use super::{clean, now, same_farm};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::{
    date_to_stored, to_stored, validate_amount, validate_business_date, validate_weight,
    OptionalChecks,
};
use crate::domain::ledger::{PaymentStatus, SaleView};
use crate::domain::pricing::{price_line, reprice};
use crate::domain::{DomainError, FarmId, Principal};
use crate::models::customer::{self, Entity as Customer};
use crate::models::product_type::{self, Entity as ProductType};
use crate::models::sale::{self, Entity as Sale};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaleInput {
    pub customer_id: i32,
    pub product_type_id: i32,
    #[validate(custom(function = "validate_weight"))]
    pub weight: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "validate_business_date"))]
    pub sale_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

/// Partial update; see `PurchaseUpdate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleUpdate {
    pub customer_id: Option<i32>,
    pub product_type_id: Option<i32>,
    pub weight: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

impl Validate for SaleUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        OptionalChecks::new()
            .check("weight", self.weight.as_ref(), validate_weight)
            .check("unit_price", self.unit_price.as_ref(), validate_amount)
            .check("sale_date", self.sale_date.as_ref(), validate_business_date)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentStatusInput {
    pub payment_status: PaymentStatus,
}

/// Attach customer and product type to each sale
pub async fn with_details<C: ConnectionTrait>(
    conn: &C,
    sales: Vec<sale::Model>,
) -> Result<Vec<SaleView>, DomainError> {
    if sales.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids: Vec<i32> = sales.iter().map(|s| s.customer_id).collect();
    let type_ids: Vec<i32> = sales.iter().map(|s| s.product_type_id).collect();

    let customers: HashMap<i32, customer::Model> = Customer::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let types: HashMap<i32, product_type::Model> = ProductType::find()
        .filter(product_type::Column::Id.is_in(type_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    sales
        .into_iter()
        .map(|s| {
            let customer = customers.get(&s.customer_id).cloned();
            let product_type = types.get(&s.product_type_id).cloned();
            s.into_view(customer, product_type)
        })
        .collect()
}

pub async fn list(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<SaleView>, DomainError> {
    let farm_id = require_farm(principal)?;
    let sales = Sale::find()
        .filter(sale::Column::FarmId.eq(farm_id))
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await?;

    with_details(db, sales).await
}

async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<sale::Model, DomainError> {
    let found = Sale::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |s| Some(s.farm_id))
}

async fn load_view<C: ConnectionTrait>(conn: &C, sale: sale::Model) -> Result<SaleView, DomainError> {
    with_details(conn, vec![sale])
        .await?
        .pop()
        .ok_or_else(|| DomainError::Internal("sale view missing".to_string()))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<SaleView, DomainError> {
    let sale = find_authorized(db, principal, id).await?;
    load_view(db, sale).await
}

async fn check_customer<C: ConnectionTrait>(
    conn: &C,
    farm_id: FarmId,
    id: i32,
) -> Result<(), DomainError> {
    let found = Customer::find_by_id(id).one(conn).await?;
    same_farm("customer_id", farm_id, found, |c| c.farm_id).map(|_| ())
}

async fn check_product_type<C: ConnectionTrait>(
    conn: &C,
    farm_id: FarmId,
    id: i32,
) -> Result<(), DomainError> {
    let found = ProductType::find_by_id(id).one(conn).await?;
    same_farm("product_type_id", farm_id, found, |t| t.farm_id).map(|_| ())
}

pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    input: SaleInput,
) -> Result<SaleView, DomainError> {
    let farm_id = require_farm(principal)?;
    input.validate()?;
    let line = price_line(input.weight, input.unit_price)?;

    let txn = db.begin().await?;
    check_customer(&txn, farm_id, input.customer_id).await?;
    check_product_type(&txn, farm_id, input.product_type_id).await?;

    let now = now();

    let new_sale = sale::ActiveModel {
        farm_id: Set(farm_id),
        customer_id: Set(input.customer_id),
        product_type_id: Set(input.product_type_id),
        weight: Set(to_stored(line.weight)),
        unit_price: Set(to_stored(line.unit_price)),
        total_amount: Set(to_stored(line.total_amount)),
        sale_date: Set(date_to_stored(input.sale_date)),
        payment_status: Set(input.payment_status.as_str().to_string()),
        notes: Set(clean(input.notes)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_sale.insert(&txn).await?;
    let view = load_view(&txn, saved).await?;
    txn.commit().await?;

    tracing::info!(farm_id, sale_id = view.id, total = %line.total_amount, "sale recorded");
    Ok(view)
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: SaleUpdate,
) -> Result<SaleView, DomainError> {
    let txn = db.begin().await?;
    let existing = find_authorized(&txn, principal, id).await?;
    input.validate()?;
    let farm_id = existing.farm_id;

    if let Some(customer_id) = input.customer_id {
        check_customer(&txn, farm_id, customer_id).await?;
    }
    if let Some(product_type_id) = input.product_type_id {
        check_product_type(&txn, farm_id, product_type_id).await?;
    }

    let current = existing.clone().into_view(None, None)?;
    let line = reprice(current.weight, current.unit_price, input.weight, input.unit_price)?;

    let mut active: sale::ActiveModel = existing.into();
    if let Some(customer_id) = input.customer_id {
        active.customer_id = Set(customer_id);
    }
    if let Some(product_type_id) = input.product_type_id {
        active.product_type_id = Set(product_type_id);
    }
    if let Some(date) = input.sale_date {
        active.sale_date = Set(date_to_stored(date));
    }
    if let Some(status) = input.payment_status {
        active.payment_status = Set(status.as_str().to_string());
    }
    if input.notes.is_some() {
        active.notes = Set(clean(input.notes));
    }
    active.weight = Set(to_stored(line.weight));
    active.unit_price = Set(to_stored(line.unit_price));
    active.total_amount = Set(to_stored(line.total_amount));
    active.updated_at = Set(now());

    let saved = active.update(&txn).await?;
    let view = load_view(&txn, saved).await?;
    txn.commit().await?;

    tracing::info!(sale_id = id, total = %line.total_amount, "sale updated");
    Ok(view)
}

/// Change only the payment status; amounts are left as stored
pub async fn update_payment_status(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    status: PaymentStatus,
) -> Result<SaleView, DomainError> {
    let existing = find_authorized(db, principal, id).await?;

    let mut active: sale::ActiveModel = existing.into();
    active.payment_status = Set(status.as_str().to_string());
    active.updated_at = Set(now());

    let saved = active.update(db).await?;
    tracing::info!(sale_id = id, status = status.as_str(), "payment status changed");
    load_view(db, saved).await
}

pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let sale = find_authorized(db, principal, id).await?;
    Sale::delete_by_id(sale.id).exec(db).await?;
    tracing::info!(sale_id = id, "sale deleted");
    Ok(())
}
