//! Purchase Service - catch bought from boats

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

use super::{clean, now, same_farm};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::{
    date_to_stored, to_stored, validate_amount, validate_business_date, validate_weight,
    OptionalChecks,
};
use crate::domain::ledger::PurchaseView;
use crate::domain::pricing::{price_line, reprice};
use crate::domain::{DomainError, FarmId, Principal};
use crate::models::boat::{self, Entity as Boat};
use crate::models::product_type::{self, Entity as ProductType};
use crate::models::purchase::{self, Entity as Purchase};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseInput {
    pub boat_id: i32,
    pub product_type_id: i32,
    #[validate(custom(function = "validate_weight"))]
    pub weight: Decimal,
    #[validate(custom(function = "validate_amount"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "validate_business_date"))]
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update. Absent fields keep their stored value; any
/// `total_amount` sent by the caller is not part of this type and is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseUpdate {
    pub boat_id: Option<i32>,
    pub product_type_id: Option<i32>,
    pub weight: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Validate for PurchaseUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        OptionalChecks::new()
            .check("weight", self.weight.as_ref(), validate_weight)
            .check("unit_price", self.unit_price.as_ref(), validate_amount)
            .check("purchase_date", self.purchase_date.as_ref(), validate_business_date)
            .finish()
    }
}

/// Choices for the purchase form
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOptions {
    pub boats: Vec<boat::Model>,
    pub product_types: Vec<product_type::Model>,
}

/// Attach boat and product type to each purchase, two queries in total
pub async fn with_details<C: ConnectionTrait>(
    conn: &C,
    purchases: Vec<purchase::Model>,
) -> Result<Vec<PurchaseView>, DomainError> {
    if purchases.is_empty() {
        return Ok(Vec::new());
    }

    let boat_ids: Vec<i32> = purchases.iter().map(|p| p.boat_id).collect();
    let type_ids: Vec<i32> = purchases.iter().map(|p| p.product_type_id).collect();

    let boats: HashMap<i32, boat::Model> = Boat::find()
        .filter(boat::Column::Id.is_in(boat_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();
    let types: HashMap<i32, product_type::Model> = ProductType::find()
        .filter(product_type::Column::Id.is_in(type_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    purchases
        .into_iter()
        .map(|p| {
            let boat = boats.get(&p.boat_id).cloned();
            let product_type = types.get(&p.product_type_id).cloned();
            p.into_view(boat, product_type)
        })
        .collect()
}

pub async fn list(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<PurchaseView>, DomainError> {
    let farm_id = require_farm(principal)?;
    let purchases = Purchase::find()
        .filter(purchase::Column::FarmId.eq(farm_id))
        .order_by_desc(purchase::Column::PurchaseDate)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await?;

    with_details(db, purchases).await
}

pub async fn options(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<PurchaseOptions, DomainError> {
    let farm_id = require_farm(principal)?;
    let boats = Boat::find()
        .filter(boat::Column::FarmId.eq(farm_id))
        .order_by_asc(boat::Column::Name)
        .all(db)
        .await?;
    let product_types = ProductType::find()
        .filter(product_type::Column::FarmId.eq(farm_id))
        .order_by_asc(product_type::Column::Name)
        .all(db)
        .await?;

    Ok(PurchaseOptions {
        boats,
        product_types,
    })
}

async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<purchase::Model, DomainError> {
    let found = Purchase::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |p| Some(p.farm_id))
}

async fn load_view<C: ConnectionTrait>(
    conn: &C,
    purchase: purchase::Model,
) -> Result<PurchaseView, DomainError> {
    with_details(conn, vec![purchase])
        .await?
        .pop()
        .ok_or_else(|| DomainError::Internal("purchase view missing".to_string()))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<PurchaseView, DomainError> {
    let purchase = find_authorized(db, principal, id).await?;
    load_view(db, purchase).await
}

async fn check_boat<C: ConnectionTrait>(conn: &C, farm_id: FarmId, id: i32) -> Result<(), DomainError> {
    let found = Boat::find_by_id(id).one(conn).await?;
    same_farm("boat_id", farm_id, found, |b| b.farm_id).map(|_| ())
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
    input: PurchaseInput,
) -> Result<PurchaseView, DomainError> {
    let farm_id = require_farm(principal)?;
    input.validate()?;
    let line = price_line(input.weight, input.unit_price)?;

    let txn = db.begin().await?;
    check_boat(&txn, farm_id, input.boat_id).await?;
    check_product_type(&txn, farm_id, input.product_type_id).await?;

    let now = now();

    let new_purchase = purchase::ActiveModel {
        farm_id: Set(farm_id),
        boat_id: Set(input.boat_id),
        product_type_id: Set(input.product_type_id),
        weight: Set(to_stored(line.weight)),
        unit_price: Set(to_stored(line.unit_price)),
        total_amount: Set(to_stored(line.total_amount)),
        purchase_date: Set(date_to_stored(input.purchase_date)),
        notes: Set(clean(input.notes)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_purchase.insert(&txn).await?;
    let view = load_view(&txn, saved).await?;
    txn.commit().await?;

    tracing::info!(farm_id, purchase_id = view.id, total = %line.total_amount, "purchase recorded");
    Ok(view)
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: PurchaseUpdate,
) -> Result<PurchaseView, DomainError> {
    let txn = db.begin().await?;
    let existing = find_authorized(&txn, principal, id).await?;
    input.validate()?;
    let farm_id = existing.farm_id;

    if let Some(boat_id) = input.boat_id {
        check_boat(&txn, farm_id, boat_id).await?;
    }
    if let Some(product_type_id) = input.product_type_id {
        check_product_type(&txn, farm_id, product_type_id).await?;
    }

    let current = existing.clone().into_view(None, None)?;
    let line = reprice(current.weight, current.unit_price, input.weight, input.unit_price)?;

    let mut active: purchase::ActiveModel = existing.into();
    if let Some(boat_id) = input.boat_id {
        active.boat_id = Set(boat_id);
    }
    if let Some(product_type_id) = input.product_type_id {
        active.product_type_id = Set(product_type_id);
    }
    if let Some(date) = input.purchase_date {
        active.purchase_date = Set(date_to_stored(date));
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

    tracing::info!(purchase_id = id, total = %line.total_amount, "purchase updated");
    Ok(view)
}

pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let purchase = find_authorized(db, principal, id).await?;
    Purchase::delete_by_id(purchase.id).exec(db).await?;
    tracing::info!(purchase_id = id, "purchase deleted");
    Ok(())
}
