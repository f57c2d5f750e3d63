//! Product Type Service - catalog of goods bought and sold (squid kinds etc.)

use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{clean, now};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::not_blank;
use crate::domain::ledger::{PurchaseView, SaleView};
use crate::domain::{DomainError, FarmId, Principal};
use crate::models::product_type::{self, Entity as ProductType};
use crate::models::purchase::{self, Entity as Purchase};
use crate::models::sale::{self, Entity as Sale};
use crate::services::{purchase_service, sale_service};

pub const DEFAULT_UNIT: &str = "kg";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductTypeInput {
    #[validate(
        length(min = 1, max = 255, message = "name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
}

/// A product type with the purchases and sales recorded against it
#[derive(Debug, Clone, Serialize)]
pub struct ProductTypeDetails {
    #[serde(flatten)]
    pub product_type: product_type::Model,
    pub purchases: Vec<PurchaseView>,
    pub sales: Vec<SaleView>,
}

pub async fn list(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<product_type::Model>, DomainError> {
    let farm_id = require_farm(principal)?;
    Ok(ProductType::find()
        .filter(product_type::Column::FarmId.eq(farm_id))
        .order_by_asc(product_type::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<product_type::Model, DomainError> {
    let found = ProductType::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |p| Some(p.farm_id))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<ProductTypeDetails, DomainError> {
    let product_type = find_authorized(db, principal, id).await?;

    let purchases = Purchase::find()
        .filter(purchase::Column::ProductTypeId.eq(product_type.id))
        .order_by_desc(purchase::Column::PurchaseDate)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await?;
    let sales = Sale::find()
        .filter(sale::Column::ProductTypeId.eq(product_type.id))
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await?;

    Ok(ProductTypeDetails {
        purchases: purchase_service::with_details(db, purchases).await?,
        sales: sale_service::with_details(db, sales).await?,
        product_type,
    })
}

/// Insert a product type for `farm_id` without an access check.
///
/// Used by `create` and by the onboarding catalog, which runs inside the
/// registration transaction.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    farm_id: FarmId,
    input: ProductTypeInput,
) -> Result<product_type::Model, DomainError> {
    input.validate()?;
    let now = now();

    let new_type = product_type::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(clean(input.description)),
        unit: Set(clean(input.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string())),
        farm_id: Set(farm_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(new_type.insert(conn).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    input: ProductTypeInput,
) -> Result<product_type::Model, DomainError> {
    let farm_id = require_farm(principal)?;
    let saved = insert(db, farm_id, input).await?;
    tracing::info!(farm_id, product_type_id = saved.id, "product type created");
    Ok(saved)
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: ProductTypeInput,
) -> Result<product_type::Model, DomainError> {
    let existing = find_authorized(db, principal, id).await?;
    input.validate()?;

    let unit = clean(input.unit).unwrap_or_else(|| existing.unit.clone());
    let mut active: product_type::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.description = Set(clean(input.description));
    active.unit = Set(unit);
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

/// Delete a product type unless a purchase or sale refers to it
pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let txn = db.begin().await?;
    let product_type = find_authorized(&txn, principal, id).await?;

    let purchases = Purchase::find()
        .filter(purchase::Column::ProductTypeId.eq(product_type.id))
        .count(&txn)
        .await?;
    let sales = Sale::find()
        .filter(sale::Column::ProductTypeId.eq(product_type.id))
        .count(&txn)
        .await?;
    if purchases + sales > 0 {
        return Err(DomainError::Conflict(
            "Cannot delete product type with existing purchases or sales".to_string(),
        ));
    }

    ProductType::delete_by_id(product_type.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(product_type_id = id, "product type deleted");
    Ok(())
}
