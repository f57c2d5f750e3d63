//! Boat Service - suppliers the farm buys catch from

use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{clean, now};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::not_blank;
use crate::domain::ledger::PurchaseView;
use crate::domain::{DomainError, Principal};
use crate::models::boat::{self, Entity as Boat};
use crate::models::purchase::{self, Entity as Purchase};
use crate::services::purchase_service;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BoatInput {
    #[validate(
        length(min = 1, max = 255, message = "name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 255, message = "owner_name is required"),
        custom(function = "not_blank")
    )]
    pub owner_name: String,
    #[validate(
        length(min = 1, max = 20, message = "phone is required"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    pub description: Option<String>,
}

/// A boat with its purchase history, newest first
#[derive(Debug, Clone, Serialize)]
pub struct BoatDetails {
    #[serde(flatten)]
    pub boat: boat::Model,
    pub purchases: Vec<PurchaseView>,
}

pub async fn list(db: &DatabaseConnection, principal: &Principal) -> Result<Vec<boat::Model>, DomainError> {
    let farm_id = require_farm(principal)?;
    Ok(Boat::find()
        .filter(boat::Column::FarmId.eq(farm_id))
        .order_by_asc(boat::Column::Name)
        .all(db)
        .await?)
}

/// Load a boat and check it belongs to the principal's farm
pub async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<boat::Model, DomainError> {
    let found = Boat::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |b| Some(b.farm_id))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<BoatDetails, DomainError> {
    let boat = find_authorized(db, principal, id).await?;
    let purchases = Purchase::find()
        .filter(purchase::Column::BoatId.eq(boat.id))
        .order_by_desc(purchase::Column::PurchaseDate)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await?;
    let purchases = purchase_service::with_details(db, purchases).await?;

    Ok(BoatDetails { boat, purchases })
}

pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    input: BoatInput,
) -> Result<boat::Model, DomainError> {
    let farm_id = require_farm(principal)?;
    input.validate()?;
    let now = now();

    let new_boat = boat::ActiveModel {
        name: Set(input.name.trim().to_string()),
        owner_name: Set(input.owner_name.trim().to_string()),
        phone: Set(Some(input.phone.trim().to_string())),
        description: Set(clean(input.description)),
        farm_id: Set(farm_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_boat.insert(db).await?;
    tracing::info!(farm_id, boat_id = saved.id, "boat created");
    Ok(saved)
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: BoatInput,
) -> Result<boat::Model, DomainError> {
    let existing = find_authorized(db, principal, id).await?;
    input.validate()?;

    let mut active: boat::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.owner_name = Set(input.owner_name.trim().to_string());
    active.phone = Set(Some(input.phone.trim().to_string()));
    active.description = Set(clean(input.description));
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

/// Delete a boat that no purchase refers to
pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let txn = db.begin().await?;
    let boat = find_authorized(&txn, principal, id).await?;

    let purchases = Purchase::find()
        .filter(purchase::Column::BoatId.eq(boat.id))
        .count(&txn)
        .await?;
    if purchases > 0 {
        return Err(DomainError::Conflict(
            "Cannot delete boat with existing purchases".to_string(),
        ));
    }

    Boat::delete_by_id(boat.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(boat_id = id, "boat deleted");
    Ok(())
}
