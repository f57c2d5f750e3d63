//! Farm Service - farm administration by the owning admin

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{clean, now};
use crate::domain::access::has_access_to_farm;
use crate::domain::amount::not_blank;
use crate::domain::{DomainError, Principal, Role};
use crate::models::farm::{self, Entity as Farm, FarmStatus};
use crate::models::user::{self, Entity as User};
use crate::models::{boat, customer, expense, product_type, purchase, sale};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FarmInput {
    #[validate(
        length(min = 1, max = 255, message = "name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 255, message = "address is required"),
        custom(function = "not_blank")
    )]
    pub address: String,
    #[validate(
        length(min = 1, max = 255, message = "phone is required"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FarmUpdate {
    #[validate(nested)]
    #[serde(flatten)]
    pub farm: FarmInput,
    pub status: FarmStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaffInput {
    pub user_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmWithOwner {
    #[serde(flatten)]
    pub farm: farm::Model,
    pub owner: Option<user::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmDetails {
    #[serde(flatten)]
    pub farm: farm::Model,
    pub owner: Option<user::Model>,
    pub staff: Vec<user::Model>,
}

fn require_admin(principal: &Principal) -> Result<(), DomainError> {
    if principal.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = principal.id, "farm administration requires admin role");
        Err(DomainError::Authorization)
    }
}

/// Farm-level changes are reserved to the admin that owns the farm
fn require_owner(principal: &Principal, farm: &farm::Model) -> Result<(), DomainError> {
    require_admin(principal)?;
    if farm.owner_id == principal.id {
        Ok(())
    } else {
        tracing::warn!(user_id = principal.id, farm_id = farm.id, "not the farm owner");
        Err(DomainError::Authorization)
    }
}

async fn find_farm<C: ConnectionTrait>(conn: &C, id: i32) -> Result<farm::Model, DomainError> {
    Farm::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Farm"))
}

/// Farms the principal works in or owns
pub async fn list_farms(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<FarmWithOwner>, DomainError> {
    let mut visible = Condition::any().add(farm::Column::OwnerId.eq(principal.id));
    if let Some(farm_id) = principal.farm_id {
        visible = visible.add(farm::Column::Id.eq(farm_id));
    }

    let farms = Farm::find()
        .filter(visible)
        .order_by_asc(farm::Column::Id)
        .find_also_related(User)
        .all(db)
        .await?;

    Ok(farms
        .into_iter()
        .map(|(farm, owner)| FarmWithOwner { farm, owner })
        .collect())
}

pub async fn get_farm(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<FarmDetails, DomainError> {
    let farm = find_farm(db, id).await?;
    if farm.owner_id != principal.id && !has_access_to_farm(principal, Some(farm.id)) {
        tracing::warn!(user_id = principal.id, farm_id = id, "access denied");
        return Err(DomainError::Authorization);
    }

    let owner = User::find_by_id(farm.owner_id).one(db).await?;
    let staff = User::find()
        .filter(user::Column::FarmId.eq(farm.id))
        .filter(user::Column::Role.eq(Role::Staff.as_str()))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;

    Ok(FarmDetails { farm, owner, staff })
}

/// Create a farm owned by the calling admin. An admin without a farm link is
/// linked to the new farm in the same transaction.
pub async fn create_farm(
    db: &DatabaseConnection,
    principal: &Principal,
    input: FarmInput,
) -> Result<farm::Model, DomainError> {
    require_admin(principal)?;
    input.validate()?;

    let txn = db.begin().await?;
    let now = now();
    let farm = farm::ActiveModel {
        name: Set(input.name.trim().to_string()),
        address: Set(Some(input.address.trim().to_string())),
        phone: Set(Some(input.phone.trim().to_string())),
        description: Set(clean(input.description)),
        status: Set(FarmStatus::Active.as_str().to_string()),
        owner_id: Set(principal.id),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let owner = User::find_by_id(principal.id)
        .one(&txn)
        .await?
        .ok_or(DomainError::Authentication)?;
    if owner.farm_id.is_none() {
        let mut active: user::ActiveModel = owner.into();
        active.farm_id = Set(Some(farm.id));
        active.updated_at = Set(now);
        active.update(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(user_id = principal.id, farm_id = farm.id, "farm created");
    Ok(farm)
}

pub async fn update_farm(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: FarmUpdate,
) -> Result<farm::Model, DomainError> {
    let existing = find_farm(db, id).await?;
    require_owner(principal, &existing)?;
    input.validate()?;

    let mut active: farm::ActiveModel = existing.into();
    active.name = Set(input.farm.name.trim().to_string());
    active.address = Set(Some(input.farm.address.trim().to_string()));
    active.phone = Set(Some(input.farm.phone.trim().to_string()));
    active.description = Set(clean(input.farm.description));
    active.status = Set(input.status.as_str().to_string());
    active.updated_at = Set(now());

    let saved = active.update(db).await?;
    tracing::info!(farm_id = id, status = input.status.as_str(), "farm updated");
    Ok(saved)
}

/// Delete an empty farm. Members lose their farm link.
pub async fn delete_farm(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let txn = db.begin().await?;
    let farm = find_farm(&txn, id).await?;
    require_owner(principal, &farm)?;

    let records = boat::Entity::find()
        .filter(boat::Column::FarmId.eq(id))
        .count(&txn)
        .await?
        + customer::Entity::find()
            .filter(customer::Column::FarmId.eq(id))
            .count(&txn)
            .await?
        + product_type::Entity::find()
            .filter(product_type::Column::FarmId.eq(id))
            .count(&txn)
            .await?
        + purchase::Entity::find()
            .filter(purchase::Column::FarmId.eq(id))
            .count(&txn)
            .await?
        + sale::Entity::find()
            .filter(sale::Column::FarmId.eq(id))
            .count(&txn)
            .await?
        + expense::Entity::find()
            .filter(expense::Column::FarmId.eq(id))
            .count(&txn)
            .await?;
    if records > 0 {
        return Err(DomainError::Conflict(
            "Cannot delete farm with existing records".to_string(),
        ));
    }

    User::update_many()
        .col_expr(user::Column::FarmId, Expr::value(Option::<i32>::None))
        .filter(user::Column::FarmId.eq(id))
        .exec(&txn)
        .await?;
    Farm::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(farm_id = id, "farm deleted");
    Ok(())
}

async fn find_member_candidate(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, DomainError> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::invalid("user_id", "The selected user_id is invalid."))
}

/// Attach a staff account to the farm
pub async fn add_staff(
    db: &DatabaseConnection,
    principal: &Principal,
    farm_id: i32,
    user_id: i32,
) -> Result<user::Model, DomainError> {
    let farm = find_farm(db, farm_id).await?;
    require_owner(principal, &farm)?;

    let member = find_member_candidate(db, user_id).await?;
    if Role::parse(&member.role) != Some(Role::Staff) {
        return Err(DomainError::invalid("user_id", "user is not a staff account"));
    }

    let mut active: user::ActiveModel = member.into();
    active.farm_id = Set(Some(farm.id));
    active.updated_at = Set(now());
    let saved = active.update(db).await?;

    tracing::info!(farm_id, user_id, "staff added");
    Ok(saved)
}

/// Detach a member from the farm; the member must currently belong to it
pub async fn remove_staff(
    db: &DatabaseConnection,
    principal: &Principal,
    farm_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let farm = find_farm(db, farm_id).await?;
    require_owner(principal, &farm)?;

    let member = find_member_candidate(db, user_id).await?;
    if member.farm_id != Some(farm.id) {
        return Err(DomainError::invalid("user_id", "user does not belong to this farm"));
    }

    let mut active: user::ActiveModel = member.into();
    active.farm_id = Set(None);
    active.updated_at = Set(now());
    active.update(db).await?;

    tracing::info!(farm_id, user_id, "staff removed");
    Ok(())
}
