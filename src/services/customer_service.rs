//! Customer Service - buyers of the farm's goods

use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{clean, now};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::not_blank;
use crate::domain::ledger::SaleView;
use crate::domain::{DomainError, FarmId, Principal};
use crate::models::customer::{self, Entity as Customer};
use crate::models::sale::{self, Entity as Sale};
use crate::services::sale_service;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(
        length(min = 1, max = 255, message = "name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 20, message = "phone is required"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// A customer with every sale made to them, newest first
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub sales: Vec<SaleView>,
}

pub async fn list(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<customer::Model>, DomainError> {
    let farm_id = require_farm(principal)?;
    Ok(Customer::find()
        .filter(customer::Column::FarmId.eq(farm_id))
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<customer::Model, DomainError> {
    let found = Customer::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |c| Some(c.farm_id))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<CustomerDetails, DomainError> {
    let customer = find_authorized(db, principal, id).await?;
    let sales = Sale::find()
        .filter(sale::Column::CustomerId.eq(customer.id))
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .all(db)
        .await?;
    let sales = sale_service::with_details(db, sales).await?;

    Ok(CustomerDetails { customer, sales })
}

/// Insert a customer for `farm_id` without an access check
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    farm_id: FarmId,
    input: CustomerInput,
) -> Result<customer::Model, DomainError> {
    input.validate()?;
    let now = now();

    let new_customer = customer::ActiveModel {
        name: Set(input.name.trim().to_string()),
        phone: Set(Some(input.phone.trim().to_string())),
        address: Set(clean(input.address)),
        description: Set(clean(input.description)),
        farm_id: Set(farm_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(new_customer.insert(conn).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    input: CustomerInput,
) -> Result<customer::Model, DomainError> {
    let farm_id = require_farm(principal)?;
    let saved = insert(db, farm_id, input).await?;
    tracing::info!(farm_id, customer_id = saved.id, "customer created");
    Ok(saved)
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: CustomerInput,
) -> Result<customer::Model, DomainError> {
    let existing = find_authorized(db, principal, id).await?;
    input.validate()?;

    let mut active: customer::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.phone = Set(Some(input.phone.trim().to_string()));
    active.address = Set(clean(input.address));
    active.description = Set(clean(input.description));
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

/// Delete a customer that has no sales
pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let txn = db.begin().await?;
    let customer = find_authorized(&txn, principal, id).await?;

    let sales = Sale::find()
        .filter(sale::Column::CustomerId.eq(customer.id))
        .count(&txn)
        .await?;
    if sales > 0 {
        return Err(DomainError::Conflict(
            "Cannot delete customer with existing sales".to_string(),
        ));
    }

    Customer::delete_by_id(customer.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(customer_id = id, "customer deleted");
    Ok(())
}
