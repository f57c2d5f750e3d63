//! Expense Service - operating costs (fuel, ice, labour...)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Deserialize;
use validator::Validate;

use super::{clean, now};
use crate::domain::access::{authorize_record, require_farm};
use crate::domain::amount::{
    date_to_stored, not_blank, to_stored, validate_amount, validate_business_date,
};
use crate::domain::{DomainError, Principal};
use crate::models::expense::{self, Entity as Expense, ExpenseDto};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExpenseInput {
    #[validate(
        length(min = 1, max = 255, message = "expense_type is required"),
        custom(function = "not_blank")
    )]
    pub expense_type: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[validate(custom(function = "validate_business_date"))]
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
}

pub async fn list(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<ExpenseDto>, DomainError> {
    let farm_id = require_farm(principal)?;
    Expense::find()
        .filter(expense::Column::FarmId.eq(farm_id))
        .order_by_desc(expense::Column::ExpenseDate)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(ExpenseDto::try_from)
        .collect()
}

/// Distinct categories used by the principal's farm, ascending
pub async fn list_expense_types(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<String>, DomainError> {
    let farm_id = require_farm(principal)?;
    Ok(Expense::find()
        .select_only()
        .column(expense::Column::ExpenseType)
        .distinct()
        .filter(expense::Column::FarmId.eq(farm_id))
        .order_by_asc(expense::Column::ExpenseType)
        .into_tuple::<String>()
        .all(db)
        .await?)
}

async fn find_authorized<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    id: i32,
) -> Result<expense::Model, DomainError> {
    let found = Expense::find_by_id(id).one(conn).await?;
    authorize_record(principal, found, |e| Some(e.farm_id))
}

pub async fn get(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<ExpenseDto, DomainError> {
    find_authorized(db, principal, id).await?.try_into()
}

pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    input: ExpenseInput,
) -> Result<ExpenseDto, DomainError> {
    let farm_id = require_farm(principal)?;
    input.validate()?;
    let now = now();

    let new_expense = expense::ActiveModel {
        farm_id: Set(farm_id),
        expense_type: Set(input.expense_type.trim().to_string()),
        amount: Set(to_stored(input.amount)),
        expense_date: Set(date_to_stored(input.expense_date)),
        notes: Set(clean(input.notes)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_expense.insert(db).await?;
    tracing::info!(farm_id, expense_id = saved.id, amount = %input.amount, "expense recorded");
    saved.try_into()
}

pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
    input: ExpenseInput,
) -> Result<ExpenseDto, DomainError> {
    let existing = find_authorized(db, principal, id).await?;
    input.validate()?;

    let mut active: expense::ActiveModel = existing.into();
    active.expense_type = Set(input.expense_type.trim().to_string());
    active.amount = Set(to_stored(input.amount));
    active.expense_date = Set(date_to_stored(input.expense_date));
    active.notes = Set(clean(input.notes));
    active.updated_at = Set(now());

    active.update(db).await?.try_into()
}

pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    id: i32,
) -> Result<(), DomainError> {
    let expense = find_authorized(db, principal, id).await?;
    Expense::delete_by_id(expense.id).exec(db).await?;
    tracing::info!(expense_id = id, "expense deleted");
    Ok(())
}
