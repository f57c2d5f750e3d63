use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::amount::{date_from_stored, from_stored};
use crate::domain::ledger::ExpenseRow;
use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: i32,
    pub expense_type: String, // free text: fuel, ice, transport...
    pub amount: String,
    pub expense_date: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id"
    )]
    Farm,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn row(&self) -> Result<ExpenseRow, DomainError> {
        Ok(ExpenseRow {
            date: date_from_stored(&self.expense_date)?,
            expense_type: self.expense_type.clone(),
            amount: from_stored(&self.amount)?,
        })
    }
}

/// Expense as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDto {
    pub id: i32,
    pub farm_id: i32,
    pub expense_type: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<Model> for ExpenseDto {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            farm_id: model.farm_id,
            amount: from_stored(&model.amount)?,
            expense_date: date_from_stored(&model.expense_date)?,
            expense_type: model.expense_type,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
