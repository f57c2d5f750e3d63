use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::amount::{date_from_stored, from_stored};
use crate::domain::ledger::{AmountRow, CustomerRef, NamedRef, PaymentStatus, SaleView};
use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: i32,
    pub customer_id: i32,
    pub product_type_id: i32,
    pub weight: String,
    pub unit_price: String,
    pub total_amount: String,
    pub sale_date: String,
    pub payment_status: String, // 'paid', 'unpaid'
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::product_type::Entity",
        from = "Column::ProductTypeId",
        to = "super::product_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    ProductType,
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id"
    )]
    Farm,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::product_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductType.def()
    }
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn payment_status(&self) -> Result<PaymentStatus, DomainError> {
        PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            DomainError::Internal(format!("corrupt payment status {:?}", self.payment_status))
        })
    }

    pub fn amount_row(&self) -> Result<AmountRow, DomainError> {
        Ok(AmountRow {
            date: date_from_stored(&self.sale_date)?,
            amount: from_stored(&self.total_amount)?,
        })
    }

    pub fn into_view(
        self,
        customer: Option<super::customer::Model>,
        product_type: Option<super::product_type::Model>,
    ) -> Result<SaleView, DomainError> {
        let payment_status = self.payment_status()?;
        Ok(SaleView {
            id: self.id,
            farm_id: self.farm_id,
            customer_id: self.customer_id,
            product_type_id: self.product_type_id,
            weight: from_stored(&self.weight)?,
            unit_price: from_stored(&self.unit_price)?,
            total_amount: from_stored(&self.total_amount)?,
            sale_date: date_from_stored(&self.sale_date)?,
            payment_status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            customer: customer.map(CustomerRef::from),
            product_type: product_type.map(NamedRef::from),
        })
    }
}
