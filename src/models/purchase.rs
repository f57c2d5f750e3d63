use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::amount::{date_from_stored, from_stored};
use crate::domain::ledger::{AmountRow, NamedRef, PurchaseView};
use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub farm_id: i32,
    pub boat_id: i32,
    pub product_type_id: i32,
    pub weight: String,       // decimal, kg
    pub unit_price: String,   // decimal, per kg
    pub total_amount: String, // decimal, weight * unit_price
    pub purchase_date: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::boat::Entity",
        from = "Column::BoatId",
        to = "super::boat::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Boat,
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

impl Related<super::boat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boat.def()
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
    pub fn amount_row(&self) -> Result<AmountRow, DomainError> {
        Ok(AmountRow {
            date: date_from_stored(&self.purchase_date)?,
            amount: from_stored(&self.total_amount)?,
        })
    }

    pub fn into_view(
        self,
        boat: Option<super::boat::Model>,
        product_type: Option<super::product_type::Model>,
    ) -> Result<PurchaseView, DomainError> {
        Ok(PurchaseView {
            id: self.id,
            farm_id: self.farm_id,
            boat_id: self.boat_id,
            product_type_id: self.product_type_id,
            weight: from_stored(&self.weight)?,
            unit_price: from_stored(&self.unit_price)?,
            total_amount: from_stored(&self.total_amount)?,
            purchase_date: date_from_stored(&self.purchase_date)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            boat: boat.map(|b| NamedRef {
                id: b.id,
                name: b.name,
            }),
            product_type: product_type.map(NamedRef::from),
        })
    }
}
