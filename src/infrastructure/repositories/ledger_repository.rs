//! SeaORM implementation of LedgerQueries

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::domain::amount::date_to_stored;
use crate::domain::ledger::{AmountRow, ExpenseRow, PaymentStatus, PurchaseView, SaleView};
use crate::domain::reports::DateRange;
use crate::domain::{DomainError, FarmId, LedgerQueries};
use crate::models::customer::Entity as Customer;
use crate::models::expense::{self, Entity as Expense};
use crate::models::purchase::{self, Entity as Purchase};
use crate::models::sale::{self, Entity as Sale};
use crate::services::{purchase_service, sale_service};

/// SeaORM-based implementation of LedgerQueries
pub struct SeaOrmLedgerQueries {
    db: DatabaseConnection,
}

impl SeaOrmLedgerQueries {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn bounds(range: DateRange) -> (String, String) {
    (date_to_stored(range.start_date), date_to_stored(range.end_date))
}

#[async_trait]
impl LedgerQueries for SeaOrmLedgerQueries {
    async fn paid_sales(
        &self,
        farm_id: FarmId,
        range: DateRange,
    ) -> Result<Vec<AmountRow>, DomainError> {
        let (start, end) = bounds(range);
        Sale::find()
            .filter(sale::Column::FarmId.eq(farm_id))
            .filter(sale::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
            .filter(sale::Column::SaleDate.between(start, end))
            .all(&self.db)
            .await?
            .iter()
            .map(sale::Model::amount_row)
            .collect()
    }

    async fn purchase_costs(
        &self,
        farm_id: FarmId,
        range: DateRange,
    ) -> Result<Vec<AmountRow>, DomainError> {
        let (start, end) = bounds(range);
        Purchase::find()
            .filter(purchase::Column::FarmId.eq(farm_id))
            .filter(purchase::Column::PurchaseDate.between(start, end))
            .all(&self.db)
            .await?
            .iter()
            .map(purchase::Model::amount_row)
            .collect()
    }

    async fn expenses(
        &self,
        farm_id: FarmId,
        range: DateRange,
    ) -> Result<Vec<ExpenseRow>, DomainError> {
        let (start, end) = bounds(range);
        Expense::find()
            .filter(expense::Column::FarmId.eq(farm_id))
            .filter(expense::Column::ExpenseDate.between(start, end))
            .all(&self.db)
            .await?
            .iter()
            .map(expense::Model::row)
            .collect()
    }

    async fn unpaid_sales(&self, farm_id: FarmId) -> Result<Vec<SaleView>, DomainError> {
        let rows = Sale::find()
            .filter(sale::Column::FarmId.eq(farm_id))
            .filter(sale::Column::PaymentStatus.eq(PaymentStatus::Unpaid.as_str()))
            .order_by_desc(sale::Column::SaleDate)
            .find_also_related(Customer)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(sale, customer)| sale.into_view(customer, None))
            .collect()
    }

    async fn recent_sales(&self, farm_id: FarmId, limit: u64) -> Result<Vec<SaleView>, DomainError> {
        let sales = Sale::find()
            .filter(sale::Column::FarmId.eq(farm_id))
            .order_by_desc(sale::Column::CreatedAt)
            .order_by_desc(sale::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        sale_service::with_details(&self.db, sales).await
    }

    async fn recent_purchases(
        &self,
        farm_id: FarmId,
        limit: u64,
    ) -> Result<Vec<PurchaseView>, DomainError> {
        let purchases = Purchase::find()
            .filter(purchase::Column::FarmId.eq(farm_id))
            .order_by_desc(purchase::Column::CreatedAt)
            .order_by_desc(purchase::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        purchase_service::with_details(&self.db, purchases).await
    }
}
