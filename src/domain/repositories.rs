//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::access::FarmId;
use super::ledger::{AmountRow, ExpenseRow, PurchaseView, SaleView};
use super::reports::DateRange;
use super::DomainError;

/// Read-only ledger queries backing the report engine.
///
/// Every query is scoped to one farm and sees committed rows only. Separate
/// calls are not required to observe the same snapshot.
#[async_trait]
pub trait LedgerQueries: Send + Sync {
    /// Totals of paid sales whose sale_date falls in `range`
    async fn paid_sales(&self, farm_id: FarmId, range: DateRange)
        -> Result<Vec<AmountRow>, DomainError>;

    /// Totals of purchases whose purchase_date falls in `range`
    async fn purchase_costs(
        &self,
        farm_id: FarmId,
        range: DateRange,
    ) -> Result<Vec<AmountRow>, DomainError>;

    /// Expenses whose expense_date falls in `range`
    async fn expenses(&self, farm_id: FarmId, range: DateRange)
        -> Result<Vec<ExpenseRow>, DomainError>;

    /// Every unpaid sale of the farm, customer loaded
    async fn unpaid_sales(&self, farm_id: FarmId) -> Result<Vec<SaleView>, DomainError>;

    /// Most recently created sales, newest first
    async fn recent_sales(&self, farm_id: FarmId, limit: u64)
        -> Result<Vec<SaleView>, DomainError>;

    /// Most recently created purchases, newest first
    async fn recent_purchases(
        &self,
        farm_id: FarmId,
        limit: u64,
    ) -> Result<Vec<PurchaseView>, DomainError>;
}
