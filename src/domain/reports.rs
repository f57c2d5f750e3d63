//! Report value types and pure aggregation helpers

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::ledger::{AmountRow, CustomerRef, ExpenseRow, PurchaseView, SaleView};
use super::amount::validate_business_date;
use super::DomainError;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, DomainError> {
        for (field, date) in [("start_date", start_date), ("end_date", end_date)] {
            if let Err(e) = validate_business_date(&date) {
                let message = e.message.map(|m| m.to_string()).unwrap_or_default();
                return Err(DomainError::invalid(field, message));
            }
        }
        if end_date < start_date {
            return Err(DomainError::invalid(
                "end_date",
                "must be on or after start_date",
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// First to last day of the month containing `today`
    pub fn month_of(today: NaiveDate) -> Self {
        let start_date = today.with_day(1).unwrap_or(today);
        let next_month = if today.month() == 12 {
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
        };
        let end_date = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(today);
        Self {
            start_date,
            end_date,
        }
    }

    /// Caller-supplied bounds, each defaulting to the current month's edge
    pub fn resolve(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let month = Self::month_of(today);
        Self::new(
            start_date.unwrap_or(month.start_date),
            end_date.unwrap_or(month.end_date),
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every calendar day in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        std::iter::successors(Some(self.start_date), move |d| {
            d.succ_opt().filter(|next| *next <= end)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAmount {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub daily_revenue: Vec<DailyAmount>,
    pub total_revenue: Decimal,
    pub period: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseTypeTotal {
    pub expense_type: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseReport {
    pub daily_expenses: Vec<DailyAmount>,
    pub expenses_by_type: Vec<ExpenseTypeTotal>,
    pub purchase_costs: Vec<DailyAmount>,
    pub total_expenses: Decimal,
    pub total_purchase_costs: Decimal,
    pub total_costs: Decimal,
    pub period: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitReport {
    pub total_revenue: Decimal,
    pub total_purchase_costs: Decimal,
    pub total_expenses: Decimal,
    pub total_costs: Decimal,
    pub profit: Decimal,
    pub daily_data: Vec<DailyProfit>,
    pub period: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDebt {
    pub customer: CustomerRef,
    pub total_debt: Decimal,
    pub unpaid_sales: Vec<SaleView>,
    pub sales_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtReport {
    pub customers_with_debt: Vec<CustomerDebt>,
    pub total_debt: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

impl PeriodSummary {
    pub fn new(revenue: Decimal, expenses: Decimal) -> Self {
        Self {
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: PeriodSummary,
    pub this_month: PeriodSummary,
    pub total_debt: Decimal,
    pub recent_sales: Vec<SaleView>,
    pub recent_purchases: Vec<PurchaseView>,
}

pub fn sum_amounts(rows: &[AmountRow]) -> Decimal {
    rows.iter().map(|r| r.amount).sum()
}

pub fn sum_expenses(rows: &[ExpenseRow]) -> Decimal {
    rows.iter().map(|r| r.amount).sum()
}

/// Group by calendar date, ascending
pub fn daily_totals(rows: &[AmountRow]) -> Vec<DailyAmount> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for row in rows {
        *by_day.entry(row.date).or_default() += row.amount;
    }
    by_day
        .into_iter()
        .map(|(date, amount)| DailyAmount { date, amount })
        .collect()
}

pub fn daily_expense_totals(rows: &[ExpenseRow]) -> Vec<DailyAmount> {
    let as_amounts: Vec<AmountRow> = rows
        .iter()
        .map(|r| AmountRow {
            date: r.date,
            amount: r.amount,
        })
        .collect();
    daily_totals(&as_amounts)
}

/// Sum per expense type, largest first (ties by type name)
pub fn totals_by_type(rows: &[ExpenseRow]) -> Vec<ExpenseTypeTotal> {
    let mut by_type: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in rows {
        *by_type.entry(row.expense_type.as_str()).or_default() += row.amount;
    }
    let mut totals: Vec<ExpenseTypeTotal> = by_type
        .into_iter()
        .map(|(expense_type, total)| ExpenseTypeTotal {
            expense_type: expense_type.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Group unpaid sales per customer, drop zero debts, largest debt first.
///
/// Sales whose customer was not loaded are skipped.
pub fn rank_debts(unpaid_sales: Vec<SaleView>) -> DebtReport {
    let mut by_customer: BTreeMap<i32, CustomerDebt> = BTreeMap::new();
    for sale in unpaid_sales {
        let Some(customer) = sale.customer.clone() else {
            continue;
        };
        let entry = by_customer
            .entry(customer.id)
            .or_insert_with(|| CustomerDebt {
                customer,
                total_debt: Decimal::ZERO,
                unpaid_sales: Vec::new(),
                sales_count: 0,
            });
        entry.total_debt += sale.total_amount;
        entry.sales_count += 1;
        entry.unpaid_sales.push(sale);
    }

    let mut customers_with_debt: Vec<CustomerDebt> = by_customer
        .into_values()
        .filter(|debt| debt.total_debt > Decimal::ZERO)
        .collect();
    customers_with_debt.sort_by(|a, b| {
        b.total_debt
            .cmp(&a.total_debt)
            .then_with(|| a.customer.id.cmp(&b.customer.id))
    });

    let total_debt = customers_with_debt.iter().map(|d| d.total_debt).sum();
    DebtReport {
        customers_with_debt,
        total_debt,
    }
}
