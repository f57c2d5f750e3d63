//! Report Service - revenue, cost, profit and debt rollups for one farm
//!
//! All functions are reads through `LedgerQueries`. Each underlying query sees
//! committed rows; a report built from several queries may straddle a
//! concurrent commit.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::access::require_farm;
use crate::domain::reports::{
    daily_expense_totals, daily_totals, rank_debts, sum_amounts, sum_expenses, totals_by_type,
    Dashboard, DailyProfit, DateRange, DebtReport, ExpenseReport, PeriodSummary,
    ProfitReport, RevenueReport,
};
use crate::domain::{DomainError, FarmId, LedgerQueries, Principal};

/// Rows shown in each recent-activity list of the dashboard
pub const RECENT_LIMIT: u64 = 5;

pub async fn revenue(
    ledger: &dyn LedgerQueries,
    principal: &Principal,
    range: DateRange,
) -> Result<RevenueReport, DomainError> {
    let farm_id = require_farm(principal)?;
    let rows = ledger.paid_sales(farm_id, range).await?;

    let daily_revenue = daily_totals(&rows);
    let total_revenue = daily_revenue.iter().map(|d| d.amount).sum();

    Ok(RevenueReport {
        daily_revenue,
        total_revenue,
        period: range,
    })
}

pub async fn expenses(
    ledger: &dyn LedgerQueries,
    principal: &Principal,
    range: DateRange,
) -> Result<ExpenseReport, DomainError> {
    let farm_id = require_farm(principal)?;
    let expense_rows = ledger.expenses(farm_id, range).await?;
    let purchase_rows = ledger.purchase_costs(farm_id, range).await?;

    let total_expenses = sum_expenses(&expense_rows);
    let total_purchase_costs = sum_amounts(&purchase_rows);

    Ok(ExpenseReport {
        daily_expenses: daily_expense_totals(&expense_rows),
        expenses_by_type: totals_by_type(&expense_rows),
        purchase_costs: daily_totals(&purchase_rows),
        total_expenses,
        total_purchase_costs,
        total_costs: total_expenses + total_purchase_costs,
        period: range,
    })
}

struct Totals {
    revenue: Decimal,
    purchase_costs: Decimal,
    expenses: Decimal,
}

impl Totals {
    fn costs(&self) -> Decimal {
        self.purchase_costs + self.expenses
    }
}

async fn totals(
    ledger: &dyn LedgerQueries,
    farm_id: FarmId,
    range: DateRange,
) -> Result<Totals, DomainError> {
    Ok(Totals {
        revenue: sum_amounts(&ledger.paid_sales(farm_id, range).await?),
        purchase_costs: sum_amounts(&ledger.purchase_costs(farm_id, range).await?),
        expenses: sum_expenses(&ledger.expenses(farm_id, range).await?),
    })
}

/// Period totals plus one row per calendar day, each day queried on its own
pub async fn profit(
    ledger: &dyn LedgerQueries,
    principal: &Principal,
    range: DateRange,
) -> Result<ProfitReport, DomainError> {
    let farm_id = require_farm(principal)?;
    let period = totals(ledger, farm_id, range).await?;

    let mut daily_data = Vec::new();
    for date in range.days() {
        let day = totals(ledger, farm_id, DateRange::single_day(date)).await?;
        daily_data.push(DailyProfit {
            date,
            revenue: day.revenue,
            costs: day.costs(),
            profit: day.revenue - day.costs(),
        });
    }

    Ok(ProfitReport {
        total_revenue: period.revenue,
        total_purchase_costs: period.purchase_costs,
        total_expenses: period.expenses,
        total_costs: period.costs(),
        profit: period.revenue - period.costs(),
        daily_data,
        period: range,
    })
}

/// Outstanding debt per customer; not bounded by any date range
pub async fn debts(
    ledger: &dyn LedgerQueries,
    principal: &Principal,
) -> Result<DebtReport, DomainError> {
    let farm_id = require_farm(principal)?;
    let unpaid = ledger.unpaid_sales(farm_id).await?;
    Ok(rank_debts(unpaid))
}

async fn summary(
    ledger: &dyn LedgerQueries,
    farm_id: FarmId,
    range: DateRange,
) -> Result<PeriodSummary, DomainError> {
    let t = totals(ledger, farm_id, range).await?;
    Ok(PeriodSummary::new(t.revenue, t.costs()))
}

pub async fn dashboard(
    ledger: &dyn LedgerQueries,
    principal: &Principal,
    today: NaiveDate,
) -> Result<Dashboard, DomainError> {
    let farm_id = require_farm(principal)?;

    let unpaid = ledger.unpaid_sales(farm_id).await?;
    let total_debt = unpaid.iter().map(|s| s.total_amount).sum();

    Ok(Dashboard {
        today: summary(ledger, farm_id, DateRange::single_day(today)).await?,
        this_month: summary(ledger, farm_id, DateRange::month_of(today)).await?,
        total_debt,
        recent_sales: ledger.recent_sales(farm_id, RECENT_LIMIT).await?,
        recent_purchases: ledger.recent_purchases(farm_id, RECENT_LIMIT).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{AmountRow, CustomerRef, ExpenseRow, PaymentStatus, PurchaseView, SaleView};
    use crate::domain::Role;
    use async_trait::async_trait;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn member(farm_id: Option<FarmId>) -> Principal {
        Principal {
            id: 1,
            role: Role::Staff,
            farm_id,
        }
    }

    fn sale(id: i32, farm_id: FarmId, customer_id: i32, date: &str, total: &str, status: PaymentStatus) -> SaleView {
        SaleView {
            id,
            farm_id,
            customer_id,
            product_type_id: 1,
            weight: dec("1.00"),
            unit_price: dec(total),
            total_amount: dec(total),
            sale_date: day(date),
            payment_status: status,
            notes: None,
            created_at: format!("2024-05-01T00:00:{id:02}.000000Z"),
            updated_at: String::new(),
            customer: Some(CustomerRef {
                id: customer_id,
                name: format!("customer {customer_id}"),
                phone: None,
                address: None,
            }),
            product_type: None,
        }
    }

    /// In-memory ledger; counts queries so per-day behaviour is visible
    #[derive(Default)]
    struct FakeLedger {
        sales: Vec<SaleView>,
        purchases: Vec<(FarmId, AmountRow)>,
        expenses: Vec<(FarmId, ExpenseRow)>,
        queries: AtomicUsize,
    }

    impl FakeLedger {
        fn hit(&self) {
            self.queries.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl LedgerQueries for FakeLedger {
        async fn paid_sales(&self, farm_id: FarmId, range: DateRange) -> Result<Vec<AmountRow>, DomainError> {
            self.hit();
            Ok(self
                .sales
                .iter()
                .filter(|s| s.farm_id == farm_id && s.payment_status == PaymentStatus::Paid)
                .filter(|s| range.contains(s.sale_date))
                .map(|s| AmountRow { date: s.sale_date, amount: s.total_amount })
                .collect())
        }

        async fn purchase_costs(&self, farm_id: FarmId, range: DateRange) -> Result<Vec<AmountRow>, DomainError> {
            self.hit();
            Ok(self
                .purchases
                .iter()
                .filter(|(f, row)| *f == farm_id && range.contains(row.date))
                .map(|(_, row)| *row)
                .collect())
        }

        async fn expenses(&self, farm_id: FarmId, range: DateRange) -> Result<Vec<ExpenseRow>, DomainError> {
            self.hit();
            Ok(self
                .expenses
                .iter()
                .filter(|(f, row)| *f == farm_id && range.contains(row.date))
                .map(|(_, row)| row.clone())
                .collect())
        }

        async fn unpaid_sales(&self, farm_id: FarmId) -> Result<Vec<SaleView>, DomainError> {
            self.hit();
            Ok(self
                .sales
                .iter()
                .filter(|s| s.farm_id == farm_id && s.payment_status == PaymentStatus::Unpaid)
                .cloned()
                .collect())
        }

        async fn recent_sales(&self, farm_id: FarmId, limit: u64) -> Result<Vec<SaleView>, DomainError> {
            self.hit();
            let mut rows: Vec<SaleView> = self.sales.iter().filter(|s| s.farm_id == farm_id).cloned().collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn recent_purchases(&self, _farm_id: FarmId, _limit: u64) -> Result<Vec<PurchaseView>, DomainError> {
            self.hit();
            Ok(Vec::new())
        }
    }

    fn ledger() -> FakeLedger {
        use PaymentStatus::*;
        FakeLedger {
            sales: vec![
                sale(1, 1, 10, "2024-05-01", "1000.00", Paid),
                sale(2, 1, 10, "2024-05-01", "500.50", Paid),
                sale(3, 1, 11, "2024-05-03", "300.00", Unpaid),
                sale(4, 1, 12, "2024-05-03", "900.00", Unpaid),
                sale(5, 1, 11, "2024-05-04", "700.00", Unpaid),
                sale(6, 1, 10, "2024-05-04", "250.00", Paid),
                sale(7, 2, 20, "2024-05-01", "99999.00", Paid),
                sale(8, 2, 20, "2024-05-01", "88888.00", Unpaid),
            ],
            purchases: vec![
                (1, AmountRow { date: day("2024-05-01"), amount: dec("400.00") }),
                (1, AmountRow { date: day("2024-05-02"), amount: dec("120.25") }),
                (2, AmountRow { date: day("2024-05-02"), amount: dec("5000.00") }),
            ],
            expenses: vec![
                (1, ExpenseRow { date: day("2024-05-02"), expense_type: "ice".into(), amount: dec("30.00") }),
                (1, ExpenseRow { date: day("2024-05-04"), expense_type: "fuel".into(), amount: dec("80.00") }),
                (1, ExpenseRow { date: day("2024-05-04"), expense_type: "ice".into(), amount: dec("10.00") }),
                (2, ExpenseRow { date: day("2024-05-04"), expense_type: "ice".into(), amount: dec("777.00") }),
            ],
            ..Default::default()
        }
    }

    fn may(from: &str, to: &str) -> DateRange {
        DateRange::new(day(from), day(to)).unwrap()
    }

    #[tokio::test]
    async fn revenue_counts_paid_sales_of_own_farm() {
        let ledger = ledger();
        let report = revenue(&ledger, &member(Some(1)), may("2024-05-01", "2024-05-31")).await.unwrap();

        assert_eq!(report.total_revenue, dec("1750.50"));
        assert_eq!(report.daily_revenue.len(), 2);
        assert_eq!(report.daily_revenue[0].date, day("2024-05-01"));
        assert_eq!(report.daily_revenue[0].amount, dec("1500.50"));
        assert_eq!(report.period.end_date, day("2024-05-31"));
    }

    #[tokio::test]
    async fn expenses_split_by_type_and_purchases() {
        let ledger = ledger();
        let report = expenses(&ledger, &member(Some(1)), may("2024-05-01", "2024-05-31")).await.unwrap();

        assert_eq!(report.total_expenses, dec("120.00"));
        assert_eq!(report.total_purchase_costs, dec("520.25"));
        assert_eq!(report.total_costs, dec("640.25"));
        assert_eq!(report.expenses_by_type[0].expense_type, "fuel");
        assert_eq!(report.expenses_by_type[1].total, dec("40.00"));
        assert_eq!(report.purchase_costs.len(), 2);
    }

    #[tokio::test]
    async fn daily_profit_sums_to_period_profit() {
        let ledger = ledger();
        let range = may("2024-04-29", "2024-05-05");
        let report = profit(&ledger, &member(Some(1)), range).await.unwrap();

        assert_eq!(report.daily_data.len(), 7);
        let summed: Decimal = report.daily_data.iter().map(|d| d.profit).sum();
        assert_eq!(summed, report.profit);
        assert_eq!(report.total_revenue, dec("1750.50"));
        assert_eq!(report.total_costs, dec("640.25"));
        assert_eq!(report.profit, dec("1110.25"));

        let first = &report.daily_data[2];
        assert_eq!(first.date, day("2024-05-01"));
        assert_eq!(first.profit, dec("1100.50"));
    }

    #[tokio::test]
    async fn profit_queries_each_day() {
        let ledger = ledger();
        profit(&ledger, &member(Some(1)), may("2024-05-01", "2024-05-03")).await.unwrap();
        // three queries for the period, three more for each of the three days
        assert_eq!(ledger.queries.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn debts_are_ranked() {
        let ledger = ledger();
        let report = debts(&ledger, &member(Some(1))).await.unwrap();

        let ids: Vec<i32> = report.customers_with_debt.iter().map(|d| d.customer.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(report.customers_with_debt[0].total_debt, dec("1000.00"));
        assert_eq!(report.customers_with_debt[0].sales_count, 2);
        assert_eq!(report.total_debt, dec("1900.00"));
    }

    #[tokio::test]
    async fn dashboard_summarises_today_and_month() {
        let ledger = ledger();
        let board = dashboard(&ledger, &member(Some(1)), day("2024-05-04")).await.unwrap();

        assert_eq!(board.today.revenue, dec("250.00"));
        assert_eq!(board.today.expenses, dec("90.00"));
        assert_eq!(board.today.profit, dec("160.00"));
        assert_eq!(board.this_month.revenue, dec("1750.50"));
        assert_eq!(board.this_month.profit, dec("1110.25"));
        assert_eq!(board.total_debt, dec("1900.00"));
        assert_eq!(board.recent_sales.len(), 5);
        assert_eq!(board.recent_sales[0].id, 6);
    }

    #[tokio::test]
    async fn reports_need_a_farm() {
        let ledger = ledger();
        let range = may("2024-05-01", "2024-05-31");
        assert!(matches!(
            revenue(&ledger, &member(None), range).await,
            Err(DomainError::Authorization)
        ));
        assert!(matches!(debts(&ledger, &member(None)).await, Err(DomainError::Authorization)));
        assert_eq!(ledger.queries.load(Ordering::SeqCst), 0);
    }
}
