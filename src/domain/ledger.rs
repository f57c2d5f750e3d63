//! Ledger value types shared by the CRUD services and the report engine

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::access::FarmId;

/// Canonical payment states. No partial-payment amount is tracked anywhere,
/// so there is no `partial` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(PaymentStatus::Paid),
            "unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

/// Id + display name of a related record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRef {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A sale with its customer and product type loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleView {
    pub id: i32,
    pub farm_id: FarmId,
    pub customer_id: i32,
    pub product_type_id: i32,
    pub weight: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub sale_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub customer: Option<CustomerRef>,
    pub product_type: Option<NamedRef>,
}

/// A purchase with its boat and product type loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseView {
    pub id: i32,
    pub farm_id: FarmId,
    pub boat_id: i32,
    pub product_type_id: i32,
    pub weight: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub boat: Option<NamedRef>,
    pub product_type: Option<NamedRef>,
}

/// One dated amount as read from the ledger (a paid sale total, a purchase
/// total, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    pub date: NaiveDate,
    pub expense_type: String,
    pub amount: Decimal,
}
