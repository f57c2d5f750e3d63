//! Services Layer
//!
//! Business logic behind the HTTP handlers. Every tenant-scoped operation takes
//! the resolved `Principal` and checks it through `domain::access` before
//! reading or writing ledger rows.

pub mod boat_service;
pub mod customer_service;
pub mod expense_service;
pub mod farm_service;
pub mod product_type_service;
pub mod purchase_service;
pub mod report_service;
pub mod sale_service;
pub mod tenant_service;

use chrono::{SecondsFormat, Utc};

/// Fixed-width RFC3339 timestamp, so stored values sort lexically
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Trim optional free text, mapping blank input to `None`
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Purchases and sales may only reference rows of their own farm. A missing
/// row and another tenant's row are reported the same way.
pub(crate) fn same_farm<T>(
    field: &str,
    farm_id: crate::domain::FarmId,
    found: Option<T>,
    farm_of: impl Fn(&T) -> crate::domain::FarmId,
) -> Result<T, crate::domain::DomainError> {
    match found {
        Some(row) if farm_of(&row) == farm_id => Ok(row),
        _ => Err(crate::domain::DomainError::invalid(
            field,
            format!("The selected {field} is invalid."),
        )),
    }
}
