//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum) beyond
//! error conversions. Tenant access rules, the pricing rule, report types and
//! repository traits live here.

pub mod access;
pub mod amount;
pub mod errors;
pub mod ledger;
pub mod pricing;
pub mod reports;
pub mod repositories;

pub use access::{FarmId, Principal, Role, UserId};
pub use errors::{DomainError, FieldErrors};
pub use ledger::PaymentStatus;
pub use repositories::*;
