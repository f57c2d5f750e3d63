//! Access guard for tenant-scoped records
//!
//! A farm is the unit of data isolation. Every ledger read or write is checked
//! against the farm the principal acts within; the decision is a pure function
//! over already-resolved principal state.

use serde::{Deserialize, Serialize};

use super::DomainError;

pub type FarmId = i32;
pub type UserId = i32;

/// Account role stored on `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "staff" => Some(Role::Staff),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// The authenticated actor performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub farm_id: Option<FarmId>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The farm a principal may act within, if any
pub fn accessible_farm_id(principal: &Principal) -> Option<FarmId> {
    principal.farm_id
}

/// Strict tenant equality. No role-based override: an admin only reaches the
/// farm recorded on its own `farm_id`.
pub fn has_access_to_farm(principal: &Principal, farm_id: Option<FarmId>) -> bool {
    match (farm_id, principal.farm_id) {
        (Some(target), Some(own)) => target == own,
        _ => false,
    }
}

/// Resolve the tenant for a tenant-scoped operation, failing when the
/// principal has none.
pub fn require_farm(principal: &Principal) -> Result<FarmId, DomainError> {
    accessible_farm_id(principal).ok_or_else(|| {
        tracing::warn!(user_id = principal.id, "principal has no farm");
        DomainError::Authorization
    })
}

/// Check a loaded record's farm against the principal.
///
/// `None` covers both "record absent" and "record without a farm", so a caller
/// cannot tell another tenant's record from a missing one.
pub fn authorize(principal: &Principal, record_farm_id: Option<FarmId>) -> Result<(), DomainError> {
    if has_access_to_farm(principal, record_farm_id) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = principal.id,
            farm_id = ?principal.farm_id,
            target = ?record_farm_id,
            "access denied"
        );
        Err(DomainError::Authorization)
    }
}

/// Load-then-authorize helper for tenant-scoped lookups by id
pub fn authorize_record<T>(
    principal: &Principal,
    record: Option<T>,
    farm_of: impl Fn(&T) -> Option<FarmId>,
) -> Result<T, DomainError> {
    let farm_id = record.as_ref().and_then(&farm_of);
    authorize(principal, farm_id)?;
    record.ok_or(DomainError::Authorization)
}
