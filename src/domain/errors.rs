//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP mapping lives in `api::error`.

use std::collections::BTreeMap;

use thiserror::Error;

/// Violated constraints keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Bad credentials or missing/invalid token
    #[error("Invalid credentials")]
    Authentication,
    /// Tenant mismatch or missing principal
    #[error("Unauthorized")]
    Authorization,
    /// Schema, range or enum violations, keyed by field
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),
    /// Operation blocked by dependent records
    #[error("{0}")]
    Conflict(String),
    /// Resource not found (only where no tenant check applies)
    #[error("{0} not found")]
    NotFound(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        DomainError::Validation(errors)
    }

    pub fn not_found(what: &str) -> Self {
        DomainError::NotFound(what.to_string())
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, failures) in e.field_errors() {
            let messages = failures
                .iter()
                .map(|failure| match &failure.message {
                    Some(message) => message.to_string(),
                    None => format!("failed `{}` check", failure.code),
                })
                .collect();
            errors.insert(field.to_string(), messages);
        }
        DomainError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let mut source = ValidationErrors::new();
        source.add("weight", ValidationError::new("non_negative"));
        let mut named = ValidationError::new("length");
        named.message = Some("name is required".into());
        source.add("name", named);

        match DomainError::from(source) {
            DomainError::Validation(errors) => {
                assert_eq!(errors["weight"], vec!["failed `non_negative` check"]);
                assert_eq!(errors["name"], vec!["name is required"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
