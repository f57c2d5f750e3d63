//! Fixed-point amounts and calendar dates as stored in TEXT columns, and the
//! field checks that keep them storable

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::{ValidationError, ValidationErrors};

use super::pricing::AMOUNT_SCALE;
use super::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest weight, decimal(10,2)
pub const MAX_WEIGHT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);
/// Largest price, total or expense amount, decimal(15,2)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Business dates render as four-digit years so stored TEXT sorts by date
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Canonical storage form, always `AMOUNT_SCALE` decimal places
pub fn to_stored(value: Decimal) -> String {
    let mut value = value;
    value.rescale(AMOUNT_SCALE);
    value.to_string()
}

pub fn from_stored(raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw)
        .map_err(|e| DomainError::Internal(format!("corrupt amount {raw:?}: {e}")))
}

pub fn date_to_stored(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_from_stored(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DomainError::Internal(format!("corrupt date {raw:?}: {e}")))
}

fn check_amount(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must be greater than or equal to 0".into());
        return Err(err);
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        let mut err = ValidationError::new("scale");
        err.message = Some("must have at most 2 decimal places".into());
        return Err(err);
    }
    if *value > max {
        let mut err = ValidationError::new("max");
        err.message = Some(format!("must not exceed {max}").into());
        return Err(err);
    }
    Ok(())
}

/// `validator` hook for unit prices and expense amounts
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    check_amount(value, MAX_AMOUNT)
}

pub fn validate_weight(value: &Decimal) -> Result<(), ValidationError> {
    check_amount(value, MAX_WEIGHT)
}

pub fn validate_business_date(value: &NaiveDate) -> Result<(), ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&value.year()) {
        return Ok(());
    }
    let mut err = ValidationError::new("date_range");
    err.message = Some(format!("year must be between {MIN_YEAR} and {MAX_YEAR}").into());
    Err(err)
}

/// Required free text: whitespace alone does not count
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Field checks for partial updates; absent fields are not checked
#[derive(Default)]
pub struct OptionalChecks(ValidationErrors);

impl OptionalChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T>(
        mut self,
        field: &'static str,
        value: Option<&T>,
        rule: fn(&T) -> Result<(), ValidationError>,
    ) -> Self {
        if let Some(Err(e)) = value.map(rule) {
            self.0.add(field, e);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_amounts_are_rescaled() {
        assert_eq!(to_stored(Decimal::from(15)), "15.00");
        assert_eq!(to_stored(Decimal::from_str("7500000.5").unwrap()), "7500000.50");
        assert_eq!(from_stored("15.00").unwrap(), Decimal::from(15));
        assert!(from_stored("fifteen").is_err());
    }

    #[test]
    fn dates_use_iso_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_to_stored(date), "2024-03-09");
        assert_eq!(date_from_stored("2024-03-09").unwrap(), date);
    }

    #[test]
    fn bounds_match_column_precision() {
        assert_eq!(MAX_WEIGHT, Decimal::from_str("99999999.99").unwrap());
        assert_eq!(MAX_AMOUNT, Decimal::from_str("9999999999999.99").unwrap());
    }

    #[test]
    fn amount_validation() {
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::from_str("150000.00").unwrap()).is_ok());
        assert!(validate_amount(&Decimal::from_str("1.2300").unwrap()).is_ok());
        assert!(validate_amount(&MAX_AMOUNT).is_ok());
        assert_eq!(
            validate_amount(&Decimal::from_str("-0.01").unwrap()).unwrap_err().code,
            "non_negative"
        );
        assert_eq!(
            validate_amount(&Decimal::from_str("1.005").unwrap()).unwrap_err().code,
            "scale"
        );
        assert_eq!(
            validate_amount(&Decimal::from_str("1000000000000000").unwrap()).unwrap_err().code,
            "max"
        );
    }

    #[test]
    fn weight_has_its_own_ceiling() {
        assert!(validate_weight(&MAX_WEIGHT).is_ok());
        assert_eq!(
            validate_weight(&Decimal::from_str("100000000.00").unwrap()).unwrap_err().code,
            "max"
        );
    }

    #[test]
    fn business_dates_keep_four_digit_years() {
        assert!(validate_business_date(&NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).is_ok());
        assert!(validate_business_date(&NaiveDate::from_ymd_opt(9999, 12, 31).unwrap()).is_ok());
        assert!(validate_business_date(&NaiveDate::from_ymd_opt(10000, 1, 1).unwrap()).is_err());
        assert!(validate_business_date(&NaiveDate::from_ymd_opt(0, 1, 1).unwrap()).is_err());
        assert!(validate_business_date(&NaiveDate::MAX).is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(not_blank("Tàu Một").is_ok());
        assert_eq!(not_blank("   ").unwrap_err().code, "required");
        assert!(not_blank("").is_err());
    }

    #[test]
    fn optional_checks_skip_absent_fields() {
        assert!(OptionalChecks::new()
            .check("weight", None, validate_weight)
            .check("unit_price", None, validate_amount)
            .finish()
            .is_ok());
        let minus_one = Decimal::from(-1);
        let ten = Decimal::from(10);
        let errors = OptionalChecks::new()
            .check("weight", Some(&minus_one), validate_weight)
            .check("unit_price", Some(&ten), validate_amount)
            .finish()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("weight"));
        assert!(!fields.contains_key("unit_price"));
    }
}
