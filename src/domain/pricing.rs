//! Pricing rule: `total_amount = weight * unit_price`
//!
//! Applied explicitly right before every purchase/sale insert or update. A
//! caller-supplied total is never an input here.

use rust_decimal::{Decimal, RoundingStrategy};

use super::amount::MAX_AMOUNT;
use super::DomainError;

/// Decimal places kept for weights, unit prices and totals
pub const AMOUNT_SCALE: u32 = 2;

/// A priced line as it will be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub weight: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
}

/// Total for a weight and unit price, at storage precision. `None` when the
/// product does not fit a stored total.
pub fn line_total(weight: Decimal, unit_price: Decimal) -> Option<Decimal> {
    weight
        .checked_mul(unit_price)
        .map(|total| total.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero))
        .filter(|total| *total <= MAX_AMOUNT)
}

pub fn price_line(weight: Decimal, unit_price: Decimal) -> Result<PricedLine, DomainError> {
    let total_amount = line_total(weight, unit_price).ok_or_else(|| {
        DomainError::invalid("total_amount", format!("must not exceed {MAX_AMOUNT}"))
    })?;
    Ok(PricedLine {
        weight,
        unit_price,
        total_amount,
    })
}

/// Reprice after a partial update: any field left out keeps its stored value,
/// and the total always follows the post-update pair.
pub fn reprice(
    current_weight: Decimal,
    current_unit_price: Decimal,
    new_weight: Option<Decimal>,
    new_unit_price: Option<Decimal>,
) -> Result<PricedLine, DomainError> {
    price_line(
        new_weight.unwrap_or(current_weight),
        new_unit_price.unwrap_or(current_unit_price),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn total_is_weight_times_price() {
        let line = price_line(dec("100.00"), dec("150000.00")).unwrap();
        assert_eq!(line.total_amount, dec("15000000.00"));
    }

    #[test]
    fn partial_weight_update_keeps_stored_price() {
        let line = reprice(dec("100.00"), dec("150000.00"), Some(dec("50.00")), None).unwrap();
        assert_eq!(line.weight, dec("50.00"));
        assert_eq!(line.unit_price, dec("150000.00"));
        assert_eq!(line.total_amount, dec("7500000.00"));
    }

    #[test]
    fn partial_price_update_keeps_stored_weight() {
        let line = reprice(dec("12.50"), dec("80000"), None, Some(dec("90000"))).unwrap();
        assert_eq!(line.total_amount, dec("1125000"));
    }

    #[test]
    fn untouched_update_still_recomputes() {
        let line = reprice(dec("3.33"), dec("3.33"), None, None).unwrap();
        assert_eq!(line.total_amount, dec("11.09"));
    }

    #[test]
    fn no_floating_point_drift() {
        // 0.1 * 0.3 in binary floating point is 0.030000000000000002
        let line = price_line(dec("0.10"), dec("0.30")).unwrap();
        assert_eq!(line.total_amount, dec("0.03"));
        assert_eq!(line_total(dec("0.05"), dec("0.10")), Some(dec("0.01")));
    }

    #[test]
    fn oversized_totals_are_rejected() {
        assert_eq!(line_total(dec("1000000000000000"), dec("1000000000000000")), None);
        assert_eq!(line_total(Decimal::MAX, dec("2")), None);
        match price_line(dec("99999999.99"), dec("9999999999999.99")) {
            Err(DomainError::Validation(errors)) => assert!(errors.contains_key("total_amount")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(price_line(dec("100.00"), dec("99999999999.99")).is_ok());
    }
}
