//! Conversions between decimal amounts and the integer cents stored in the
//! database.
//!
//! Persisting cents keeps SQL aggregation in exact integer arithmetic, so
//! repeated sums of small amounts can never accumulate binary floating-point
//! error.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::Error;

/// Convert an amount to whole cents, rounding half away from zero to two
/// decimal places.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the amount rounds to zero or less, or is
/// too large to represent as cents.
pub fn to_cents(amount: Decimal) -> Result<i64, Error> {
    let cents = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or(Error::InvalidAmount)?;

    if cents <= 0 {
        return Err(Error::InvalidAmount);
    }

    Ok(cents)
}

/// Convert whole cents back to a two-fraction-digit decimal amount.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod money_tests {
    use rust_decimal::Decimal;

    use crate::Error;

    use super::{from_cents, to_cents};

    #[test]
    fn converts_exact_two_digit_amounts() {
        assert_eq!(to_cents(Decimal::new(1050, 2)), Ok(1050));
        assert_eq!(to_cents(Decimal::new(1, 2)), Ok(1));
    }

    #[test]
    fn rounds_excess_precision_half_away_from_zero() {
        // 1.005 -> 1.01
        assert_eq!(to_cents(Decimal::new(1005, 3)), Ok(101));
        // 1.004 -> 1.00
        assert_eq!(to_cents(Decimal::new(1004, 3)), Ok(100));
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_eq!(to_cents(Decimal::ZERO), Err(Error::InvalidAmount));
        assert_eq!(to_cents(Decimal::new(-1050, 2)), Err(Error::InvalidAmount));
    }

    #[test]
    fn rejects_amounts_that_round_to_zero() {
        // 0.001 is positive but rounds to zero cents.
        assert_eq!(to_cents(Decimal::new(1, 3)), Err(Error::InvalidAmount));
    }

    #[test]
    fn round_trips_cents() {
        let amount = from_cents(4950);

        assert_eq!(amount, Decimal::new(4950, 2));
        assert_eq!(to_cents(amount), Ok(4950));
    }
}
