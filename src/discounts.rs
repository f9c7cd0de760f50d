//! Discounts
//!
//! Discount kinds carried by coupons and the arithmetic shared by the
//! discount engines.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// How a coupon discounts the qualifying part of a cart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DiscountKind<'a> {
    /// Deduct a fixed amount once (e.g., "£10 off").
    Amount(Money<'a, Currency>),

    /// Deduct a percentage of the qualifying amount (e.g., "15% off").
    Percent(Percentage),

    /// Give away units according to the coupon's buy-X-get-Y rules.
    Bogo,
}

impl DiscountKind<'_> {
    /// Short, upper-case name of the discount kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Amount(_) => "AMOUNT",
            DiscountKind::Percent(_) => "PERCENT",
            DiscountKind::Bogo => "BOGO",
        }
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero to whole minor units.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Clamp a discount to a cap, when the cap is positive.
///
/// A zero or negative cap means "no cap".
pub fn cap_minor(discount: i64, cap: Option<i64>) -> i64 {
    match cap {
        Some(cap) if cap > 0 && discount > cap => cap,
        _ => discount,
    }
}
