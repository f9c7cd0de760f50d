//! Coupon Evaluation
//!
//! Resolves rule scopes over a cart, combines them per group and computes the
//! discount a coupon earns. Evaluation is pure: the same coupon and cart
//! always give the same discount, and an inapplicable coupon is a zero
//! discount rather than an error.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::Cart,
    coupons::{
        Coupon,
        store::CouponStore,
        validation::{CouponError, validate_coupon_at},
    },
    discounts::DiscountKind,
};

pub mod amount;
pub mod bogo;
pub mod groups;
pub mod scope;

pub use amount::{apply_amount_or_percent, scope_amount_minor};
pub use bogo::apply_bogo;
pub use groups::{GroupOutcome, RuleGroup, group_rules};
pub use scope::{SlotSet, resolve_scope};

/// Compute a coupon's discount, dispatching on its discount kind.
pub fn apply_coupon<'a>(coupon: &Coupon<'_>, cart: &Cart<'a>) -> Money<'a, Currency> {
    match coupon.discount() {
        DiscountKind::Amount(_) | DiscountKind::Percent(_) => apply_amount_or_percent(coupon, cart),
        DiscountKind::Bogo => apply_bogo(coupon, cart),
    }
}

/// A coupon applied to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponApplication<'a> {
    code: String,
    kind: &'static str,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> CouponApplication<'a> {
    /// Apply a validated coupon to a cart.
    ///
    /// The total is the subtotal less the discount, never below zero.
    pub fn new(coupon: &Coupon<'_>, cart: &Cart<'a>) -> Self {
        let subtotal = cart.subtotal_minor();
        let discount = apply_coupon(coupon, cart).to_minor_units();
        let total = subtotal.saturating_sub(discount).max(0);

        Self {
            code: coupon.code().to_string(),
            kind: coupon.discount().as_str(),
            subtotal: Money::from_minor(subtotal, cart.currency()),
            discount: Money::from_minor(discount, cart.currency()),
            total: Money::from_minor(total, cart.currency()),
        }
    }

    /// Coupon code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Discount kind name
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Cart subtotal before the discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount earned
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable after the discount
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Whether the coupon discounted anything.
    pub fn is_applied(&self) -> bool {
        self.discount.to_minor_units() > 0
    }
}

/// Validate `code` as of `now` and apply the coupon to `cart`.
///
/// # Errors
///
/// Returns a [`CouponError`] if the code fails validation.
pub fn redeem<'a, S>(
    store: &S,
    code: &str,
    cart: &Cart<'a>,
    now: Timestamp,
) -> Result<CouponApplication<'a>, CouponError>
where
    S: CouponStore + ?Sized,
{
    let coupon = validate_coupon_at(store, code, now)?;

    Ok(CouponApplication::new(&coupon, cart))
}
