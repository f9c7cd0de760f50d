//! Coupons

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

use crate::discounts::DiscountKind;

pub mod rules;
pub mod store;
pub mod validation;

pub use rules::{BogoTarget, BogoTerms, CouponRule, DEFAULT_GROUP, GroupOp, ScopeType};

new_key_type! {
    /// Coupon Key
    pub struct CouponKey;
}

/// Coupon lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    /// Can be redeemed.
    #[default]
    Active,

    /// Soft-disabled by an administrator.
    Inactive,

    /// Retired; kept for order history.
    Archived,
}

/// Normalize a raw coupon code: trim surrounding whitespace and upper-case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A promotional code and the rules it applies with.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    code: String,
    status: CouponStatus,
    discount: DiscountKind<'a>,
    max_discount: Option<Money<'a, Currency>>,
    currency: Option<&'static Currency>,
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
    rules: Vec<CouponRule<'a>>,
}

impl<'a> Coupon<'a> {
    /// Create an active coupon with no rules and no validity window.
    ///
    /// The code is stored normalized (see [`normalize_code`]).
    pub fn new(code: &str, discount: DiscountKind<'a>) -> Self {
        Self {
            code: normalize_code(code),
            status: CouponStatus::Active,
            discount,
            max_discount: None,
            currency: None,
            starts_at: None,
            ends_at: None,
            rules: Vec::new(),
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: CouponStatus) -> Self {
        self.status = status;
        self
    }

    /// Cap the discount.
    #[must_use]
    pub fn with_max_discount(mut self, max_discount: Money<'a, Currency>) -> Self {
        self.max_discount = Some(max_discount);
        self
    }

    /// Restrict the coupon to carts in a currency.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Set the validity window. Either end may be open.
    #[must_use]
    pub fn with_window(mut self, starts_at: Option<Timestamp>, ends_at: Option<Timestamp>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: CouponRule<'a>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Replace the rule list.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<Vec<CouponRule<'a>>>) -> Self {
        self.rules = rules.into();
        self
    }

    /// Normalized code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Status
    pub fn status(&self) -> CouponStatus {
        self.status
    }

    /// Discount kind
    pub fn discount(&self) -> &DiscountKind<'a> {
        &self.discount
    }

    /// Maximum discount cap
    pub fn max_discount(&self) -> Option<&Money<'a, Currency>> {
        self.max_discount.as_ref()
    }

    /// Currency restriction
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Start of the validity window
    pub fn starts_at(&self) -> Option<Timestamp> {
        self.starts_at
    }

    /// End of the validity window
    pub fn ends_at(&self) -> Option<Timestamp> {
        self.ends_at
    }

    /// Rules, in definition order
    pub fn rules(&self) -> &[CouponRule<'a>] {
        &self.rules
    }

    /// Whether the coupon can be used on a cart priced in `currency`.
    ///
    /// Every monetary value on the coupon (fixed amount, cap, rule minimums)
    /// must be in that currency, as well as the explicit restriction if set.
    pub fn accepts_currency(&self, currency: &Currency) -> bool {
        let amount = match &self.discount {
            DiscountKind::Amount(amount) => Some(amount),
            DiscountKind::Percent(_) | DiscountKind::Bogo => None,
        };

        self.currency.is_none_or(|own| own == currency)
            && amount
                .into_iter()
                .chain(self.max_discount.as_ref())
                .chain(self.rules.iter().filter_map(|rule| rule.min_amount.as_ref()))
                .all(|money| money.currency() == currency)
    }
}
