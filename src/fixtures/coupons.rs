//! Coupon Fixtures

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    coupons::{
        BogoTarget, BogoTerms, Coupon, CouponRule, CouponStatus, DEFAULT_GROUP, GroupOp,
        ScopeType, store::CouponCatalog,
    },
    discounts::DiscountKind,
    fixtures::{
        FixtureError,
        money::{parse_currency, parse_money, parse_percentage},
    },
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon code -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Status (defaults to active)
    #[serde(default)]
    pub status: CouponStatus,

    /// Discount configuration
    pub discount: DiscountFixture,

    /// Maximum discount (e.g., "30.00 GBP")
    #[serde(default)]
    pub max_discount: Option<String>,

    /// ISO code of the only currency the coupon applies to
    #[serde(default)]
    pub currency: Option<String>,

    /// Start of the validity window
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// End of the validity window
    #[serde(default)]
    pub ends_at: Option<Timestamp>,

    /// Rules
    #[serde(default)]
    pub rules: Vec<RuleFixture>,
}

/// Discount fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Fixed amount off
    Amount {
        /// Amount (e.g., "10.00 GBP")
        value: String,
    },

    /// Percentage off
    Percent {
        /// Percentage (e.g., "15%" or "0.15")
        value: String,
    },

    /// Buy-X-get-Y, configured on the rules
    Bogo,
}

/// Rule fixture from YAML
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Scope type
    pub scope: ScopeType,

    /// Product or category id
    #[serde(default)]
    pub value: Option<String>,

    /// Minimum matched quantity
    #[serde(default)]
    pub min_qty: Option<u32>,

    /// Minimum matched amount (e.g., "50.00 GBP")
    #[serde(default)]
    pub min_amount: Option<String>,

    /// Group number
    #[serde(default = "default_group")]
    pub group: u32,

    /// Group operator
    #[serde(default)]
    pub op: Option<GroupOp>,

    /// Buy-X-get-Y terms
    #[serde(default)]
    pub bogo: Option<BogoFixture>,
}

/// BOGO terms fixture from YAML
#[derive(Debug, Deserialize)]
pub struct BogoFixture {
    /// Units to buy
    pub buy: u32,

    /// Units given free
    pub get: u32,

    /// Same-product offer marker (informational)
    #[serde(default)]
    pub same_item_only: bool,

    /// Where free units come from
    #[serde(default)]
    pub target: Option<BogoTarget>,
}

fn default_group() -> u32 {
    DEFAULT_GROUP
}

/// Tracks the single currency used by one coupon's money values.
#[derive(Debug, Default)]
struct CurrencyGuard {
    currency: Option<&'static Currency>,
}

impl CurrencyGuard {
    fn check(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }

    fn money(&mut self, s: &str) -> Result<Money<'static, Currency>, FixtureError> {
        let money = parse_money(s)?;
        self.check(money.currency())?;

        Ok(money)
    }
}

impl CouponFixture {
    /// Convert to a [`Coupon`] stored under `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage is invalid, or the coupon's
    /// money values use more than one currency.
    pub fn try_into_coupon(self, code: &str) -> Result<Coupon<'static>, FixtureError> {
        let mut guard = CurrencyGuard::default();

        let restricted = self.currency.as_deref().map(parse_currency).transpose()?;
        if let Some(currency) = restricted {
            guard.check(currency)?;
        }

        let discount = match self.discount {
            DiscountFixture::Amount { value } => DiscountKind::Amount(guard.money(&value)?),
            DiscountFixture::Percent { value } => DiscountKind::Percent(parse_percentage(&value)?),
            DiscountFixture::Bogo => DiscountKind::Bogo,
        };

        let mut coupon = Coupon::new(code, discount)
            .with_status(self.status)
            .with_window(self.starts_at, self.ends_at);

        if let Some(max_discount) = self.max_discount.as_deref() {
            coupon = coupon.with_max_discount(guard.money(max_discount)?);
        }

        if let Some(currency) = restricted {
            coupon = coupon.with_currency(currency);
        }

        let rules = self
            .rules
            .into_iter()
            .map(|rule| rule.try_into_rule(&mut guard))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(coupon.with_rules(rules))
    }
}

impl RuleFixture {
    fn try_into_rule(self, guard: &mut CurrencyGuard) -> Result<CouponRule<'static>, FixtureError> {
        let mut rule = CouponRule::with_scope(self.scope, self.value).in_group(self.group);

        rule.min_qty = self.min_qty;
        rule.group_op = self.op;
        rule.min_amount = self
            .min_amount
            .as_deref()
            .map(|amount| guard.money(amount))
            .transpose()?;

        rule.bogo = self.bogo.map(|bogo| BogoTerms {
            buy_qty: bogo.buy,
            get_qty: bogo.get,
            same_item_only: bogo.same_item_only,
            target: bogo.target,
        });

        Ok(rule)
    }
}

impl TryFrom<CouponsFixture> for CouponCatalog {
    type Error = FixtureError;

    fn try_from(fixture: CouponsFixture) -> Result<Self, Self::Error> {
        let mut catalog = CouponCatalog::new();

        for (code, coupon_fixture) in fixture.coupons {
            catalog.insert(coupon_fixture.try_into_coupon(&code)?)?;
        }

        Ok(catalog)
    }
}
