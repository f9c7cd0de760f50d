//! Amount & Percent Discounts

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    coupons::Coupon,
    discounts::{DiscountKind, cap_minor, percent_of_minor},
    engine::groups::group_rules,
};

/// The qualifying scope amount of a coupon over a cart, in minor units.
///
/// Each group is evaluated independently and the largest qualifying group
/// amount is used. Groups are never summed, so overlapping groups can't
/// discount the same units twice.
pub fn scope_amount_minor(coupon: &Coupon<'_>, cart: &Cart<'_>) -> i64 {
    group_rules(coupon.rules())
        .iter()
        .map(|group| group.evaluate(cart).scope_amount())
        .fold(0, i64::max)
}

/// Compute the discount of an `AMOUNT` or `PERCENT` coupon.
///
/// - `AMOUNT`: the fixed amount, once, however large the scope is.
/// - `PERCENT`: the percentage of the scope amount, rounded half away from
///   zero to minor units and never more than the scope amount.
///
/// The result is clamped to the coupon's maximum discount when one is set.
/// A cart without a qualifying scope, a coupon of another kind, or a
/// currency the coupon doesn't accept all yield a zero discount.
pub fn apply_amount_or_percent<'a>(coupon: &Coupon<'_>, cart: &Cart<'a>) -> Money<'a, Currency> {
    let zero = Money::from_minor(0, cart.currency());

    if !coupon.accepts_currency(cart.currency()) {
        warn!(
            code = coupon.code(),
            cart_currency = cart.currency().iso_alpha_code,
            "coupon currency does not match cart"
        );

        return zero;
    }

    let scope = scope_amount_minor(coupon, cart);

    if scope <= 0 {
        debug!(code = coupon.code(), "no qualifying scope");

        return zero;
    }

    let discount = match coupon.discount() {
        DiscountKind::Amount(amount) => amount.to_minor_units(),
        DiscountKind::Percent(percent) => match percent_of_minor(percent, scope) {
            Ok(discount) => discount.clamp(0, scope),
            Err(err) => {
                warn!(code = coupon.code(), error = %err, "percentage discount failed");

                return zero;
            }
        },
        DiscountKind::Bogo => 0,
    };

    let cap = coupon.max_discount().map(Money::to_minor_units);
    let discount = cap_minor(discount, cap).max(0);

    debug!(code = coupon.code(), scope, discount, "computed coupon discount");

    Money::from_minor(discount, cart.currency())
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        coupons::{CouponRule, GroupOp},
        items::CartItem,
    };

    use super::*;

    fn single_line(product: &str, category: &str, minor: i64, qty: u32) -> TestResult<Cart<'static>> {
        Ok(Cart::with_items(
            vec![CartItem::new(product, category, Money::from_minor(minor, GBP), qty)],
            GBP,
        )?)
    }

    fn percent(value: f64) -> DiscountKind<'static> {
        DiscountKind::Percent(Percentage::from(value))
    }

    #[test]
    fn ten_percent_of_two_hundred() -> TestResult {
        let cart = single_line("p1", "c1", 10_000, 2)?;
        let coupon = Coupon::new("TEN", percent(0.10)).with_rule(CouponRule::cart_total());

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(2_000, GBP));

        Ok(())
    }

    #[test]
    fn fifty_percent_is_capped() -> TestResult {
        let cart = single_line("p1", "c1", 20_000, 1)?;
        let coupon = Coupon::new("HALF", percent(0.50))
            .with_max_discount(Money::from_minor(3_000, GBP))
            .with_rule(CouponRule::product("p1"));

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(3_000, GBP));

        Ok(())
    }

    #[test]
    fn amount_is_flat_not_pro_rated() -> TestResult {
        let cart = single_line("p1", "c1", 20_000, 3)?;
        let coupon = Coupon::new("FLAT", DiscountKind::Amount(Money::from_minor(1_000, GBP)))
            .with_rule(CouponRule::category("c1"));

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(1_000, GBP));

        Ok(())
    }

    #[test]
    fn amount_without_matching_scope_is_zero() -> TestResult {
        let flat = || {
            Coupon::new("FLAT", DiscountKind::Amount(Money::from_minor(1_000, GBP)))
                .with_rule(CouponRule::category("keyrings"))
        };

        let other_category = single_line("p1", "c1", 20_000, 1)?;
        let empty = Cart::new(GBP);

        assert_eq!(apply_amount_or_percent(&flat(), &other_category), Money::from_minor(0, GBP));
        assert_eq!(apply_amount_or_percent(&flat(), &empty), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn coupon_without_rules_is_zero() -> TestResult {
        let cart = single_line("p1", "c1", 20_000, 1)?;
        let coupon = Coupon::new("BARE", percent(0.10));

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn groups_take_the_max_not_the_sum() -> TestResult {
        let cart = Cart::with_items(
            vec![
                CartItem::new("p1", "c1", Money::from_minor(5_000, GBP), 1),
                CartItem::new("p2", "c2", Money::from_minor(8_000, GBP), 1),
            ],
            GBP,
        )?;
        let coupon = Coupon::new("MAX", percent(1.0)).with_rules(vec![
            CouponRule::product("p1").in_group(1),
            CouponRule::product("p2").in_group(2),
        ]);

        assert_eq!(scope_amount_minor(&coupon, &cart), 8_000);
        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(8_000, GBP));

        Ok(())
    }

    #[test]
    fn and_group_with_disjoint_slots_is_zero() -> TestResult {
        // Each rule is satisfied on its own, but no slot is in both.
        let cart = Cart::with_items(
            vec![
                CartItem::new("p2", "c1", Money::from_minor(1_000, GBP), 2),
                CartItem::new("p1", "c9", Money::from_minor(1_000, GBP), 2),
            ],
            GBP,
        )?;
        let coupon = Coupon::new("AND", percent(0.10)).with_rules(vec![
            CouponRule::category("c1").with_min_qty(2).with_op(GroupOp::And),
            CouponRule::product("p1"),
        ]);

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn and_group_with_enough_shared_slots_applies() -> TestResult {
        let cart = single_line("p1", "c1", 1_000, 2)?;
        let coupon = Coupon::new("AND", percent(0.10)).with_rules(vec![
            CouponRule::category("c1").with_min_qty(2).with_op(GroupOp::And),
            CouponRule::product("p1"),
        ]);

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(200, GBP));

        Ok(())
    }

    #[test]
    fn foreign_currency_coupon_is_zero() -> TestResult {
        let cart = single_line("p1", "c1", 10_000, 1)?;
        let coupon = Coupon::new("USD", DiscountKind::Amount(Money::from_minor(1_000, USD)))
            .with_rule(CouponRule::cart_total());

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn bogo_coupon_has_no_amount_discount() -> TestResult {
        let cart = single_line("p1", "c1", 10_000, 3)?;
        let coupon = Coupon::new("BOGO", DiscountKind::Bogo).with_rule(CouponRule::cart_total());

        assert_eq!(apply_amount_or_percent(&coupon, &cart), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn repeated_calls_are_identical() -> TestResult {
        let cart = single_line("p1", "c1", 3_333, 3)?;
        let coupon = Coupon::new("SAME", percent(0.15)).with_rule(CouponRule::cart_total());

        let first = apply_amount_or_percent(&coupon, &cart);
        let second = apply_amount_or_percent(&coupon, &cart);

        assert_eq!(first, second);
        assert_eq!(first, Money::from_minor(1_500, GBP));

        Ok(())
    }

    #[test]
    fn out_of_range_percentages_stay_within_scope() -> TestResult {
        let cart = single_line("p1", "c1", 10_000, 2)?;

        let double = Coupon::new("DOUBLE", percent(2.0)).with_rule(CouponRule::cart_total());
        let negative = Coupon::new("NEG", percent(-0.5)).with_rule(CouponRule::cart_total());

        assert_eq!(apply_amount_or_percent(&double, &cart), Money::from_minor(20_000, GBP));
        assert_eq!(apply_amount_or_percent(&negative, &cart), Money::from_minor(0, GBP));

        Ok(())
    }
}
