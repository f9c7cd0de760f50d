//! Buy-X-Get-Y Discounts

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    coupons::{BogoTerms, Coupon, CouponRule, ScopeType},
    engine::{groups::group_rules, scope::in_scope},
    items::CartItem,
};

/// Eligible units as `(unit price in minor units, quantity)` pairs.
type UnitPool = SmallVec<[(i64, u32); 8]>;

/// Whether a line can take part in a BOGO rule.
///
/// Product and category rules restrict eligibility only when they name a
/// scope value; otherwise every line is eligible.
fn bogo_eligible(rule: &CouponRule<'_>, item: &CartItem<'_>) -> bool {
    match (rule.scope_type, &rule.scope_value) {
        (ScopeType::Product | ScopeType::Category, Some(_)) => in_scope(rule, item),
        _ => true,
    }
}

/// Sum of the `count` cheapest units in the pool, in minor units.
fn cheapest_units_minor(pool: &mut UnitPool, count: u64) -> i64 {
    pool.sort_unstable_by_key(|(price, _)| *price);

    let mut remaining = count;
    let mut total = 0i64;

    for (price, quantity) in pool.iter() {
        if remaining == 0 {
            break;
        }

        let taken = remaining.min(u64::from(*quantity));
        remaining -= taken;

        let taken = i64::try_from(taken).unwrap_or(i64::MAX);
        total = total.saturating_add(price.saturating_mul(taken));
    }

    total
}

/// Discount earned by one pool of eligible units.
///
/// `free = floor(units / buy) * get`; the `free` cheapest units are given away.
fn pool_discount_minor(mut pool: UnitPool, terms: &BogoTerms) -> i64 {
    let total_qty: u64 = pool.iter().map(|(_, quantity)| u64::from(*quantity)).sum();
    let buy = u64::from(terms.buy_qty);

    if buy == 0 || total_qty < buy {
        return 0;
    }

    let free = (total_qty / buy).saturating_mul(u64::from(terms.get_qty));

    cheapest_units_minor(&mut pool, free)
}

/// Discount earned by one BOGO rule over every eligible unit in the cart.
///
/// Units of different products share one pool, so `same_item_only` and the
/// target scope are recorded on the terms but don't change the result.
fn rule_discount_minor(rule: &CouponRule<'_>, terms: &BogoTerms, cart: &Cart<'_>) -> i64 {
    let pool = cart
        .iter()
        .filter(|item| bogo_eligible(rule, item))
        .map(|item| (item.price().to_minor_units(), item.quantity()))
        .collect();

    pool_discount_minor(pool, terms)
}

/// Compute the discount of a BOGO coupon.
///
/// Each rule group is evaluated independently using its first rule with
/// complete BOGO terms; groups without one contribute nothing. The cheapest
/// eligible units are the ones given away. The largest group discount is
/// used, never the sum.
pub fn apply_bogo<'a>(coupon: &Coupon<'_>, cart: &Cart<'a>) -> Money<'a, Currency> {
    let zero = Money::from_minor(0, cart.currency());

    if !coupon.accepts_currency(cart.currency()) {
        warn!(
            code = coupon.code(),
            cart_currency = cart.currency().iso_alpha_code,
            "coupon currency does not match cart"
        );

        return zero;
    }

    let discount = group_rules(coupon.rules())
        .iter()
        .map(|group| {
            let Some((rule, terms)) = group
                .bogo_rule()
                .and_then(|rule| rule.bogo_terms().map(|terms| (rule, terms)))
            else {
                return 0;
            };

            let discount = rule_discount_minor(rule, terms, cart);

            debug!(
                group = group.id(),
                buy = terms.buy_qty,
                get = terms.get_qty,
                discount,
                "evaluated bogo group"
            );

            discount
        })
        .fold(0, i64::max);

    debug!(code = coupon.code(), discount, "computed bogo discount");

    Money::from_minor(discount, cart.currency())
}
