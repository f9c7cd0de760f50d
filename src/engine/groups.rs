//! Rule Groups
//!
//! Rules are grouped by their group number. Within a group, matched slots are
//! combined with the group operator and every rule's thresholds are checked
//! against the combined set.

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    cart::Cart,
    coupons::{CouponRule, GroupOp},
    engine::scope::{SlotSet, resolve_scope},
};

/// Rules sharing a group number.
#[derive(Debug, Clone)]
pub struct RuleGroup<'r, 'a> {
    id: u32,
    op: GroupOp,
    rules: SmallVec<[&'r CouponRule<'a>; 4]>,
}

/// Result of evaluating a group against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    /// Group number
    pub group: u32,

    /// Combined matched slots
    pub slots: SlotSet,

    /// Number of matched slots
    pub quantity: u64,

    /// Sum of matched unit prices, in minor units
    pub amount: i64,

    /// Whether every rule's thresholds passed
    pub qualified: bool,
}

impl GroupOutcome {
    /// Amount the group contributes: its matched amount when qualified, otherwise zero.
    pub fn scope_amount(&self) -> i64 {
        if self.qualified { self.amount } else { 0 }
    }
}

impl<'r, 'a> RuleGroup<'r, 'a> {
    fn new(first: &'r CouponRule<'a>) -> Self {
        let mut rules = SmallVec::new();
        rules.push(first);

        Self {
            id: first.group,
            op: first.group_op.unwrap_or_default(),
            rules,
        }
    }

    /// Group number
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Operator, taken from the group's first rule
    pub fn op(&self) -> GroupOp {
        self.op
    }

    /// Member rules, in definition order
    pub fn rules(&self) -> &[&'r CouponRule<'a>] {
        &self.rules
    }

    /// The first member rule carrying complete BOGO terms.
    pub fn bogo_rule(&self) -> Option<&'r CouponRule<'a>> {
        self.rules
            .iter()
            .copied()
            .find(|rule| rule.bogo_terms().is_some())
    }

    /// Combine the member rules' matched slots with the group operator.
    pub fn combined_slots(&self, cart: &Cart<'_>) -> SlotSet {
        let mut sets = self.rules.iter().map(|rule| resolve_scope(rule, cart));

        match self.op {
            GroupOp::Or => sets.fold(SlotSet::empty(), |acc, set| acc.union(&set)),
            GroupOp::And => match sets.next() {
                Some(first) => sets.fold(first, |acc, set| acc.intersection(&set)),
                None => SlotSet::empty(),
            },
        }
    }

    /// Evaluate the group: combine slots, then check every rule's thresholds
    /// against the combined quantity and amount.
    pub fn evaluate(&self, cart: &Cart<'_>) -> GroupOutcome {
        let slots = self.combined_slots(cart);
        let quantity = slots.quantity(cart);
        let amount = slots.amount_minor(cart);

        let qualified = self.rules.iter().all(|rule| {
            let qty_ok = rule.min_qty.is_none_or(|min| quantity >= u64::from(min));
            let amount_ok = rule
                .min_amount
                .as_ref()
                .is_none_or(|min| amount >= min.to_minor_units());

            qty_ok && amount_ok
        });

        debug!(
            group = self.id,
            op = ?self.op,
            rules = self.rules.len(),
            quantity,
            amount,
            qualified,
            "evaluated coupon rule group"
        );

        GroupOutcome {
            group: self.id,
            slots,
            quantity,
            amount,
            qualified,
        }
    }
}

/// Partition rules by group number.
///
/// Groups are returned in order of first appearance; each group keeps its
/// rules in definition order.
pub fn group_rules<'r, 'a>(rules: &'r [CouponRule<'a>]) -> SmallVec<[RuleGroup<'r, 'a>; 4]> {
    let mut groups: SmallVec<[RuleGroup<'r, 'a>; 4]> = SmallVec::new();

    for rule in rules {
        match groups.iter_mut().find(|group| group.id == rule.group) {
            Some(group) => group.rules.push(rule),
            None => groups.push(RuleGroup::new(rule)),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{coupons::BogoTerms, items::CartItem};

    use super::*;

    fn cart() -> TestResult<Cart<'static>> {
        Ok(Cart::with_items(
            vec![
                CartItem::new("p1", "c1", Money::from_minor(1_000, GBP), 1),
                CartItem::new("p2", "c1", Money::from_minor(1_500, GBP), 2),
                CartItem::new("p3", "c2", Money::from_minor(4_000, GBP), 1),
            ],
            GBP,
        )?)
    }

    #[test]
    fn ungrouped_rules_share_the_default_group() {
        let rules = [CouponRule::product("p1"), CouponRule::category("c2")];

        let groups = group_rules(&rules);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.first().map(RuleGroup::id), Some(1));
        assert_eq!(groups.first().map(|group| group.rules().len()), Some(2));
    }

    #[test]
    fn groups_keep_first_appearance_order_and_first_rule_operator() {
        let rules = [
            CouponRule::product("p1").in_group(2).with_op(GroupOp::And),
            CouponRule::product("p2"),
            CouponRule::category("c1").in_group(2).with_op(GroupOp::Or),
        ];

        let groups = group_rules(&rules);
        let summary: Vec<(u32, GroupOp, usize)> = groups
            .iter()
            .map(|group| (group.id(), group.op(), group.rules().len()))
            .collect();

        assert_eq!(summary, vec![(2, GroupOp::And, 2), (1, GroupOp::Or, 1)]);
    }

    #[test]
    fn empty_rule_list_has_no_groups() {
        assert!(group_rules(&[]).is_empty());
    }

    #[test]
    fn or_group_unions_slots() -> TestResult {
        let cart = cart()?;
        let rules = [CouponRule::product("p1"), CouponRule::product("p3")];
        let groups = group_rules(&rules);

        let outcome = groups.first().map(|group| group.evaluate(&cart));

        assert_eq!(outcome.as_ref().map(|o| (o.quantity, o.amount)), Some((2, 5_000)));

        Ok(())
    }

    #[test]
    fn and_group_intersects_slots() -> TestResult {
        let cart = cart()?;
        let rules = [
            CouponRule::category("c1").with_op(GroupOp::And),
            CouponRule::product("p2"),
        ];
        let groups = group_rules(&rules);

        let outcome = groups.first().map(|group| group.evaluate(&cart));

        assert_eq!(outcome.map(|o| (o.slots.lines(), o.amount)), Some((vec![1], 3_000)));

        Ok(())
    }

    #[test]
    fn thresholds_are_checked_against_combined_set() -> TestResult {
        let cart = cart()?;

        // p1 alone has one unit, but the group's union has two.
        let rules = [
            CouponRule::product("p1").with_min_qty(2),
            CouponRule::product("p3"),
        ];
        let groups = group_rules(&rules);
        let outcome = groups.first().map(|group| group.evaluate(&cart));

        assert_eq!(outcome.map(|o| o.scope_amount()), Some(5_000));

        Ok(())
    }

    #[test]
    fn failing_threshold_disqualifies_group() -> TestResult {
        let cart = cart()?;
        let rules = [CouponRule::category("c1").with_min_amount(Money::from_minor(5_000, GBP))];
        let groups = group_rules(&rules);

        let outcome = groups.first().map(|group| group.evaluate(&cart));

        assert_eq!(
            outcome.as_ref().map(|o| (o.amount, o.qualified, o.scope_amount())),
            Some((4_000, false, 0))
        );

        Ok(())
    }

    #[test]
    fn every_rule_threshold_must_pass() -> TestResult {
        let cart = cart()?;

        // The union of p1 and c1 is 40.00; the second rule asks for 50.00.
        let rules = [
            CouponRule::product("p1").with_min_qty(1),
            CouponRule::category("c1").with_min_amount(Money::from_minor(5_000, GBP)),
        ];
        let groups = group_rules(&rules);
        let outcome = groups.first().map(|group| group.evaluate(&cart));

        assert_eq!(
            outcome.as_ref().map(|o| (o.quantity, o.amount, o.qualified, o.scope_amount())),
            Some((3, 4_000, false, 0))
        );

        Ok(())
    }

    #[test]
    fn bogo_rule_is_first_with_complete_terms() {
        let rules = [
            CouponRule::product("p1").with_bogo(BogoTerms::new(0, 1)),
            CouponRule::product("p2").with_bogo(BogoTerms::new(2, 1)),
            CouponRule::product("p3").with_bogo(BogoTerms::new(3, 1)),
        ];
        let groups = group_rules(&rules);

        let bogo = groups.first().and_then(RuleGroup::bogo_rule);

        assert_eq!(bogo.and_then(|rule| rule.scope_value.as_deref()), Some("p2"));
    }
}
