//! Scope Resolution
//!
//! Works out which cart slots a rule applies to. A slot is one unit of a
//! cart line; rule predicates only look at line attributes, so every unit of
//! a matched line is matched and a slot set is stored as the set of matched
//! line indices.

use rustc_hash::FxHashSet;

use crate::{
    cart::Cart,
    coupons::{CouponRule, ScopeType},
    items::CartItem,
};

/// A set of matched cart slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSet {
    lines: FxHashSet<usize>,
}

impl SlotSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every slot in the cart.
    pub fn all(cart: &Cart<'_>) -> Self {
        Self {
            lines: (0..cart.len()).collect(),
        }
    }

    /// Every slot of the lines accepted by `predicate`.
    pub fn matching<F>(cart: &Cart<'_>, mut predicate: F) -> Self
    where
        F: FnMut(&CartItem<'_>) -> bool,
    {
        Self {
            lines: cart
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| predicate(item).then_some(idx))
                .collect(),
        }
    }

    /// Slots in either set.
    #[must_use]
    pub fn union(&self, other: &SlotSet) -> SlotSet {
        SlotSet {
            lines: self.lines.union(&other.lines).copied().collect(),
        }
    }

    /// Slots in both sets.
    #[must_use]
    pub fn intersection(&self, other: &SlotSet) -> SlotSet {
        SlotSet {
            lines: self.lines.intersection(&other.lines).copied().collect(),
        }
    }

    /// Whether the line at `idx` is matched.
    pub fn contains_line(&self, idx: usize) -> bool {
        self.lines.contains(&idx)
    }

    /// Matched line indices, ascending.
    pub fn lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.lines.iter().copied().collect();
        lines.sort_unstable();
        lines
    }

    fn items<'c, 'a>(&'c self, cart: &'c Cart<'a>) -> impl Iterator<Item = &'c CartItem<'a>> {
        self.lines.iter().filter_map(|idx| cart.get(*idx))
    }

    /// Number of matched slots (units).
    pub fn quantity(&self, cart: &Cart<'_>) -> u64 {
        self.items(cart)
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Sum of the unit prices of every matched slot, in minor units.
    pub fn amount_minor(&self, cart: &Cart<'_>) -> i64 {
        self.items(cart)
            .fold(0i64, |acc, item| acc.saturating_add(item.total_minor()))
    }
}

/// Whether a cart line falls within a rule's product/category scope.
///
/// `CartTotal` accepts every line; a product or category rule without a
/// scope value accepts none.
pub fn in_scope(rule: &CouponRule<'_>, item: &CartItem<'_>) -> bool {
    match (rule.scope_type, rule.scope_value.as_deref()) {
        (ScopeType::CartTotal, _) => true,
        (ScopeType::Category, Some(category)) => item.category().as_str() == category,
        (ScopeType::Product, Some(product)) => item.product().as_str() == product,
        (ScopeType::Category | ScopeType::Product, None) => false,
    }
}

/// Resolve the slots a rule applies to.
pub fn resolve_scope(rule: &CouponRule<'_>, cart: &Cart<'_>) -> SlotSet {
    match rule.scope_type {
        ScopeType::CartTotal => SlotSet::all(cart),
        ScopeType::Category | ScopeType::Product => {
            SlotSet::matching(cart, |item| in_scope(rule, item))
        }
    }
}
