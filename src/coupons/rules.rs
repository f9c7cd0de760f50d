//! Coupon Rules
//!
//! Scoping and threshold clauses attached to a coupon. Rules sharing a group
//! number are evaluated together.

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// Group number used for rules that don't name one.
pub const DEFAULT_GROUP: u32 = 1;

/// Which part of the cart a rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// Units of a single product.
    Product,

    /// Units of every product in a category.
    Category,

    /// Every unit in the cart.
    CartTotal,
}

/// How the rules of a group combine their matched slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOp {
    /// Slots matched by every rule (intersection).
    And,

    /// Slots matched by any rule (union).
    #[default]
    Or,
}

/// Where BOGO free units are taken from.
///
/// Informational: evaluation always takes free units from the rule's own scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BogoTarget {
    /// Free units are the same product.
    SameProduct,

    /// Free units come from the same category.
    SameCategory,

    /// Free units can be any item.
    AnyItem,
}

/// Buy-X-get-Y terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BogoTerms {
    /// Units that must be bought to earn free units.
    pub buy_qty: u32,

    /// Free units earned per `buy_qty` bought.
    pub get_qty: u32,

    /// Marks the offer as same-product only. Informational: eligible units
    /// of every product share one pool.
    pub same_item_only: bool,

    /// Where free units are taken from.
    pub target: Option<BogoTarget>,
}

impl BogoTerms {
    /// Create "buy `buy_qty`, get `get_qty` free" terms.
    #[must_use]
    pub const fn new(buy_qty: u32, get_qty: u32) -> Self {
        Self {
            buy_qty,
            get_qty,
            same_item_only: false,
            target: None,
        }
    }

    /// Restrict the terms to units of the same product.
    #[must_use]
    pub const fn same_item_only(mut self) -> Self {
        self.same_item_only = true;
        self
    }

    /// Both quantities are set; terms with a zero quantity never apply.
    pub const fn is_complete(&self) -> bool {
        self.buy_qty > 0 && self.get_qty > 0
    }
}

/// A single scoping/thresholding clause of a coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRule<'a> {
    /// Scope type
    pub scope_type: ScopeType,

    /// Product or category id; unused for [`ScopeType::CartTotal`].
    pub scope_value: Option<String>,

    /// Minimum number of slots the rule's group must match.
    pub min_qty: Option<u32>,

    /// Minimum amount the rule's group must match.
    pub min_amount: Option<Money<'a, Currency>>,

    /// Group number
    pub group: u32,

    /// Group operator; only read from the first rule of a group.
    pub group_op: Option<GroupOp>,

    /// BOGO terms
    pub bogo: Option<BogoTerms>,
}

impl<'a> CouponRule<'a> {
    fn scoped(scope_type: ScopeType, scope_value: Option<String>) -> Self {
        Self {
            scope_type,
            scope_value,
            min_qty: None,
            min_amount: None,
            group: DEFAULT_GROUP,
            group_op: None,
            bogo: None,
        }
    }

    /// Rule scoped to a single product.
    pub fn product(id: impl Into<String>) -> Self {
        Self::scoped(ScopeType::Product, Some(id.into()))
    }

    /// Rule scoped to a category.
    pub fn category(id: impl Into<String>) -> Self {
        Self::scoped(ScopeType::Category, Some(id.into()))
    }

    /// Rule scoped to the whole cart.
    pub fn cart_total() -> Self {
        Self::scoped(ScopeType::CartTotal, None)
    }

    /// Rule with an explicit scope type and optional value.
    pub fn with_scope(scope_type: ScopeType, scope_value: Option<String>) -> Self {
        Self::scoped(scope_type, scope_value)
    }

    /// Require a minimum matched quantity.
    #[must_use]
    pub fn with_min_qty(mut self, min_qty: u32) -> Self {
        self.min_qty = Some(min_qty);
        self
    }

    /// Require a minimum matched amount.
    #[must_use]
    pub fn with_min_amount(mut self, min_amount: Money<'a, Currency>) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    /// Place the rule in a group.
    #[must_use]
    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    /// Set the group operator.
    #[must_use]
    pub fn with_op(mut self, op: GroupOp) -> Self {
        self.group_op = Some(op);
        self
    }

    /// Attach BOGO terms.
    #[must_use]
    pub fn with_bogo(mut self, terms: BogoTerms) -> Self {
        self.bogo = Some(terms);
        self
    }

    /// BOGO terms, when both quantities are set.
    pub fn bogo_terms(&self) -> Option<&BogoTerms> {
        self.bogo.as_ref().filter(|terms| terms.is_complete())
    }
}
