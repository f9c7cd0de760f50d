//! Coupons prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    coupons::{
        BogoTarget, BogoTerms, Coupon, CouponKey, CouponRule, CouponStatus, GroupOp, ScopeType,
        normalize_code,
        store::{CouponCatalog, CouponStore, CouponStoreError},
        validation::{CouponError, validate_coupon, validate_coupon_at},
    },
    discounts::{DiscountError, DiscountKind},
    engine::{CouponApplication, apply_amount_or_percent, apply_bogo, apply_coupon, redeem},
    fixtures::{Fixture, FixtureError},
    items::{CartItem, CategoryId, ProductId},
    receipt::{Receipt, ReceiptError},
};
