//! Coupon Store
//!
//! Lookup of coupon definitions by code.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::coupons::{Coupon, CouponKey, normalize_code};

/// Errors raised by a coupon store.
#[derive(Debug, Error)]
pub enum CouponStoreError {
    /// A coupon with the same normalized code is already stored.
    #[error("coupon code already exists: {0}")]
    DuplicateCode(String),

    /// The backing store could not be read.
    #[error("coupon store unavailable: {0}")]
    Unavailable(String),
}

/// Source of coupon definitions.
///
/// Implementations receive codes that are already normalized.
#[cfg_attr(test, mockall::automock)]
pub trait CouponStore: Send + Sync {
    /// Find the coupon (and its rules) stored under `code`.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponStoreError`] if the store could not be read.
    fn find_by_code(&self, code: &str) -> Result<Option<Coupon<'static>>, CouponStoreError>;
}

/// In-memory coupon catalog.
#[derive(Debug, Default)]
pub struct CouponCatalog {
    coupons: SlotMap<CouponKey, Coupon<'static>>,
    codes: FxHashMap<String, CouponKey>,
}

impl CouponCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coupon, keyed by its normalized code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponStoreError::DuplicateCode`] if the code is taken.
    pub fn insert(&mut self, coupon: Coupon<'static>) -> Result<CouponKey, CouponStoreError> {
        let code = normalize_code(coupon.code());

        if self.codes.contains_key(&code) {
            return Err(CouponStoreError::DuplicateCode(code));
        }

        let key = self.coupons.insert(coupon);
        self.codes.insert(code, key);

        Ok(key)
    }

    /// Get a coupon by key.
    pub fn get(&self, key: CouponKey) -> Option<&Coupon<'static>> {
        self.coupons.get(key)
    }

    /// Iterate over every stored coupon.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon<'static>> {
        self.coupons.values()
    }

    /// Number of stored coupons.
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl CouponStore for CouponCatalog {
    fn find_by_code(&self, code: &str) -> Result<Option<Coupon<'static>>, CouponStoreError> {
        Ok(self
            .codes
            .get(code)
            .and_then(|key| self.coupons.get(*key))
            .cloned())
    }
}
