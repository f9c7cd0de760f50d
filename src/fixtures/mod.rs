//! Fixtures
//!
//! YAML definitions of coupon catalogs and carts.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    coupons::store::{CouponCatalog, CouponStoreError},
};

pub mod carts;
pub mod coupons;
pub mod money;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format or value
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between values of one coupon or cart
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Cart construction error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// Catalog construction error
    #[error("Failed to create coupon catalog: {0}")]
    Catalog(#[from] CouponStoreError),
}

/// Fixture set rooted at a directory.
///
/// Coupon catalogs live in `<base>/coupons/<name>.yml`, carts in
/// `<base>/carts/<name>.yml`.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Fixture set rooted at `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Fixture set rooted at a custom path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a named coupon catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a coupon is invalid.
    pub fn coupons(&self, name: &str) -> Result<CouponCatalog, FixtureError> {
        read_coupons(self.base_path.join("coupons").join(format!("{name}.yml")))
    }

    /// Load a named cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the cart is invalid.
    pub fn cart(&self, name: &str) -> Result<Cart<'static>, FixtureError> {
        read_cart(self.base_path.join("carts").join(format!("{name}.yml")))
    }
}

/// Read a coupon catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a coupon is invalid.
pub fn read_coupons(path: impl AsRef<Path>) -> Result<CouponCatalog, FixtureError> {
    parse_coupons(&fs::read_to_string(path)?)
}

/// Parse a coupon catalog from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a coupon is invalid.
pub fn parse_coupons(yaml: &str) -> Result<CouponCatalog, FixtureError> {
    let fixture: coupons::CouponsFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}

/// Read a cart from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the cart is invalid.
pub fn read_cart(path: impl AsRef<Path>) -> Result<Cart<'static>, FixtureError> {
    parse_cart(&fs::read_to_string(path)?)
}

/// Parse a cart from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or the cart is invalid.
pub fn parse_cart(yaml: &str) -> Result<Cart<'static>, FixtureError> {
    let fixture: carts::CartFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}
