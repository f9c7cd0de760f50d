//! Coupons
//!
//! A coupon discount engine. Coupons are looked up by a case-insensitive code,
//! gated on status and validity window, and then evaluated against a cart:
//! scoped rules are grouped and combined, and the best group earns a fixed,
//! percentage or buy-X-get-Y discount.

pub mod cart;
pub mod config;
pub mod coupons;
pub mod discounts;
pub mod engine;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod prelude;
pub mod receipt;
