//! Items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// Product identifier, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Category identifier, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            /// Creates a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ProductId);
string_id!(CategoryId);

/// A cart line: one product at a unit price, some number of times.
///
/// Every unit of `quantity` is a separately matchable slot carrying the
/// line's product, category and unit price.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem<'a> {
    product: ProductId,
    category: CategoryId,
    price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a new cart line.
    pub fn new(
        product: impl Into<ProductId>,
        category: impl Into<CategoryId>,
        price: Money<'a, Currency>,
        quantity: u32,
    ) -> Self {
        Self {
            product: product.into(),
            category: category.into(),
            price,
            quantity,
        }
    }

    /// Returns the product of the line
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Returns the category of the line
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Returns the unit price of the line
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the number of units on the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total in minor units (`price × quantity`).
    pub fn total_minor(&self) -> i64 {
        self.price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}
