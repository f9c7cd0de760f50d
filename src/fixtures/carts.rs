//! Cart Fixtures

use serde::Deserialize;

use crate::{
    cart::Cart,
    fixtures::{
        FixtureError,
        money::{parse_currency, parse_money},
    },
    items::CartItem,
};

/// Cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// ISO currency code of the cart
    pub currency: String,

    /// Cart lines
    #[serde(default)]
    pub items: Vec<CartItemFixture>,
}

/// Cart line in YAML
#[derive(Debug, Deserialize)]
pub struct CartItemFixture {
    /// Product id
    pub product: String,

    /// Category id
    pub category: String,

    /// Unit price (e.g., "2.99 GBP")
    pub price: String,

    /// Number of units
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl TryFrom<CartItemFixture> for CartItem<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CartItemFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        Ok(CartItem::new(
            fixture.product,
            fixture.category,
            price,
            fixture.quantity,
        ))
    }
}

impl TryFrom<CartFixture> for Cart<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CartFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;

        let items = fixture
            .items
            .into_iter()
            .map(CartItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cart::with_items(items, currency)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{cart::CartError, fixtures::parse_cart};

    use super::*;

    #[test]
    fn quantity_defaults_to_one() -> TestResult {
        let cart = parse_cart(
            r"
currency: GBP
items:
  - product: p1
    category: c1
    price: 4.00 GBP
",
        )?;

        assert_eq!(cart.currency(), GBP);
        assert_eq!(cart.unit_count(), 1);
        assert_eq!(cart.subtotal_minor(), 400);

        Ok(())
    }

    #[test]
    fn empty_cart_is_allowed() -> TestResult {
        let cart = parse_cart("currency: EUR\n")?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn mixed_currency_lines_are_rejected() {
        let result = parse_cart(
            r"
currency: GBP
items:
  - product: p1
    category: c1
    price: 4.00 USD
",
        );

        assert!(matches!(
            result,
            Err(FixtureError::Cart(CartError::CurrencyMismatch(0, _, _)))
        ));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let result = parse_cart(
            r"
currency: GBP
items:
  - product: p1
    category: c1
    price: 4.00 GBP
    quantity: -1
",
        );

        assert!(matches!(result, Err(FixtureError::Yaml(_))));
    }
}
