//! Receipt
//!
//! Terminal rendering of a cart and the coupon applied to it.

use std::io;

use rusty_money::Money;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, engine::CouponApplication};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// A cart with a coupon applied, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'c, 'a> {
    cart: &'c Cart<'a>,
    application: CouponApplication<'a>,
}

impl<'c, 'a> Receipt<'c, 'a> {
    /// Create a receipt for a cart and the coupon applied to it.
    pub fn new(cart: &'c Cart<'a>, application: CouponApplication<'a>) -> Self {
        Self { cart, application }
    }

    /// The coupon application
    pub fn application(&self) -> &CouponApplication<'a> {
        &self.application
    }

    /// Write the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Product", "Category", "Unit Price", "Qty", "Line Total"]);

        for (idx, item) in self.cart.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.product().to_string(),
                item.category().to_string(),
                item.price().to_string(),
                item.quantity().to_string(),
                Money::from_minor(item.total_minor(), self.cart.currency()).to_string(),
            ]);
        }

        write_table(&mut out, builder)?;
        write_summary(&mut out, &self.application)
    }
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(
    out: &mut impl io::Write,
    application: &CouponApplication<'_>,
) -> Result<(), ReceiptError> {
    let coupon = format!("{} ({})", application.code(), application.kind());
    let discount = if application.is_applied() {
        format!("-{}", application.discount())
    } else {
        "not applicable".to_string()
    };

    let lines = [
        (" Coupon:", coupon),
        (" Subtotal:", application.subtotal().to_string()),
        (" Discount:", discount),
        (" Total:", application.total().to_string()),
    ];

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &lines {
        writeln!(out, "{label:<label_width$} {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}
