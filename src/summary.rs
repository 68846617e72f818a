//! Order summary
//!
//! A snapshot of what is being ordered, taken when the order is composed. The
//! message, the form payload and the printed table all read from it, so they
//! cannot disagree on prices.

use std::{io, ops::Range};

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Catalog,
    combos::ComboPricing,
    pricing::{PricingError, display_price, line_total, sum},
    products::{PizzaId, Portion},
};

/// Placeholder for a cart line whose pizza left the menu.
pub const MISSING_PIZZA: &str = "(Pizza no encontrada)";

/// Errors that can occur when printing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The output could not be written.
    #[error("failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// One priced line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine<'a> {
    /// Pizza id
    pub pizza: PizzaId,

    /// Pizza name, `None` if it is no longer on the menu
    pub name: Option<String>,

    /// Whole or half
    pub portion: Portion,

    /// Quantity
    pub quantity: u32,

    /// Price of one unit, `None` if the pizza is no longer on the menu
    pub unit_price: Option<Money<'a, Currency>>,

    /// Unit price times quantity, zero for missing pizzas
    pub line_total: Money<'a, Currency>,
}

impl SummaryLine<'_> {
    /// The line as it reads in an order message, e.g. `"2x Muzzarella (media)"`.
    #[must_use]
    pub fn describe(&self) -> String {
        let name = self.name.as_deref().unwrap_or(MISSING_PIZZA);

        match self.portion.label() {
            Some(label) if self.name.is_some() => format!("{}x {name} ({label})", self.quantity),
            _ => format!("{}x {name}", self.quantity),
        }
    }
}

/// What the summary was taken from.
#[derive(Debug, Clone, PartialEq)]
pub enum SummarySource<'a> {
    /// A free-form cart
    Cart,

    /// A combo at a flat price
    Combo {
        /// Combo name
        name: String,

        /// Sum of the full prices of the combo's pizzas
        original_price: Money<'a, Currency>,

        /// Promotion label
        promo: Option<String>,
    },
}

/// Lines and total of an order at the moment it was composed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary<'a> {
    source: SummarySource<'a>,
    lines: SmallVec<[SummaryLine<'a>; 8]>,
    total: Money<'a, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Snapshot a cart against the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or a currency mismatch.
    pub fn from_cart(cart: &Cart, catalog: &Catalog<'a>) -> Result<Self, PricingError> {
        let currency = catalog.currency();
        let mut lines: SmallVec<[SummaryLine<'a>; 8]> = SmallVec::new();

        for line in cart.lines() {
            let summary_line = match catalog.pizza(line.pizza) {
                Some(pizza) => {
                    let unit_price = pizza.unit_price(line.portion);

                    SummaryLine {
                        pizza: line.pizza,
                        name: Some(pizza.name.clone()),
                        portion: line.portion,
                        quantity: line.quantity,
                        unit_price: Some(unit_price),
                        line_total: line_total(&unit_price, line.quantity)?,
                    }
                }
                None => SummaryLine {
                    pizza: line.pizza,
                    name: None,
                    portion: line.portion,
                    quantity: line.quantity,
                    unit_price: None,
                    line_total: Money::from_minor(0, currency),
                },
            };

            lines.push(summary_line);
        }

        let total = sum(lines.iter().map(|line| line.line_total), currency)?;

        Ok(Self {
            source: SummarySource::Cart,
            lines,
            total,
        })
    }

    /// Snapshot a resolved combo. The total is the combo's special price.
    pub fn from_combo(pricing: &ComboPricing<'_, 'a>) -> Self {
        let combo = pricing.combo();

        let lines = pricing
            .pizzas()
            .iter()
            .map(|pizza| SummaryLine {
                pizza: pizza.id,
                name: Some(pizza.name.clone()),
                portion: Portion::Whole,
                quantity: 1,
                unit_price: Some(pizza.price),
                line_total: pizza.price,
            })
            .collect();

        Self {
            source: SummarySource::Combo {
                name: combo.name.clone(),
                original_price: pricing.original_price(),
                promo: combo.promo.clone(),
            },
            lines,
            total: pricing.special_price(),
        }
    }

    /// Where the summary came from.
    pub fn source(&self) -> &SummarySource<'a> {
        &self.source
    }

    /// Priced lines in cart order.
    pub fn lines(&self) -> &[SummaryLine<'a>] {
        &self.lines
    }

    /// Amount to pay.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Name of the combo, if the summary is for one.
    pub fn combo_name(&self) -> Option<&str> {
        match &self.source {
            SummarySource::Combo { name, .. } => Some(name),
            SummarySource::Cart => None,
        }
    }

    /// Line descriptions joined for a message, e.g. `"2x Muzzarella, 1x Fugazzeta"`.
    #[must_use]
    pub fn items_line(&self) -> String {
        self.lines
            .iter()
            .map(SummaryLine::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Print the summary as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Pizza", "Porción", "Cant.", "Precio", "Subtotal"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone().unwrap_or_else(|| MISSING_PIZZA.to_string()),
                line.portion.label().unwrap_or("entera").to_string(),
                line.quantity.to_string(),
                line.unit_price.as_ref().map(display_price).unwrap_or_default(),
                display_price(&line.line_total),
            ]);
        }

        writeln!(out, "\n{}", styled_table(builder, 2..5))?;

        if let SummarySource::Combo {
            name,
            original_price,
            promo,
        } = &self.source
        {
            writeln!(out, " Combo: {name}")?;

            if let Some(promo) = promo {
                writeln!(out, " Promo: {promo}")?;
            }

            writeln!(out, " Precio original: {}", display_price(original_price))?;
        }

        writeln!(out, " \x1b[1mTotal: {}\x1b[0m\n", display_price(&self.total))?;

        Ok(())
    }
}

/// Build a table with a bold header and right-aligned `numeric` columns.
#[must_use]
pub fn styled_table(builder: Builder, numeric: Range<usize>) -> Table {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    table
}
