//! Cart
//!
//! The cart records quantities per `(pizza, portion)` line. It stores ids only;
//! prices are looked up in the catalog whenever a total is needed, so a cart
//! can outlive a catalog reload.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    catalog::Catalog,
    pricing::{PricingError, format_amount, line_total, sum},
    products::{Pizza, PizzaId, Portion},
};

pub mod guard;

pub use guard::{DebouncedCart, GuardOutcome};

/// One line of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Pizza on this line
    pub pizza: PizzaId,

    /// Whole or half
    pub portion: Portion,

    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Key identifying the line within a cart.
    #[must_use]
    pub fn key(&self) -> (PizzaId, Portion) {
        (self.pizza, self.portion)
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a pizza portion, returning the line's new quantity.
    pub fn add_item(&mut self, pizza: &Pizza<'_>, portion: Portion) -> u32 {
        let quantity = match self.line_mut(pizza.id, portion) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    pizza: pizza.id,
                    portion,
                    quantity: 1,
                });

                1
            }
        };

        debug!(pizza = %pizza.id, ?portion, quantity, "added to cart");

        quantity
    }

    /// Remove one unit of a pizza portion.
    ///
    /// Returns the line's remaining quantity (0 once the line is gone), or
    /// `None` if the cart had no such line.
    pub fn remove_item(&mut self, pizza: PizzaId, portion: Portion) -> Option<u32> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.key() == (pizza, portion))?;

        let remaining = self.lines.get_mut(idx).map(|line| {
            line.quantity = line.quantity.saturating_sub(1);
            line.quantity
        })?;

        if remaining == 0 {
            self.lines.remove(idx);
        }

        debug!(%pizza, ?portion, remaining, "removed from cart");

        Some(remaining)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a single line, 0 if absent.
    #[must_use]
    pub fn quantity(&self, pizza: PizzaId, portion: Portion) -> u32 {
        self.lines
            .iter()
            .find(|line| line.key() == (pizza, portion))
            .map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Total price of the cart against a catalog.
    ///
    /// Lines whose pizza is no longer in the catalog contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or a currency mismatch.
    pub fn total_price<'a>(
        &self,
        catalog: &Catalog<'a>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let mut totals = Vec::with_capacity(self.lines.len());

        for line in &self.lines {
            let Some(pizza) = catalog.pizza(line.pizza) else {
                debug!(pizza = %line.pizza, "pricing stale cart line at zero");
                continue;
            };

            totals.push(line_total(&pizza.unit_price(line.portion), line.quantity)?);
        }

        sum(totals, catalog.currency())
    }

    /// Total price formatted with the currency's decimal places, e.g. `"26.00"`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or a currency mismatch.
    pub fn total_price_display(&self, catalog: &Catalog<'_>) -> Result<String, PricingError> {
        self.total_price(catalog).map(|total| format_amount(&total))
    }

    /// Lines whose pizza is missing from the catalog.
    pub fn stale_lines<'c>(&'c self, catalog: &'c Catalog<'_>) -> impl Iterator<Item = &'c CartLine> {
        self.lines
            .iter()
            .filter(|line| catalog.pizza(line.pizza).is_none())
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, pizza: PizzaId, portion: Portion) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.key() == (pizza, portion))
    }
}
