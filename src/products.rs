//! Products

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::pricing::half_of;

/// Pizza identifier as published in the menu sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PizzaId(u32);

impl PizzaId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for PizzaId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PizzaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a cart line is a whole pizza or half of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Portion {
    /// A whole pizza.
    #[default]
    Whole,

    /// Half a pizza, priced at `half_price` or half the full price.
    Half,
}

impl Portion {
    /// Label used in order messages, empty for whole pizzas.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Portion::Whole => None,
            Portion::Half => Some("media"),
        }
    }
}

/// A pizza on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Pizza<'a> {
    /// Menu identifier, unique within a catalog
    pub id: PizzaId,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Price of a whole pizza
    pub price: Money<'a, Currency>,

    /// Price of half a pizza, when the menu sets one
    pub half_price: Option<Money<'a, Currency>>,

    /// Image URL
    pub image: String,

    /// Rating between 0 and 5
    pub rating: Decimal,

    /// Promotion label
    pub promotion: Option<String>,

    /// Ingredients, in menu order
    pub recipe: Vec<String>,
}

impl<'a> Pizza<'a> {
    /// Creates a pizza with only the required fields set.
    pub fn new(id: impl Into<PizzaId>, name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            half_price: None,
            image: String::new(),
            rating: Decimal::ZERO,
            promotion: None,
            recipe: Vec::new(),
        }
    }

    /// Sets the half pizza price.
    #[must_use]
    pub fn with_half_price(mut self, half_price: Money<'a, Currency>) -> Self {
        self.half_price = Some(half_price);
        self
    }

    /// Check if the pizza carries a non-blank promotion.
    #[must_use]
    pub fn has_promotion(&self) -> bool {
        self.promotion
            .as_deref()
            .is_some_and(|promotion| !promotion.trim().is_empty())
    }

    /// Returns the price of one unit of the given portion.
    ///
    /// Halves fall back to half the full price, rounded to the nearest minor unit.
    pub fn unit_price(&self, portion: Portion) -> Money<'a, Currency> {
        match portion {
            Portion::Whole => self.price,
            Portion::Half => self.half_price.unwrap_or_else(|| half_of(&self.price)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::ARS;

    use super::*;

    #[test]
    fn whole_portion_uses_full_price() {
        let pizza = Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS));

        assert_eq!(pizza.unit_price(Portion::Whole), Money::from_minor(1000, ARS));
    }

    #[test]
    fn half_portion_prefers_half_price() {
        let pizza = Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS))
            .with_half_price(Money::from_minor(600, ARS));

        assert_eq!(pizza.unit_price(Portion::Half), Money::from_minor(600, ARS));
    }

    #[test]
    fn half_portion_falls_back_to_half_of_price() {
        let pizza = Pizza::new(1, "Fugazzeta", Money::from_minor(1001, ARS));

        assert_eq!(pizza.unit_price(Portion::Half), Money::from_minor(501, ARS));
    }

    #[test]
    fn portion_labels() {
        assert_eq!(Portion::Whole.label(), None);
        assert_eq!(Portion::Half.label(), Some("media"));
    }
}
