//! Menu search

use std::str::FromStr;

use thiserror::Error;

use crate::{catalog::Catalog, products::Pizza};

/// Which pizzas to keep by whether they carry a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionFilter {
    /// Every pizza
    #[default]
    All,

    /// Only pizzas with a promotion
    Only,

    /// Only pizzas without a promotion
    None,
}

impl PromotionFilter {
    fn keeps(self, pizza: &Pizza<'_>) -> bool {
        match self {
            PromotionFilter::All => true,
            PromotionFilter::Only => pizza.has_promotion(),
            PromotionFilter::None => !pizza.has_promotion(),
        }
    }
}

/// An unrecognised promotion filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown promotion filter {0:?}, expected all, only or none")]
pub struct UnknownPromotionFilter(String);

impl FromStr for PromotionFilter {
    type Err = UnknownPromotionFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PromotionFilter::All),
            "only" => Ok(PromotionFilter::Only),
            "none" => Ok(PromotionFilter::None),
            _ => Err(UnknownPromotionFilter(value.to_string())),
        }
    }
}

/// A case-insensitive search over pizza names and descriptions.
///
/// An empty term matches every pizza.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    term: String,
    promotions: PromotionFilter,
}

impl MenuQuery {
    /// Search for `term` among the pizzas kept by `promotions`.
    #[must_use]
    pub fn new(term: &str, promotions: PromotionFilter) -> Self {
        Self {
            term: term.trim().to_lowercase(),
            promotions,
        }
    }

    /// Check if the query narrows the menu at all.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.term.is_empty() && self.promotions == PromotionFilter::All
    }

    /// Check if a pizza matches the query.
    #[must_use]
    pub fn matches(&self, pizza: &Pizza<'_>) -> bool {
        if !self.promotions.keeps(pizza) {
            return false;
        }

        self.term.is_empty()
            || pizza.name.to_lowercase().contains(&self.term)
            || pizza.description.to_lowercase().contains(&self.term)
    }
}

impl<'a> Catalog<'a> {
    /// Pizzas matching the query, in sheet order.
    pub fn search<'s>(&'s self, query: &'s MenuQuery) -> impl Iterator<Item = &'s Pizza<'a>> {
        self.pizzas().iter().filter(|pizza| query.matches(pizza))
    }
}
