//! Catalog
//!
//! The menu as loaded from the published sheets: pizzas indexed by id, and
//! the combos built from them.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    combos::ComboOffer,
    products::{Pizza, PizzaId},
};

pub mod query;
pub mod source;
pub mod tsv;

pub use query::{MenuQuery, PromotionFilter, UnknownPromotionFilter};
pub use source::{
    CatalogLoader, CatalogSource, DEFAULT_PIZZAS_URL, FileSource, LoadedCatalog,
    MockCatalogSource, SpreadsheetSource,
};

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two pizzas share the same id.
    #[error("duplicate pizza id {0}")]
    DuplicatePizza(PizzaId),

    /// Two combos share the same name.
    #[error("duplicate combo {0:?}")]
    DuplicateCombo(String),

    /// A pizza price is in a different currency than the catalog.
    #[error("pizza {id} is priced in {found}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// Offending pizza
        id: PizzaId,
        /// Catalog currency code
        expected: &'static str,
        /// Pizza currency code
        found: &'static str,
    },

    /// The sheet could not be fetched.
    #[error("failed to fetch {sheet} sheet: {source}")]
    Fetch {
        /// Which sheet was being fetched
        sheet: Sheet,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// The sheet responded with a non-success status.
    #[error("{sheet} sheet responded with status {status}")]
    UnexpectedStatus {
        /// Which sheet was being fetched
        sheet: Sheet,
        /// HTTP status code
        status: u16,
    },

    /// A local sheet export could not be read.
    #[error("failed to read {sheet} sheet: {source}")]
    Io {
        /// Which sheet was being read
        sheet: Sheet,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Message suitable for showing to a customer in place of the menu.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::Fetch { .. }
            | CatalogError::UnexpectedStatus { .. }
            | CatalogError::Io { .. } => {
                "No se pudieron cargar los datos. Por favor, intente de nuevo más tarde."
            }
            CatalogError::DuplicatePizza(_)
            | CatalogError::DuplicateCombo(_)
            | CatalogError::CurrencyMismatch { .. } => {
                "El menú publicado tiene datos inválidos. Por favor, avísanos."
            }
        }
    }
}

/// The two sheets a catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    /// The pizza menu
    Pizzas,

    /// The combo offers
    Combos,
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sheet::Pizzas => f.write_str("pizzas"),
            Sheet::Combos => f.write_str("combos"),
        }
    }
}

/// Pizzas and combos available for ordering.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    pizzas: Vec<Pizza<'a>>,
    index: FxHashMap<PizzaId, usize>,
    combos: Vec<ComboOffer<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            pizzas: Vec::new(),
            index: FxHashMap::default(),
            combos: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from a list of pizzas.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on a duplicate id or currency mismatch.
    pub fn with_pizzas(
        currency: &'static Currency,
        pizzas: impl IntoIterator<Item = Pizza<'a>>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for pizza in pizzas {
            catalog.insert_pizza(pizza)?;
        }

        Ok(catalog)
    }

    /// Add a pizza to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePizza`] if the id is taken, or
    /// [`CatalogError::CurrencyMismatch`] if any of its prices use another currency.
    pub fn insert_pizza(&mut self, pizza: Pizza<'a>) -> Result<(), CatalogError> {
        if self.index.contains_key(&pizza.id) {
            return Err(CatalogError::DuplicatePizza(pizza.id));
        }

        let prices = std::iter::once(&pizza.price).chain(pizza.half_price.as_ref());

        for price in prices {
            if price.currency() != self.currency {
                return Err(CatalogError::CurrencyMismatch {
                    id: pizza.id,
                    expected: self.currency.iso_alpha_code,
                    found: price.currency().iso_alpha_code,
                });
            }
        }

        self.index.insert(pizza.id, self.pizzas.len());
        self.pizzas.push(pizza);

        Ok(())
    }

    /// Add a combo to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCombo`] if a combo with the same name exists.
    pub fn insert_combo(&mut self, combo: ComboOffer<'a>) -> Result<(), CatalogError> {
        if self.combo(&combo.name).is_some() {
            return Err(CatalogError::DuplicateCombo(combo.name));
        }

        self.combos.push(combo);

        Ok(())
    }

    /// Look up a pizza by id.
    pub fn pizza(&self, id: PizzaId) -> Option<&Pizza<'a>> {
        self.index.get(&id).and_then(|idx| self.pizzas.get(*idx))
    }

    /// Look up a combo by name.
    pub fn combo(&self, name: &str) -> Option<&ComboOffer<'a>> {
        self.combos.iter().find(|combo| combo.name == name)
    }

    /// Pizzas in sheet order.
    pub fn pizzas(&self) -> &[Pizza<'a>] {
        &self.pizzas
    }

    /// Combos in sheet order.
    pub fn combos(&self) -> &[ComboOffer<'a>] {
        &self.combos
    }

    /// Get the currency of the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Check if the catalog has no pizzas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pizzas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{ARS, USD},
    };
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn lookups_by_id_and_name() -> TestResult {
        let mut catalog = Catalog::with_pizzas(
            ARS,
            [
                Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS)),
                Pizza::new(7, "Fugazzeta", Money::from_minor(1200, ARS)),
            ],
        )?;

        catalog.insert_combo(ComboOffer {
            name: "Pareja".to_string(),
            pizza_ids: smallvec![PizzaId::new(1), PizzaId::new(7)],
            special_price: Money::from_minor(2000, ARS),
            promo: None,
        })?;

        assert_eq!(
            catalog.pizza(PizzaId::new(7)).map(|pizza| pizza.name.as_str()),
            Some("Fugazzeta")
        );
        assert!(catalog.pizza(PizzaId::new(2)).is_none());
        assert!(catalog.combo("Pareja").is_some());
        assert!(catalog.combo("Trio").is_none());
        assert_eq!(catalog.pizzas().len(), 2);

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() -> TestResult {
        let mut catalog = Catalog::new(ARS);

        catalog.insert_pizza(Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS)))?;

        let result = catalog.insert_pizza(Pizza::new(1, "Otra", Money::from_minor(900, ARS)));

        assert!(matches!(result, Err(CatalogError::DuplicatePizza(id)) if id == PizzaId::new(1)));
        assert_eq!(catalog.pizzas().len(), 1);

        Ok(())
    }

    #[test]
    fn duplicate_combo_names_are_rejected() -> TestResult {
        let mut catalog = Catalog::new(ARS);
        let combo = ComboOffer::new("Pareja", [PizzaId::new(1)], Money::from_minor(1000, ARS));

        catalog.insert_combo(combo.clone())?;

        assert!(matches!(
            catalog.insert_combo(combo),
            Err(CatalogError::DuplicateCombo(name)) if name == "Pareja"
        ));

        Ok(())
    }

    #[test]
    fn foreign_currency_is_rejected() {
        let mut catalog = Catalog::new(ARS);

        let result = catalog.insert_pizza(
            Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS))
                .with_half_price(Money::from_minor(500, USD)),
        );

        match result {
            Err(CatalogError::CurrencyMismatch { id, expected, found }) => {
                assert_eq!(id, PizzaId::new(1));
                assert_eq!(expected, ARS.iso_alpha_code);
                assert_eq!(found, USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }
}
