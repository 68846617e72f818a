//! Fixtures
//!
//! Menus written in YAML, used for local runs and tests in place of the
//! published sheets.

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    combos::ComboOffer,
    products::Pizza,
};

pub mod menu;

pub use menu::{ComboFixture, MenuFixture, PizzaFixture, parse_price};

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

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Rating outside 0 to 5
    #[error("Invalid rating: {0}")]
    InvalidRating(Decimal),

    /// The menu lists no pizzas, so it has no currency
    #[error("Menu has no pizzas")]
    EmptyMenu,

    /// The menu could not be assembled into a catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture loader
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Fixture {
    /// Create a new fixture loader reading from `./fixtures`
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new fixture loader with a custom base path
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of a named menu fixture.
    #[must_use]
    pub fn menu_path(&self, name: &str) -> PathBuf {
        self.base_path.join("menus").join(format!("{name}.yml"))
    }

    /// Load a catalog from `menus/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the menu
    /// does not form a valid catalog.
    pub fn load_menu(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        let contents = fs::read_to_string(self.menu_path(name))?;

        menu_from_str(&contents)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a catalog from a YAML menu.
///
/// The catalog currency is taken from the first pizza.
///
/// # Errors
///
/// Returns an error if the YAML is invalid, a price or rating is malformed,
/// the menu is empty, or the pizzas do not form a valid catalog.
pub fn menu_from_str(contents: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: MenuFixture = serde_norway::from_str(contents)?;

    let pizzas = fixture
        .pizzas
        .into_iter()
        .map(Pizza::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let currency = pizzas
        .first()
        .map(|pizza| pizza.price.currency())
        .ok_or(FixtureError::EmptyMenu)?;

    let mut catalog = Catalog::with_pizzas(currency, pizzas)?;

    for combo in fixture.combos {
        catalog.insert_combo(ComboOffer::try_from(combo)?)?;
    }

    Ok(catalog)
}
