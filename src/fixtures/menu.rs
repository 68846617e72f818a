//! Menu Fixtures

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{
    combos::ComboOffer,
    fixtures::FixtureError,
    pricing::parse_plain_amount,
    products::{Pizza, PizzaId},
};

/// Menu as written in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Pizzas in menu order
    pub pizzas: Vec<PizzaFixture>,

    /// Combos in menu order
    #[serde(default)]
    pub combos: Vec<ComboFixture>,
}

/// Pizza Fixture
#[derive(Debug, Deserialize)]
pub struct PizzaFixture {
    /// Menu id
    pub id: u32,

    /// Pizza name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Whole pizza price (e.g., "10000 ARS")
    pub price: String,

    /// Half pizza price
    #[serde(default)]
    pub half_price: Option<String>,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Rating between 0 and 5
    #[serde(default)]
    pub rating: Decimal,

    /// Promotion label
    #[serde(default)]
    pub promotion: Option<String>,

    /// Ingredients
    #[serde(default)]
    pub recipe: Vec<String>,
}

impl TryFrom<PizzaFixture> for Pizza<'static> {
    type Error = FixtureError;

    fn try_from(fixture: PizzaFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;
        let half_price = fixture
            .half_price
            .as_deref()
            .map(parse_price)
            .transpose()?;

        if fixture.rating < Decimal::ZERO || fixture.rating > Decimal::from(5) {
            return Err(FixtureError::InvalidRating(fixture.rating));
        }

        Ok(Pizza {
            id: PizzaId::new(fixture.id),
            name: fixture.name,
            description: fixture.description,
            price,
            half_price,
            image: fixture.image,
            rating: fixture.rating,
            promotion: fixture.promotion,
            recipe: fixture.recipe,
        })
    }
}

/// Combo Fixture
#[derive(Debug, Deserialize)]
pub struct ComboFixture {
    /// Combo name
    pub name: String,

    /// Pizza ids in the combo
    pub pizzas: Vec<u32>,

    /// Special price (e.g., "18000 ARS")
    pub price: String,

    /// Promotion label
    #[serde(default)]
    pub promo: Option<String>,
}

impl TryFrom<ComboFixture> for ComboOffer<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ComboFixture) -> Result<Self, Self::Error> {
        let combo = ComboOffer::new(
            fixture.name,
            fixture.pizzas.into_iter().map(PizzaId::new),
            parse_price(&fixture.price)?,
        );

        Ok(match fixture.promo {
            Some(promo) => combo.with_promo(promo),
            None => combo,
        })
    }
}

/// Parse a price string (e.g., "10.50 ARS") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if
/// the amount is not a valid price, or if the currency code is unknown.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let minor_units = parse_plain_amount(amount, currency)
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}
