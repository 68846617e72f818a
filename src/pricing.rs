//! Prices

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while parsing or totalling prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount could not be parsed as a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The amount is negative.
    #[error("negative amount: {0:?}")]
    NegativeAmount(String),

    /// A multiplication or sum does not fit in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Parses a plain decimal amount such as `"10.5"` into minor units.
///
/// A leading currency symbol and surrounding whitespace are ignored. An amount
/// that contains a comma is read with [`parse_locale_amount`] instead.
///
/// # Errors
///
/// Returns [`PricingError::InvalidAmount`] if the text is not a number, or
/// [`PricingError::NegativeAmount`] if it is below zero.
pub fn parse_plain_amount(s: &str, currency: &Currency) -> Result<i64, PricingError> {
    let cleaned = strip_symbol(s);

    if cleaned.contains(',') {
        return parse_locale_amount(s, currency);
    }

    to_minor_units(&cleaned, s, currency)
}

/// Parses a locale formatted amount such as `"1.500,50"` into minor units.
///
/// Dots are thousands separators and the comma is the decimal separator.
///
/// # Errors
///
/// Returns [`PricingError::InvalidAmount`] if the text is not a number, or
/// [`PricingError::NegativeAmount`] if it is below zero.
pub fn parse_locale_amount(s: &str, currency: &Currency) -> Result<i64, PricingError> {
    let normalised = strip_symbol(s).replace('.', "").replace(',', ".");

    to_minor_units(&normalised, s, currency)
}

fn strip_symbol(s: &str) -> String {
    s.trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn to_minor_units(cleaned: &str, original: &str, currency: &Currency) -> Result<i64, PricingError> {
    let amount = cleaned
        .parse::<Decimal>()
        .map_err(|_err| PricingError::InvalidAmount(original.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::NegativeAmount(original.to_string()));
    }

    let scale = Decimal::from_i64(10_i64.pow(currency.exponent)).ok_or(PricingError::Overflow)?;

    amount
        .checked_mul(scale)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PricingError::Overflow)
}

/// Half of a price, rounded to the nearest minor unit (midpoints away from zero).
pub fn half_of<'a>(price: &Money<'a, Currency>) -> Money<'a, Currency> {
    let minor = Decimal::from(price.to_minor_units()) / Decimal::TWO;
    let rounded = minor
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX);

    Money::from_minor(rounded, price.currency())
}

/// Multiplies a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total<'a>(
    unit: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}

/// Sums a sequence of prices, starting from zero in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::Money`] on a currency mismatch.
pub fn sum<'a>(
    prices: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| {
            acc.add(price).map_err(PricingError::from)
        })
}

/// Formats a price with exactly two decimal places, e.g. `"26.00"`.
pub fn format_amount(price: &Money<'_, Currency>) -> String {
    let mut amount = Decimal::new(price.to_minor_units(), price.currency().exponent)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    amount.rescale(2);

    amount.to_string()
}

/// Formats a price for display with a leading `$`, e.g. `"$26.00"`.
pub fn display_price(price: &Money<'_, Currency>) -> String {
    format!("${}", format_amount(price))
}
