//! Sheet parsing
//!
//! The menu is published as tab-separated exports. Columns are positional and
//! the first line is a header.
//!
//! Pizzas: `id, name, description, price, [halfPrice], image, rating, [promotion], [recipe]`.
//! A header of exactly six columns marks the older layout without `halfPrice`.
//!
//! Combos: `comboName, pizzaIds, specialPrice, [promo]`, where ids are comma
//! separated and the price uses `.` for thousands and `,` for decimals.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    combos::ComboOffer,
    pricing::{PricingError, parse_locale_amount, parse_plain_amount},
    products::{Pizza, PizzaId},
};

const LEGACY_COLUMNS: usize = 6;

/// Why a sheet row was left out.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    /// A required column is missing or blank.
    #[error("missing {0}")]
    MissingField(&'static str),

    /// The id column is not a whole number.
    #[error("invalid id {0:?}")]
    InvalidId(String),

    /// A price column could not be parsed.
    #[error("invalid {field}: {source}")]
    InvalidPrice {
        /// Column name
        field: &'static str,
        /// Parse failure
        #[source]
        source: PricingError,
    },

    /// The rating column is not a number.
    #[error("invalid rating {0:?}")]
    InvalidRating(String),

    /// The rating is outside 0 to 5.
    #[error("rating {0} is outside 0-5")]
    RatingOutOfRange(Decimal),

    /// None of a combo's pizza ids could be read.
    #[error("no valid pizza ids")]
    NoPizzaIds,
}

/// A row that was skipped while parsing.
#[derive(Debug, PartialEq)]
pub struct SkippedRow {
    /// One-based line number in the export
    pub line: usize,

    /// Reason it was skipped
    pub reason: RowError,
}

/// Rows parsed from one sheet, alongside the rows that were skipped.
#[derive(Debug)]
pub struct ParsedSheet<T> {
    /// Successfully parsed rows, in sheet order
    pub rows: Vec<T>,

    /// Rows left out, in sheet order
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for ParsedSheet<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Column layout of the pizza sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PizzaLayout {
    /// `id, name, description, price, image, rating`
    Legacy,

    /// `id, name, description, price, halfPrice, image, rating, promotion, recipe`
    Extended,
}

impl PizzaLayout {
    /// Pick a layout from the header row.
    #[must_use]
    pub fn detect(header: &str) -> Self {
        if header.split('\t').count() == LEGACY_COLUMNS {
            PizzaLayout::Legacy
        } else {
            PizzaLayout::Extended
        }
    }

    fn columns(self) -> PizzaColumns {
        match self {
            PizzaLayout::Legacy => PizzaColumns {
                half_price: None,
                image: 4,
                rating: 5,
                promotion: None,
                recipe: None,
            },
            PizzaLayout::Extended => PizzaColumns {
                half_price: Some(4),
                image: 5,
                rating: 6,
                promotion: Some(7),
                recipe: Some(8),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PizzaColumns {
    half_price: Option<usize>,
    image: usize,
    rating: usize,
    promotion: Option<usize>,
    recipe: Option<usize>,
}

/// Parse the pizza sheet.
pub fn parse_pizzas<'a>(text: &str, currency: &'a Currency) -> ParsedSheet<Pizza<'a>> {
    let mut lines = text.lines();

    let Some(header) = lines.next() else {
        return ParsedSheet::default();
    };

    let columns = PizzaLayout::detect(header).columns();

    parse_rows(lines, |cells| parse_pizza(cells, columns, currency))
}

/// Parse the combo sheet.
pub fn parse_combos<'a>(text: &str, currency: &'a Currency) -> ParsedSheet<ComboOffer<'a>> {
    let mut lines = text.lines();

    if lines.next().is_none() {
        return ParsedSheet::default();
    }

    parse_rows(lines, |cells| parse_combo(cells, currency))
}

fn parse_rows<'l, T>(
    lines: impl Iterator<Item = &'l str>,
    mut parse: impl FnMut(&[&'l str]) -> Result<T, RowError>,
) -> ParsedSheet<T> {
    let mut sheet = ParsedSheet::default();

    // Line 1 is the header.
    for (offset, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split('\t').collect();

        match parse(&cells) {
            Ok(row) => sheet.rows.push(row),
            Err(reason) => {
                let line = offset + 2;

                debug!(line, %reason, "skipping sheet row");
                sheet.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    sheet
}

fn cell<'l>(cells: &[&'l str], idx: usize) -> Option<&'l str> {
    cells
        .get(idx)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn required<'l>(cells: &[&'l str], idx: usize, field: &'static str) -> Result<&'l str, RowError> {
    cell(cells, idx).ok_or(RowError::MissingField(field))
}

fn parse_pizza<'a>(
    cells: &[&str],
    columns: PizzaColumns,
    currency: &'a Currency,
) -> Result<Pizza<'a>, RowError> {
    let raw_id = required(cells, 0, "id")?;
    let id = raw_id
        .parse::<u32>()
        .map_err(|_err| RowError::InvalidId(raw_id.to_string()))?;

    let name = required(cells, 1, "name")?;
    let price = parse_plain_amount(required(cells, 3, "price")?, currency)
        .map_err(|source| RowError::InvalidPrice {
            field: "price",
            source,
        })?;

    let half_price = columns
        .half_price
        .and_then(|idx| cell(cells, idx))
        .map(|raw| parse_plain_amount(raw, currency))
        .transpose()
        .map_err(|source| RowError::InvalidPrice {
            field: "halfPrice",
            source,
        })?;

    let rating = parse_rating(required(cells, columns.rating, "rating")?)?;

    let recipe = columns
        .recipe
        .and_then(|idx| cell(cells, idx))
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|ingredient| !ingredient.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Pizza {
        id: PizzaId::new(id),
        name: name.to_string(),
        description: cell(cells, 2).unwrap_or_default().to_string(),
        price: Money::from_minor(price, currency),
        half_price: half_price.map(|minor| Money::from_minor(minor, currency)),
        image: cell(cells, columns.image).unwrap_or_default().to_string(),
        rating,
        promotion: columns
            .promotion
            .and_then(|idx| cell(cells, idx))
            .map(str::to_string),
        recipe,
    })
}

fn parse_rating(raw: &str) -> Result<Decimal, RowError> {
    let rating = raw
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_err| RowError::InvalidRating(raw.to_string()))?;

    if rating < Decimal::ZERO || rating > Decimal::from(5) {
        return Err(RowError::RatingOutOfRange(rating));
    }

    Ok(rating)
}

fn parse_combo<'a>(cells: &[&str], currency: &'a Currency) -> Result<ComboOffer<'a>, RowError> {
    let name = required(cells, 0, "comboName")?;
    let raw_ids = required(cells, 1, "pizzaIds")?;
    let raw_price = required(cells, 2, "specialPrice")?;

    let ids: Vec<PizzaId> = raw_ids
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(id) => Some(PizzaId::new(id)),
            Err(_) => {
                debug!(combo = name, token, "ignoring unreadable pizza id");
                None
            }
        })
        .collect();

    if ids.is_empty() {
        return Err(RowError::NoPizzaIds);
    }

    let special_price =
        parse_locale_amount(raw_price, currency).map_err(|source| RowError::InvalidPrice {
            field: "specialPrice",
            source,
        })?;

    let combo = ComboOffer::new(name, ids, Money::from_minor(special_price, currency));

    Ok(match cell(cells, 3) {
        Some(promo) => combo.with_promo(promo),
        None => combo,
    })
}
