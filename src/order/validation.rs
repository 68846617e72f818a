//! Order validation

use std::fmt;

use jiff::civil::Date;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    order::{DeliveryMethod, OrderDraft, Selection},
};

/// Highest rating a customer can give.
pub const MAX_RATING: u8 = 5;

/// Fields of the order form, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderField {
    /// Customer name
    Name,

    /// Contact phone
    Phone,

    /// Delivery address
    Address,

    /// Desired date and time
    DesiredTime,

    /// Rating of the previous experience
    Rating,

    /// Cart contents or chosen combo
    Items,
}

impl OrderField {
    /// Label shown to the customer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OrderField::Name => "nombre",
            OrderField::Phone => "teléfono",
            OrderField::Address => "dirección",
            OrderField::DesiredTime => "fecha de entrega",
            OrderField::Rating => "puntaje",
            OrderField::Items => "pedido",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single problem with an order draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field is empty.
    #[error("Por favor completa el campo: {0}")]
    Missing(OrderField),

    /// The desired date has already passed.
    #[error("La fecha de entrega {0} ya pasó")]
    DateInPast(Date),

    /// The rating is above the maximum.
    #[error("El puntaje debe estar entre 0 y 5, no {0}")]
    RatingOutOfRange(u8),

    /// Nothing was selected to order.
    #[error("El carrito está vacío")]
    EmptyCart,

    /// The selected combo is not on the menu.
    #[error("El combo {0:?} ya no está disponible")]
    UnknownCombo(String),
}

impl FieldError {
    /// The field this error belongs to.
    #[must_use]
    pub fn field(&self) -> OrderField {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::DateInPast(_) => OrderField::DesiredTime,
            FieldError::RatingOutOfRange(_) => OrderField::Rating,
            FieldError::EmptyCart | FieldError::UnknownCombo(_) => OrderField::Items,
        }
    }
}

/// Every problem found with an order draft, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("order has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 4]>,
}

impl ValidationErrors {
    /// All errors, in field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The first offending field, which the caller should focus.
    pub fn first_field(&self) -> Option<OrderField> {
        self.errors.first().map(FieldError::field)
    }

    /// Message for the first error.
    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(ToString::to_string)
    }

    /// Check if a given field has an error.
    pub fn has(&self, field: OrderField) -> bool {
        self.errors.iter().any(|error| error.field() == field)
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        let mut errors = SmallVec::new();
        errors.push(error);

        Self { errors }
    }
}

/// Validate an order draft and its selection against the catalog.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every problem, sorted by field.
pub fn validate(
    draft: &OrderDraft,
    selection: Selection<'_>,
    catalog: &Catalog<'_>,
) -> Result<(), ValidationErrors> {
    let mut errors: SmallVec<[FieldError; 4]> = SmallVec::new();

    let contact = &draft.contact;

    if is_blank(&contact.name) {
        errors.push(FieldError::Missing(OrderField::Name));
    }

    if is_blank(&contact.phone) {
        errors.push(FieldError::Missing(OrderField::Phone));
    }

    if draft.delivery == DeliveryMethod::Deliver && is_blank(&contact.address) {
        errors.push(FieldError::Missing(OrderField::Address));
    }

    if let Some(desired) = draft
        .desired_date
        .filter(|desired| draft.earliest_date.is_some_and(|earliest| *desired < earliest))
    {
        errors.push(FieldError::DateInPast(desired));
    }

    if let Some(rating) = draft.rating.filter(|rating| *rating > MAX_RATING) {
        errors.push(FieldError::RatingOutOfRange(rating));
    }

    match selection {
        Selection::Cart(cart) if cart.is_empty() => errors.push(FieldError::EmptyCart),
        Selection::Combo(name) if catalog.combo(name).is_none() => {
            errors.push(FieldError::UnknownCombo(name.to_string()));
        }
        Selection::Cart(_) | Selection::Combo(_) => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
