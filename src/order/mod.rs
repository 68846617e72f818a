//! Orders
//!
//! Turning a cart or a combo plus the customer's details into the message and
//! form payload that get dispatched.

use jiff::civil::{Date, Time};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::Cart,
    catalog::Catalog,
    combos::ComboPricing,
    pricing::PricingError,
    summary::OrderSummary,
};

pub mod flow;
pub mod form;
pub mod message;
pub mod validation;

pub use flow::{FlowError, FlowState, OrderFlow};
pub use form::FormPayload;
pub use message::compose_message;
pub use validation::{FieldError, OrderField, ValidationErrors, validate};

/// Errors raised while composing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The draft is incomplete.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The order could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMethod {
    /// Sent to the customer's address
    #[default]
    Deliver,

    /// Collected at the shop
    PickUp,
}

impl DeliveryMethod {
    /// Label used in messages and the order log.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeliveryMethod::Deliver => "Enviar",
            DeliveryMethod::PickUp => "Retirar",
        }
    }
}

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    /// Customer name
    pub name: String,

    /// Delivery address, only needed for [`DeliveryMethod::Deliver`]
    pub address: String,

    /// Contact phone
    pub phone: String,

    /// Free text for the kitchen
    pub special_instructions: String,
}

/// Everything the customer filled in for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Contact details
    pub contact: ContactDetails,

    /// Day the order is wanted
    pub desired_date: Option<Date>,

    /// Time the order is wanted
    pub desired_time: Option<Time>,

    /// Earliest acceptable desired date, normally today in the shop's zone.
    /// Without it any desired date is accepted.
    pub earliest_date: Option<Date>,

    /// Delivery or pick up
    pub delivery: DeliveryMethod,

    /// Rating from 0 to 5
    pub rating: Option<u8>,
}

impl OrderDraft {
    /// Desired date and time as sent to the pizzeria, e.g. `"2024-06-01 21:30"`.
    pub fn desired_time_label(&self) -> Option<String> {
        let time = self
            .desired_time
            .map(|time| time.strftime("%H:%M").to_string());

        match (self.desired_date, time) {
            (Some(date), Some(time)) => Some(format!("{date} {time}")),
            (Some(date), None) => Some(date.to_string()),
            (None, time) => time,
        }
    }
}

/// What is being ordered.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'s> {
    /// The contents of a cart
    Cart(&'s Cart),

    /// A combo, by name
    Combo(&'s str),
}

/// A validated order, ready to dispatch.
#[derive(Debug, Clone)]
pub struct ComposedOrder<'a> {
    /// Priced snapshot of the order
    pub summary: OrderSummary<'a>,

    /// Message for the pizzeria
    pub message: String,

    /// Order log payload
    pub form: FormPayload,
}

/// Validate a draft and compose its message and form payload.
///
/// # Errors
///
/// Returns [`OrderError::Invalid`] if the draft fails validation, or
/// [`OrderError::Pricing`] if the order cannot be priced.
pub fn compose<'a>(
    draft: &OrderDraft,
    selection: Selection<'_>,
    catalog: &Catalog<'a>,
) -> Result<ComposedOrder<'a>, OrderError> {
    validate(draft, selection, catalog)?;

    let summary = match selection {
        Selection::Cart(cart) => OrderSummary::from_cart(cart, catalog)?,
        Selection::Combo(name) => {
            let combo = catalog
                .combo(name)
                .ok_or_else(|| ValidationErrors::from(FieldError::UnknownCombo(name.to_string())))?;

            OrderSummary::from_combo(&ComboPricing::resolve(combo, catalog)?)
        }
    };

    let message = compose_message(draft, &summary);
    let form = FormPayload::new(draft, &summary);

    debug!(
        lines = summary.lines().len(),
        total = %summary.total(),
        delivery = draft.delivery.label(),
        "composed order"
    );

    Ok(ComposedOrder {
        summary,
        message,
        form,
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use rusty_money::{Money, iso::ARS};
    use testresult::TestResult;

    use crate::{
        combos::ComboOffer,
        products::{Pizza, PizzaId, Portion},
    };

    use super::*;

    #[test]
    fn desired_time_label_combines_date_and_time() {
        let mut draft = OrderDraft {
            desired_date: Some(date(2024, 6, 1)),
            desired_time: Some(time(20, 5, 0, 0)),
            ..OrderDraft::default()
        };

        assert_eq!(draft.desired_time_label().as_deref(), Some("2024-06-01 20:05"));

        draft.desired_date = None;

        assert_eq!(draft.desired_time_label().as_deref(), Some("20:05"));

        draft.desired_time = None;

        assert_eq!(draft.desired_time_label(), None);
    }

    #[test]
    fn compose_refuses_invalid_drafts() {
        let catalog = Catalog::new(ARS);
        let cart = Cart::new();

        let result = compose(&OrderDraft::default(), Selection::Cart(&cart), &catalog);

        let Err(OrderError::Invalid(errors)) = result else {
            panic!("expected validation errors");
        };

        assert_eq!(errors.first_field(), Some(OrderField::Name));
    }

    #[test]
    fn compose_builds_message_and_payload_from_one_snapshot() -> TestResult {
        let mut catalog = Catalog::with_pizzas(
            ARS,
            [
                Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS)),
                Pizza::new(2, "Napolitana", Money::from_minor(1000, ARS)),
            ],
        )?;

        catalog.insert_combo(ComboOffer::new(
            "Pareja",
            [PizzaId::new(1), PizzaId::new(2)],
            Money::from_minor(1500, ARS),
        ))?;

        let draft = OrderDraft {
            contact: ContactDetails {
                name: "Ana".to_string(),
                phone: "3442475466".to_string(),
                ..ContactDetails::default()
            },
            delivery: DeliveryMethod::PickUp,
            ..OrderDraft::default()
        };

        let mut cart = Cart::new();

        if let Some(pizza) = catalog.pizza(PizzaId::new(2)) {
            cart.add_item(pizza, Portion::Half);
        }

        let order = compose(&draft, Selection::Cart(&cart), &catalog)?;

        assert!(order.message.contains("1x Napolitana (media)"));
        assert_eq!(order.form.get(form::TOTAL_FIELD), Some("5.00"));

        let order = compose(&draft, Selection::Combo("Pareja"), &catalog)?;

        assert_eq!(order.summary.total(), Money::from_minor(1500, ARS));
        assert_eq!(order.form.get(form::ITEMS_FIELD), Some("Pareja"));

        Ok(())
    }
}
