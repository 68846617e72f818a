//! Dispatch
//!
//! Sending a composed order: the customer's WhatsApp opens with the message
//! pre-filled, and the order is recorded in the order log. Only the first can
//! fail an order.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{cart::Cart, order::ComposedOrder};

pub mod forms;
pub mod whatsapp;

pub use forms::{DEFAULT_FORM_URL, GoogleFormsLog, MockOrderLog, OrderLog, OrderLogError};
pub use whatsapp::{
    CommandOpener, DEFAULT_WHATSAPP_NUMBER, LaunchError, LinkOpener, LoggingOpener,
    MockLinkOpener, whatsapp_url,
};

/// Errors that fail a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The WhatsApp link could not be opened.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// What happened when an order was dispatched.
#[derive(Debug)]
pub struct DispatchReport {
    /// Link that was opened
    pub url: String,

    /// Why the order log failed, if it did
    pub order_log_error: Option<OrderLogError>,
}

impl DispatchReport {
    /// Check if the order reached the order log.
    #[must_use]
    pub fn order_logged(&self) -> bool {
        self.order_log_error.is_none()
    }
}

/// Sends composed orders.
#[derive(Clone)]
pub struct Dispatcher {
    opener: Arc<dyn LinkOpener>,
    order_log: Arc<dyn OrderLog>,
    whatsapp_number: String,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("whatsapp_number", &self.whatsapp_number)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher sending to `whatsapp_number`.
    pub fn new(
        opener: Arc<dyn LinkOpener>,
        order_log: Arc<dyn OrderLog>,
        whatsapp_number: impl Into<String>,
    ) -> Self {
        Self {
            opener,
            order_log,
            whatsapp_number: whatsapp_number.into(),
        }
    }

    /// Open the WhatsApp link, then record the order.
    ///
    /// The order log is not attempted when the link fails to open. An order
    /// log failure is reported but does not fail the dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Launch`] if the link cannot be built or opened.
    pub async fn dispatch(&self, order: &ComposedOrder<'_>) -> Result<DispatchReport, DispatchError> {
        let url = whatsapp_url(&self.whatsapp_number, &order.message)?;

        self.opener.open(&url)?;

        info!(total = %order.summary.total(), "order sent");

        let order_log_error = match self.order_log.submit(&order.form).await {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, "failed to log order");
                Some(error)
            }
        };

        Ok(DispatchReport {
            url,
            order_log_error,
        })
    }

    /// Dispatch an order built from `cart`, clearing the cart once sent.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Launch`] if the link cannot be opened; the cart
    /// is left untouched.
    pub async fn dispatch_cart(
        &self,
        order: &ComposedOrder<'_>,
        cart: &mut Cart,
    ) -> Result<DispatchReport, DispatchError> {
        let report = self.dispatch(order).await?;

        cart.clear();

        Ok(report)
    }
}
