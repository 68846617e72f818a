//! Order log

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, multipart::Form};
use thiserror::Error;
use tracing::debug;

use crate::order::FormPayload;

/// Google Forms endpoint orders are logged to.
pub const DEFAULT_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSdFQ42trIlOffF9smenq5oiCfOCLdjc42Q7bAurih4wWl_fhw/formResponse";

/// Errors raised while logging an order.
#[derive(Debug, Error)]
pub enum OrderLogError {
    /// The request could not be sent.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The form responded with a non-success status.
    #[error("order log responded with status {0}")]
    UnexpectedStatus(u16),
}

/// Somewhere orders are recorded.
#[automock]
#[async_trait]
pub trait OrderLog: Send + Sync {
    /// Record an order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLogError`] if the order was not recorded.
    async fn submit(&self, payload: &FormPayload) -> Result<(), OrderLogError>;
}

/// Logs orders by submitting a Google Form.
#[derive(Debug, Clone)]
pub struct GoogleFormsLog {
    http: Client,
    url: String,
}

impl GoogleFormsLog {
    /// Create a log posting to the given form response URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

impl Default for GoogleFormsLog {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_URL)
    }
}

#[async_trait]
impl OrderLog for GoogleFormsLog {
    async fn submit(&self, payload: &FormPayload) -> Result<(), OrderLogError> {
        let form = payload
            .fields()
            .iter()
            .fold(Form::new(), |form, (key, value)| form.text(*key, value.clone()));

        let response = self.http.post(&self.url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(OrderLogError::UnexpectedStatus(status.as_u16()));
        }

        debug!(status = status.as_u16(), "order logged");

        Ok(())
    }
}
