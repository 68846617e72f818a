//! Logging for the `pizzeria` binary.
//!
//! Catalog rows left off the menu, dispatch outcomes and order log failures
//! are reported through `tracing`. Everything goes to stderr, leaving stdout
//! to the menu tables and order summaries.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::ParseError,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig};

/// HTTP client crates are noisy below `warn` while fetching sheets.
const QUIET_DEPENDENCIES: &str = "reqwest=warn,hyper=warn,hyper_util=warn";

#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    #[error("invalid log level {level:?}: {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: ParseError,
    },

    #[error("logging is already set up: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber in the configured format.
pub(crate) fn init(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = order_filter(&config.log_level)?;

    match config.log_format {
        LogFormat::Compact => install(
            filter,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        ),
        LogFormat::Json => install(
            filter,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr),
        ),
    }
}

fn order_filter(level: &str) -> Result<EnvFilter, ObservabilityError> {
    EnvFilter::try_new(format!("{level},{QUIET_DEPENDENCIES}")).map_err(|source| {
        ObservabilityError::InvalidLevel {
            level: level.to_string(),
            source,
        }
    })
}

fn install<L>(filter: EnvFilter, layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(())
}
