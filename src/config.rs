//! Command line configuration

use std::path::PathBuf;

use clap::Args;
use pizzeria::{
    catalog::DEFAULT_PIZZAS_URL,
    dispatch::{DEFAULT_FORM_URL, DEFAULT_WHATSAPP_NUMBER},
};

/// Where the menu is read from.
///
/// A fixture wins over local files, and local files win over the published
/// sheets.
#[derive(Debug, Args)]
pub(crate) struct CatalogConfig {
    /// Published TSV export of the pizza sheet
    #[arg(long, env = "PIZZERIA_PIZZAS_URL", default_value = DEFAULT_PIZZAS_URL)]
    pub pizzas_url: String,

    /// Published TSV export of the combo sheet
    #[arg(long, env = "PIZZERIA_COMBOS_URL")]
    pub combos_url: Option<String>,

    /// Local TSV export of the pizza sheet
    #[arg(long, env = "PIZZERIA_PIZZAS_FILE")]
    pub pizzas_file: Option<PathBuf>,

    /// Local TSV export of the combo sheet
    #[arg(long, env = "PIZZERIA_COMBOS_FILE", requires = "pizzas_file")]
    pub combos_file: Option<PathBuf>,

    /// Name of a YAML menu under `<fixtures-dir>/menus`
    #[arg(long, env = "PIZZERIA_FIXTURE")]
    pub fixture: Option<String>,

    /// Directory holding menu fixtures
    #[arg(long, env = "PIZZERIA_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// ISO currency code the sheets are priced in
    #[arg(long, env = "PIZZERIA_CURRENCY", default_value = "ARS")]
    pub currency: String,
}

/// Where orders are sent.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// WhatsApp number orders are sent to
    #[arg(long, env = "PIZZERIA_WHATSAPP_NUMBER", default_value = DEFAULT_WHATSAPP_NUMBER)]
    pub whatsapp_number: String,

    /// Google Forms response URL orders are logged to
    #[arg(long, env = "PIZZERIA_FORM_URL", default_value = DEFAULT_FORM_URL)]
    pub form_url: String,

    /// Command used to open the WhatsApp link (e.g., "xdg-open"); the link is
    /// only printed when unset
    #[arg(long, env = "PIZZERIA_OPEN_COMMAND")]
    pub open_command: Option<String>,
}

/// How diagnostics are written to stderr.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// One line per event, for a terminal
    Compact,

    /// One JSON object per event, for collecting order logs
    Json,
}

/// Where skipped menu rows and dispatch outcomes are reported.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Level or filter directives, e.g. `info` or `warn,pizzeria::catalog=debug`
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Diagnostics format
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Opening hours settings.
#[derive(Debug, Args)]
pub(crate) struct ScheduleConfig {
    /// Time zone the opening hours are kept in
    #[arg(long, env = "PIZZERIA_TIMEZONE", default_value = "America/Argentina/Buenos_Aires")]
    pub timezone: String,
}
