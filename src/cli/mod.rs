//! Command line interface

use std::io;

use clap::{Parser, Subcommand};
use jiff::{Zoned, civil::DateTime};
use pizzeria::{
    catalog::{Catalog, CatalogLoader, FileSource, LoadedCatalog, SpreadsheetSource},
    fixtures::Fixture,
};
use rusty_money::iso;
use tracing::{error, warn};

use crate::config::{CatalogConfig, LoggingConfig, ScheduleConfig};

mod menu;
mod order;
mod status;

#[derive(Debug, Parser)]
#[command(name = "pizzeria", about = "Browse the menu and send orders", long_about = None)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the pizzas and combos on the menu
    Menu(menu::MenuArgs),

    /// Send an order over WhatsApp
    Order(order::OrderArgs),

    /// Print the opening hours
    Status(status::StatusArgs),
}

impl Cli {
    /// Load configuration from `.env`, the environment and CLI arguments
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Menu(args) => menu::run(&args).await,
            Commands::Order(args) => order::run(&args).await,
            Commands::Status(args) => status::run(&args),
        }
    }
}

/// Load the menu from a fixture, local exports or the published sheets.
async fn load_catalog(config: &CatalogConfig) -> Result<Catalog<'static>, String> {
    if let Some(name) = &config.fixture {
        return Fixture::with_base_path(&config.fixtures_dir)
            .load_menu(name)
            .map_err(|error| format!("failed to load fixture {name}: {error}"));
    }

    let currency = iso::find(&config.currency)
        .ok_or_else(|| format!("unknown currency code: {}", config.currency))?;

    let loaded = match &config.pizzas_file {
        Some(pizzas) => {
            let source = FileSource::new(pizzas.clone(), config.combos_file.clone());

            CatalogLoader::new(source, currency).load().await
        }
        None => {
            let source = SpreadsheetSource::new(&config.pizzas_url, config.combos_url.clone());

            CatalogLoader::new(source, currency).load().await
        }
    };

    let loaded = loaded.map_err(|error| {
        error!(%error, "menu unavailable");
        error.user_message().to_string()
    })?;

    Ok(report_dropped_rows(loaded))
}

fn report_dropped_rows(loaded: LoadedCatalog) -> Catalog<'static> {
    for (sheet, row) in &loaded.skipped {
        warn!(%sheet, line = row.line, reason = %row.reason, "row left off the menu");
    }

    for error in &loaded.rejected {
        warn!(%error, "row left off the menu");
    }

    loaded.catalog
}

/// Current local time in the configured zone.
fn local_now(config: &ScheduleConfig) -> Result<DateTime, String> {
    Zoned::now()
        .in_tz(&config.timezone)
        .map(|now| now.datetime())
        .map_err(|error| format!("unknown time zone {}: {error}", config.timezone))
}

fn output_error(error: io::Error) -> String {
    format!("failed to write output: {error}")
}
