//! Catalog sources and loading.

use std::path::PathBuf;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rusty_money::iso::Currency;
use tracing::{debug, info, warn};

use crate::catalog::{
    Catalog, CatalogError, Sheet,
    tsv::{SkippedRow, parse_combos, parse_pizzas},
};

/// Somewhere the two menu sheets can be read from.
#[automock]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the raw pizza sheet export.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the sheet cannot be read.
    async fn fetch_pizzas(&self) -> Result<String, CatalogError>;

    /// Returns the raw combo sheet export.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the sheet cannot be read.
    async fn fetch_combos(&self) -> Result<String, CatalogError>;
}

/// Published TSV export of the pizza sheet.
pub const DEFAULT_PIZZAS_URL: &str = "https://docs.google.com/spreadsheets/d/1sAWtNHo2vGtWAZK_bMdCZfkI-oWqGyJ0QY_zms5ZNik/pub?gid=0&single=true&output=tsv";

/// Published spreadsheet exports fetched over HTTP.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    http: Client,
    pizzas_url: String,
    combos_url: Option<String>,
}

impl SpreadsheetSource {
    /// Create a source for the given export URLs. Without a combo URL the
    /// catalog has no combos.
    #[must_use]
    pub fn new(pizzas_url: impl Into<String>, combos_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            pizzas_url: pizzas_url.into(),
            combos_url,
        }
    }

    async fn fetch(&self, sheet: Sheet, url: &str) -> Result<String, CatalogError> {
        debug!(%sheet, url, "fetching sheet");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Fetch { sheet, source })?;

        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                sheet,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| CatalogError::Fetch { sheet, source })
    }
}

#[async_trait]
impl CatalogSource for SpreadsheetSource {
    async fn fetch_pizzas(&self) -> Result<String, CatalogError> {
        self.fetch(Sheet::Pizzas, &self.pizzas_url).await
    }

    async fn fetch_combos(&self) -> Result<String, CatalogError> {
        match &self.combos_url {
            Some(url) => self.fetch(Sheet::Combos, url).await,
            None => Ok(String::new()),
        }
    }
}

/// Sheet exports saved on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pizzas: PathBuf,
    combos: Option<PathBuf>,
}

impl FileSource {
    /// Create a source for the given export files. Without a combo file the
    /// catalog has no combos.
    #[must_use]
    pub fn new(pizzas: impl Into<PathBuf>, combos: Option<PathBuf>) -> Self {
        Self {
            pizzas: pizzas.into(),
            combos,
        }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch_pizzas(&self) -> Result<String, CatalogError> {
        tokio::fs::read_to_string(&self.pizzas)
            .await
            .map_err(|source| CatalogError::Io {
                sheet: Sheet::Pizzas,
                source,
            })
    }

    async fn fetch_combos(&self) -> Result<String, CatalogError> {
        let Some(path) = &self.combos else {
            return Ok(String::new());
        };

        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                sheet: Sheet::Combos,
                source,
            })
    }
}

/// A freshly loaded catalog and everything that was left out of it.
#[derive(Debug)]
pub struct LoadedCatalog {
    /// The usable catalog
    pub catalog: Catalog<'static>,

    /// Rows that could not be parsed
    pub skipped: Vec<(Sheet, SkippedRow)>,

    /// Rows that parsed but clashed with an earlier row
    pub rejected: Vec<CatalogError>,

    /// Why combos are missing, if the combo sheet could not be read
    pub combos_error: Option<CatalogError>,
}

/// Builds a catalog from a [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatalogLoader<S> {
    source: S,
    currency: &'static Currency,
}

impl<S: CatalogSource> CatalogLoader<S> {
    /// Create a loader pricing the menu in `currency`.
    pub fn new(source: S, currency: &'static Currency) -> Self {
        Self { source, currency }
    }

    /// Fetch both sheets concurrently and assemble a catalog.
    ///
    /// A combo sheet that cannot be read leaves the catalog without combos.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the pizza sheet cannot be read.
    pub async fn load(&self) -> Result<LoadedCatalog, CatalogError> {
        let (pizzas, combos) = tokio::join!(self.source.fetch_pizzas(), self.source.fetch_combos());

        let pizzas = pizzas?;

        let mut catalog = Catalog::new(self.currency);
        let mut skipped = Vec::new();
        let mut rejected = Vec::new();

        let sheet = parse_pizzas(&pizzas, self.currency);

        skipped.extend(sheet.skipped.into_iter().map(|row| (Sheet::Pizzas, row)));

        for pizza in sheet.rows {
            if let Err(error) = catalog.insert_pizza(pizza) {
                warn!(%error, "keeping first pizza row");
                rejected.push(error);
            }
        }

        let combos_error = match combos {
            Ok(text) => {
                let sheet = parse_combos(&text, self.currency);

                skipped.extend(sheet.skipped.into_iter().map(|row| (Sheet::Combos, row)));

                for combo in sheet.rows {
                    if let Err(error) = catalog.insert_combo(combo) {
                        warn!(%error, "keeping first combo row");
                        rejected.push(error);
                    }
                }

                None
            }
            Err(error) => {
                warn!(%error, "combos unavailable");
                Some(error)
            }
        };

        info!(
            pizzas = catalog.pizzas().len(),
            combos = catalog.combos().len(),
            skipped = skipped.len(),
            "catalog loaded"
        );

        Ok(LoadedCatalog {
            catalog,
            skipped,
            rejected,
            combos_error,
        })
    }
}
