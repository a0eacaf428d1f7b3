// src/catalog/mod.rs
//! Product catalog view over a parsed CSV export.

mod entry;
mod fields;

pub use entry::{render_table, CatalogEntry, Thumbnail, MISSING_PHOTO};
pub use fields::CatalogFields;

use reqwest::Client;
use tracing::{info, warn};

use crate::fetch::{FetchError, Source};
use crate::table::{filter_by_sku, parse, ParsedTable};

/// Catalog state: where it loads from and the last table that loaded.
pub struct Catalog {
    source: Source,
    fields: CatalogFields,
    currency_symbol: String,
    table: Option<ParsedTable>,
}

impl Catalog {
    pub fn new(source: Source, fields: CatalogFields, currency_symbol: impl Into<String>) -> Self {
        Self {
            source,
            fields,
            currency_symbol: currency_symbol.into(),
            table: None,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn table(&self) -> Option<&ParsedTable> {
        self.table.as_ref()
    }

    /// Load and parse the source, replacing the current table.
    ///
    /// On failure the previous table stays in place. Returns the number of
    /// rows now loaded.
    pub async fn reload(&mut self, client: &Client) -> Result<usize, FetchError> {
        let text = match self.source.load(client).await {
            Ok(text) => text,
            Err(err) => {
                warn!(source = %self.source, error = %err, "catalog load failed; keeping previous table");
                return Err(err);
            }
        };
        let table = parse(&text);
        let rows = table.rows.len();
        info!(source = %self.source, rows, columns = table.headers.len(), "catalog loaded");
        self.table = Some(table);
        Ok(rows)
    }

    /// Entries whose SKU contains `query`; a blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<CatalogEntry> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        let base = self.source.base_url();
        filter_by_sku(&table.rows, &self.fields.sku, query)
            .into_iter()
            .map(|row| {
                CatalogEntry::from_row(row, &self.fields, &self.currency_symbol, base.as_ref())
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.search("")
    }
}

/// One line typed at the interactive catalog prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Refresh,
    Quit,
    Search(String),
}

impl Prompt {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":r" | ":refresh" => Prompt::Refresh,
            ":q" | ":quit" => Prompt::Quit,
            query => Prompt::Search(query.to_string()),
        }
    }
}
