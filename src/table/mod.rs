// src/table/mod.rs
//! Delimited-text table engine.
//!
//! Turns a complete CSV/SSV document into a [`ParsedTable`], resolves logical
//! fields through [`FieldAlias`] lists, renders locale-formatted money and
//! filters rows by an identifier substring. Everything here is pure and
//! total: any input string yields a structurally valid result.

mod currency;
mod delimiter;
mod filter;
mod resolve;
mod row;
mod tokenize;

pub use currency::{format_currency, format_currency_with, Money, EURO};
pub use delimiter::{detect_delimiter, COMMA, SEMICOLON};
pub use filter::filter_by_sku;
pub use resolve::{resolve, FieldAlias, MatchMode};
pub use row::Row;
pub use tokenize::split_line;

use serde::Serialize;
use tracing::debug;

/// Headers and surviving rows of one document load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub delimiter: char,
}

impl Default for ParsedTable {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            delimiter: COMMA,
        }
    }
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a whole document.
///
/// Line endings are normalized and whitespace-only lines skipped. The first
/// remaining line is the header and fixes the delimiter for the document.
/// Rows whose every field is empty are dropped.
#[tracing::instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse(text: &str) -> ParsedTable {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = normalized.split('\n').filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        debug!("empty document");
        return ParsedTable::default();
    };

    let delimiter = detect_delimiter(header_line);
    let headers = split_line(header_line, delimiter);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let row = Row::from_values(&headers, split_line(line, delimiter));
        if row.is_blank() {
            skipped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(
        delimiter = %delimiter,
        columns = headers.len(),
        rows = rows.len(),
        skipped,
        "parsed table"
    );

    ParsedTable {
        headers,
        rows,
        delimiter,
    }
}
