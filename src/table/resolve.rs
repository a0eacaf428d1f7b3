//! Header-to-field resolution through ordered alias lists.

use serde::{Deserialize, Serialize};

use super::Row;

/// How far resolution may go after exact header matches fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Exact (case/trim-insensitive) match, then "header contains candidate".
    #[default]
    ExactThenSubstring,
    /// Exact (case/trim-insensitive) match only.
    ExactOnly,
}

/// Ordered candidate header names for one logical field.
///
/// Deserializes from a plain list of names; the match mode is applied by
/// whoever owns the alias table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FieldAlias {
    candidates: Vec<String>,
    mode: MatchMode,
}

impl FieldAlias {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn exact_only(self) -> Self {
        self.with_mode(MatchMode::ExactOnly)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl From<Vec<String>> for FieldAlias {
    fn from(candidates: Vec<String>) -> Self {
        FieldAlias::new(candidates)
    }
}

impl From<FieldAlias> for Vec<String> {
    fn from(alias: FieldAlias) -> Self {
        alias.candidates
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized header → value, in first-seen header order.
///
/// Headers that normalize to the same key collapse into one entry holding
/// the later header's value.
struct HeaderLookup<'r> {
    entries: Vec<(String, &'r str)>,
}

impl<'r> HeaderLookup<'r> {
    fn new(row: &'r Row) -> Self {
        let mut entries: Vec<(String, &'r str)> = Vec::with_capacity(row.len());
        for (header, value) in row.iter() {
            let key = normalize(header);
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }

    fn exact(&self, candidate: &str) -> Option<&'r str> {
        self.entries
            .iter()
            .find(|(key, _)| key == candidate)
            .map(|(_, value)| *value)
    }

    fn containing(&self, candidate: &str) -> Option<&'r str> {
        self.entries
            .iter()
            .find(|(key, _)| key.contains(candidate))
            .map(|(_, value)| *value)
    }
}

/// Resolve one logical field of `row` through `alias`.
///
/// Every candidate is tried for an exact match before any candidate is tried
/// as a substring. A miss yields `""`, same as a present but empty column.
/// Blank candidates are ignored.
pub fn resolve<'r>(row: &'r Row, alias: &FieldAlias) -> &'r str {
    let lookup = HeaderLookup::new(row);
    let candidates: Vec<String> = alias
        .candidates
        .iter()
        .map(|c| normalize(c))
        .filter(|c| !c.is_empty())
        .collect();

    if let Some(value) = candidates.iter().find_map(|c| lookup.exact(c)) {
        return value;
    }
    if alias.mode == MatchMode::ExactOnly {
        return "";
    }
    candidates
        .iter()
        .find_map(|c| lookup.containing(c))
        .unwrap_or("")
}
