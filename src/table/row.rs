use serde::ser::{Serialize, SerializeMap, Serializer};

/// One data record: header → trimmed value, in header order.
///
/// Headers are unique within a row. When the source repeats a header the
/// last value wins and the key keeps the position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Zip `values` positionally onto `headers`.
    ///
    /// Missing trailing values become empty strings, extra values are dropped.
    pub fn from_values(headers: &[String], values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let mut row = Row::default();
        for header in headers {
            let value = values.next().unwrap_or_default();
            row.insert(header, value.trim().to_string());
        }
        row
    }

    /// Build a row from explicit `(header, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::default();
        for (header, value) in pairs {
            let header = header.into();
            row.insert(&header, value.into().trim().to_string());
        }
        row
    }

    fn insert(&mut self, header: &str, value: String) {
        match self.fields.iter_mut().find(|(h, _)| h == header) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((header.to_string(), value)),
        }
    }

    /// Value stored under the exact header name.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every value is the empty string.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}
