use super::{resolve, FieldAlias, Row};

/// Keep the rows whose resolved `alias` field contains `query`.
///
/// The query is trimmed; a blank query keeps every row. Matching is
/// case-sensitive. Input order is preserved and rows are borrowed, never
/// copied, so the result can be fed straight back in.
pub fn filter_by_sku<'a, I>(rows: I, alias: &FieldAlias, query: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let query = query.trim();
    if query.is_empty() {
        return rows.into_iter().collect();
    }
    rows.into_iter()
        .filter(|row| resolve(row, alias).contains(query))
        .collect()
}
