use serde::Serialize;
use url::{ParseError, Url};

use super::CatalogFields;
use crate::render::render_grid;
use crate::table::{format_currency_with, resolve, Money, Row};

/// Placeholder shown where a product has no usable photo.
pub const MISSING_PHOTO: &str = "—";

const COLUMNS: [&str; 7] = [
    "SKU",
    "Description",
    "Category",
    "Cost",
    "Price",
    "Photo",
    "Stock",
];

/// Product photo reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Thumbnail {
    Image(Url),
    Missing,
}

impl Thumbnail {
    /// Turn a raw cell into a photo link.
    ///
    /// Relative references are joined onto `base` when there is one. Blank or
    /// unusable values become [`Thumbnail::Missing`].
    pub fn resolve(raw: &str, base: Option<&Url>) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Thumbnail::Missing;
        }
        match Url::parse(raw) {
            Ok(url) => Thumbnail::Image(url),
            Err(ParseError::RelativeUrlWithoutBase) => base
                .and_then(|b| b.join(raw).ok())
                .map(Thumbnail::Image)
                .unwrap_or(Thumbnail::Missing),
            Err(_) => Thumbnail::Missing,
        }
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            Thumbnail::Image(url) => Some(url),
            Thumbnail::Missing => None,
        }
    }
}

/// One catalog line ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub description: String,
    pub category: String,
    pub cost: Money,
    pub price: Money,
    pub photo: Thumbnail,
    pub stock: String,
}

impl CatalogEntry {
    pub fn from_row(
        row: &Row,
        fields: &CatalogFields,
        currency_symbol: &str,
        base: Option<&Url>,
    ) -> Self {
        Self {
            sku: resolve(row, &fields.sku).to_string(),
            description: resolve(row, &fields.description).to_string(),
            category: resolve(row, &fields.category).to_string(),
            cost: format_currency_with(resolve(row, &fields.cost), currency_symbol),
            price: format_currency_with(resolve(row, &fields.price), currency_symbol),
            photo: Thumbnail::resolve(resolve(row, &fields.photo), base),
            stock: resolve(row, &fields.stock).trim().to_string(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.sku.clone(),
            self.description.clone(),
            self.category.clone(),
            self.cost.to_string(),
            self.price.to_string(),
            self.photo
                .url()
                .map(Url::to_string)
                .unwrap_or_else(|| MISSING_PHOTO.to_string()),
            self.stock.clone(),
        ]
    }
}

/// Text table of `entries`, one product per line.
pub fn render_table(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "no products\n".to_string();
    }
    let rows: Vec<Vec<String>> = entries.iter().map(CatalogEntry::cells).collect();
    render_grid(&COLUMNS, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::from_pairs([
            ("Codice", "PP-001"),
            ("Descrizione", "Biglietti da visita"),
            ("CATEGORIA", "Stampa"),
            ("prezzo_acquisto", "1.200,5"),
            ("Prezzo", "€ 25"),
            ("FOTO", "img/pp-001.jpg"),
            ("DISPONIBILITA'", " 12 "),
        ])
    }

    #[test]
    fn test_entry_from_row_with_default_aliases() {
        let base = Url::parse("https://crm.example.it/output/catalogo.csv").unwrap();
        let entry = CatalogEntry::from_row(&row(), &CatalogFields::default(), "€", Some(&base));

        assert_eq!(entry.sku, "PP-001");
        assert_eq!(entry.description, "Biglietti da visita");
        assert_eq!(entry.category, "Stampa");
        assert_eq!(entry.cost, Money::Formatted("€ 1200,50".into()));
        assert_eq!(entry.price, Money::PreFormatted("€ 25".into()));
        assert_eq!(
            entry.photo.url().map(Url::as_str),
            Some("https://crm.example.it/output/img/pp-001.jpg")
        );
        assert_eq!(entry.stock, "12");
    }

    #[test]
    fn test_missing_columns_render_blank() {
        let row = Row::from_pairs([("SKU", "X")]);
        let entry = CatalogEntry::from_row(&row, &CatalogFields::default(), "€", None);
        assert_eq!(entry.description, "");
        assert_eq!(entry.cost, Money::Empty);
        assert_eq!(entry.photo, Thumbnail::Missing);
    }

    #[test]
    fn test_thumbnail_resolution() {
        assert_eq!(Thumbnail::resolve("  ", None), Thumbnail::Missing);
        assert_eq!(Thumbnail::resolve("img/a.jpg", None), Thumbnail::Missing);
        assert!(matches!(
            Thumbnail::resolve("https://cdn.example.it/a.jpg", None),
            Thumbnail::Image(_)
        ));
        assert_eq!(Thumbnail::resolve("http://[bad", None), Thumbnail::Missing);
    }

    #[test]
    fn test_render_table() {
        let entry = CatalogEntry::from_row(&row(), &CatalogFields::default(), "€", None);
        let text = render_table(&[entry]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SKU"));
        assert!(lines[2].contains("PP-001"));
        assert!(lines[2].contains("€ 1200,50"));
        assert!(lines[2].contains(MISSING_PHOTO));
        assert!(lines[2].ends_with("12"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&[]), "no products\n");
    }

    #[test]
    fn test_entry_json_shape() {
        let row = Row::from_pairs([("SKU", "A"), ("PREZZO", "abc")]);
        let entry = CatalogEntry::from_row(&row, &CatalogFields::default(), "€", None);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sku"], "A");
        assert_eq!(json["price"]["kind"], "unparsed");
        assert_eq!(json["photo"]["kind"], "missing");
    }
}
