use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::table::{FieldAlias, MatchMode};

/// Header spellings seen in the catalog exports.
static DEFAULT_FIELDS: Lazy<CatalogFields> = Lazy::new(|| CatalogFields {
    sku: FieldAlias::new(["SKU", "Codice", "codice", "sku"]),
    description: FieldAlias::new(["DESCRIZIONE", "Descrizione", "description"]),
    category: FieldAlias::new(["CATEGORIA", "Categoria", "category"]),
    cost: FieldAlias::new([
        "COSTO",
        "Costo",
        "purchase_price",
        "prezzo_acquisto",
        "acquisto",
    ]),
    price: FieldAlias::new([
        "PREZZO",
        "Prezzo",
        "sale_price",
        "prezzo_vendita",
        "vendita",
    ]),
    photo: FieldAlias::new([
        "FOTO",
        "Foto",
        "ASSET",
        "ASSET_S",
        "asset_s",
        "photo_url",
        "image_url",
        "url_foto",
        "foto_url",
    ]),
    stock: FieldAlias::new([
        "DISPONIBILITA",
        "DISPONIBILITA'",
        "Disponibilita",
        "Stock",
        "QTA",
        "qty",
    ]),
});

/// Alias list for every logical column of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFields {
    pub sku: FieldAlias,
    pub description: FieldAlias,
    pub category: FieldAlias,
    pub cost: FieldAlias,
    pub price: FieldAlias,
    pub photo: FieldAlias,
    pub stock: FieldAlias,
}

impl Default for CatalogFields {
    fn default() -> Self {
        DEFAULT_FIELDS.clone()
    }
}

impl CatalogFields {
    /// Apply one match mode to every field.
    pub fn with_mode(self, mode: MatchMode) -> Self {
        Self {
            sku: self.sku.with_mode(mode),
            description: self.description.with_mode(mode),
            category: self.category.with_mode(mode),
            cost: self.cost.with_mode(mode),
            price: self.price.with_mode(mode),
            photo: self.photo.with_mode(mode),
            stock: self.stock.with_mode(mode),
        }
    }
}
