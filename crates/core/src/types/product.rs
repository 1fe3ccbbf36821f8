//! Catalog fixture types.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Clp;

/// A product as it appears in `products.json`.
///
/// Field names follow the fixture format (Spanish, camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub nombre: String,
    /// Short product code, e.g. `"JM001"`. Searchable alongside the name.
    pub code: String,
    /// Category slug, e.g. `"consolas"`.
    pub categoria_id: String,
    /// Free-text category label. Tagging in the fixtures is inconsistent, so
    /// the category filter also matches against this field.
    pub categoria: String,
    pub marca: String,
    #[serde(rename = "precioCLP")]
    pub precio_clp: Clp,
    /// Average review score in `[0, 5]`.
    pub rating: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
}

impl Product {
    /// Returns `true` if at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A category as it appears in `categories.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub nombre: String,
}
