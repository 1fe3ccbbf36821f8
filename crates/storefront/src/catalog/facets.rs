//! Options for the collapsible filter panels, derived from the catalog.

use std::collections::BTreeSet;

use levelup_core::{Clp, Product};
use serde::Serialize;

/// Values the filter panels offer for a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Distinct brands, sorted.
    pub brands: Vec<String>,
    /// Distinct category slugs, sorted.
    pub categories: Vec<String>,
    /// Cheapest price, `None` for an empty list.
    pub min_price: Option<Clp>,
    /// Most expensive price, `None` for an empty list.
    pub max_price: Option<Clp>,
}

impl Facets {
    /// Collect facets from `products`. Blank brands and slugs are skipped.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let brands: BTreeSet<&str> = products
            .iter()
            .map(|p| p.marca.trim())
            .filter(|b| !b.is_empty())
            .collect();
        let categories: BTreeSet<&str> = products
            .iter()
            .map(|p| p.categoria_id.trim())
            .filter(|c| !c.is_empty())
            .collect();

        Self {
            brands: brands.into_iter().map(str::to_owned).collect(),
            categories: categories.into_iter().map(str::to_owned).collect(),
            min_price: products.iter().map(|p| p.precio_clp).min(),
            max_price: products.iter().map(|p| p.precio_clp).max(),
        }
    }
}
