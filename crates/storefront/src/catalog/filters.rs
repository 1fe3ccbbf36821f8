//! Pure predicates for each catalog filter stage.
//!
//! Text arguments are expected to be normalized already (see
//! [`normalize`](super::normalize::normalize)); the pipeline normalizes the
//! query once rather than per product.

use levelup_core::Product;

use super::filter_config::PriceRange;
use super::normalize::normalize;

/// Search stage: name or code contains the normalized query.
pub fn matches_search(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    normalize(&product.nombre).contains(query) || normalize(&product.code).contains(query)
}

/// Category stage: exact slug match, or the free-text label contains the slug.
pub fn matches_category(product: &Product, category: Option<&str>) -> bool {
    match category {
        Some(selected) => {
            product.categoria_id == selected
                || normalize(&product.categoria).contains(&normalize(selected))
        }
        None => true,
    }
}

/// Brand stage: exact match on `marca`.
pub fn matches_brand(product: &Product, brand: Option<&str>) -> bool {
    brand.is_none_or(|brand| product.marca == brand)
}

/// Rating stage: rating falls in `[selected, selected + 1)`.
pub fn matches_rating(product: &Product, rating: Option<u8>) -> bool {
    rating.is_none_or(|selected| {
        let lower = f64::from(selected);
        product.rating >= lower && product.rating < lower + 1.0
    })
}

/// Price stage: `precioCLP` within the inclusive range.
pub fn matches_price(product: &Product, range: &PriceRange) -> bool {
    range.contains(product.precio_clp)
}
