//! Catalog filter, sort and pagination pipeline.
//!
//! # Stages
//!
//! ```text
//! search -> category -> brand -> rating -> price -> sort -> paginate
//! ```
//!
//! Filters commute, so their order only matters for determinism. Sorting
//! carries each product's original index: a price sort breaks ties by that
//! index, and a rating sort is a stable re-sort applied afterwards, so when
//! both are set the rating order wins and price order survives within equal
//! ratings. With no sort the fixture order is preserved.

mod facets;
mod filter_config;
mod filters;
mod normalize;
mod pagination;

use levelup_core::Product;
use serde::Serialize;
use tracing::instrument;

pub use facets::Facets;
pub use filter_config::{FilterChange, FilterConfig, PriceRange, SortPrice, SortRating, UnknownSort};
pub use normalize::normalize;
pub use pagination::PAGE_SIZE;

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage<'a> {
    /// Products on this page, in display order.
    pub items: Vec<&'a Product>,
    /// The page actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Matches across all pages.
    pub total_count: usize,
}

impl CatalogPage<'_> {
    /// Returns `true` if no product matched the filters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns `true` if a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Run the full pipeline over `products`.
///
/// Zero matches is a normal result: an empty page 1 of 0.
#[instrument(skip_all, fields(products = products.len(), page = config.page))]
pub fn filter_and_sort<'a>(products: &'a [Product], config: &FilterConfig) -> CatalogPage<'a> {
    let mut matches = filter(products, config);
    sort(&mut matches, config.sort_price, config.sort_rating);

    let total_count = matches.len();
    let total_pages = pagination::total_pages(total_count);
    let page = pagination::clamp_page(config.page, total_pages);
    let items = pagination::page_slice(matches, page)
        .into_iter()
        .map(|(_, product)| product)
        .collect();

    tracing::debug!(total_count, total_pages, page, "Catalog query evaluated");

    CatalogPage {
        items,
        page,
        total_pages,
        total_count,
    }
}

/// Filter stages, keeping each match's original index.
fn filter<'a>(products: &'a [Product], config: &FilterConfig) -> Vec<(usize, &'a Product)> {
    let query = normalize(config.search.trim());
    let category = config.category.as_deref();
    let brand = config.brand.as_deref();

    products
        .iter()
        .enumerate()
        .filter(|(_, p)| filters::matches_search(p, &query))
        .filter(|(_, p)| filters::matches_category(p, category))
        .filter(|(_, p)| filters::matches_brand(p, brand))
        .filter(|(_, p)| filters::matches_rating(p, config.rating))
        .filter(|(_, p)| filters::matches_price(p, &config.price_range))
        .collect()
}

/// Price sort first (index tiebreak), then a stable rating re-sort.
fn sort(matches: &mut [(usize, &Product)], by_price: SortPrice, by_rating: SortRating) {
    match by_price {
        SortPrice::None => {}
        SortPrice::Asc => matches.sort_by(|(ia, a), (ib, b)| {
            a.precio_clp.cmp(&b.precio_clp).then(ia.cmp(ib))
        }),
        SortPrice::Desc => matches.sort_by(|(ia, a), (ib, b)| {
            b.precio_clp.cmp(&a.precio_clp).then(ia.cmp(ib))
        }),
    }

    match by_rating {
        SortRating::None => {}
        SortRating::Asc => matches.sort_by(|(_, a), (_, b)| a.rating.total_cmp(&b.rating)),
        SortRating::Desc => matches.sort_by(|(_, a), (_, b)| b.rating.total_cmp(&a.rating)),
    }
}

#[cfg(test)]
mod tests {
    use levelup_core::{Clp, ProductId};

    use super::*;

    fn product(id: i32, nombre: &str, marca: &str, precio: u64, rating: f64) -> Product {
        Product {
            id: ProductId::new(id),
            nombre: nombre.to_string(),
            code: format!("P{id:03}"),
            categoria_id: "accesorios".to_string(),
            categoria: "Accesorios".to_string(),
            marca: marca.to_string(),
            precio_clp: Clp::new(precio),
            rating,
            stock: 5,
            descripcion: None,
            imagen: None,
        }
    }

    fn ids(page: &CatalogPage<'_>) -> Vec<i32> {
        page.items.iter().map(|p| p.id.as_i32()).collect()
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Mouse Gámer", "Logitech", 49_990, 4.5),
            product(2, "Teclado Mecánico", "Razer", 89_990, 4.5),
            product(3, "Audífonos HyperX", "HyperX", 59_990, 3.2),
            product(4, "Silla Gamer", "Secretlab", 349_990, 4.9),
            product(5, "Mousepad XL", "Razer", 19_990, 4.0),
        ]
    }

    #[test]
    fn test_default_config_preserves_order() {
        let products = sample();
        let page = filter_and_sort(&products, &FilterConfig::default());
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_search_is_accent_and_case_insensitive() {
        let products = sample();
        let config = FilterConfig::default().with(FilterChange::Search("GAMER".to_string()));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![1, 4]);

        let config = FilterConfig::default().with(FilterChange::Search("audifonos".to_string()));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![3]);
    }

    #[test]
    fn test_zero_matches_is_empty_result() {
        let products = sample();
        let config = FilterConfig::default().with(FilterChange::Search("zelda".to_string()));
        let page = filter_and_sort(&products, &config);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_price_sort_breaks_ties_by_index() {
        let mut products = sample();
        products.push(product(6, "Mouse Inalámbrico", "Logitech", 49_990, 4.1));
        let config = FilterConfig::default().with(FilterChange::SortPrice(SortPrice::Asc));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![5, 1, 6, 3, 2, 4]);

        let config = FilterConfig::default().with(FilterChange::SortPrice(SortPrice::Desc));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![4, 2, 3, 1, 6, 5]);
    }

    #[test]
    fn test_rating_sort_wins_and_keeps_price_order_within_ties() {
        let products = sample();
        let config = FilterConfig::default()
            .with(FilterChange::SortPrice(SortPrice::Desc))
            .with(FilterChange::SortRating(SortRating::Desc));
        // 1 and 2 share 4.5; price desc put 2 before 1.
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![4, 2, 1, 5, 3]);
    }

    #[test]
    fn test_rating_sort_alone_ties_by_index() {
        let products = sample();
        let config = FilterConfig::default().with(FilterChange::SortRating(SortRating::Asc));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![3, 5, 1, 2, 4]);
    }

    #[test]
    fn test_combined_filters() {
        let products = sample();
        let config = FilterConfig::default()
            .with(FilterChange::Brand(Some("Razer".to_string())))
            .with(FilterChange::Rating(Some(4)))
            .with(FilterChange::PriceRange(PriceRange {
                min: Some(Clp::new(20_000)),
                max: None,
            }));
        assert_eq!(ids(&filter_and_sort(&products, &config)), vec![2]);
    }

    #[test]
    fn test_pagination_clamps_requested_page() {
        let products: Vec<Product> = (1..=30)
            .map(|i| product(i, "Juego", "Devir", 10_000, 4.0))
            .collect();

        let mut config = FilterConfig::default();
        config.set_page(99);
        let page = filter_and_sort(&products, &config);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(ids(&page), (25..=30).collect::<Vec<_>>());
        assert!(page.has_previous());
        assert!(!page.has_next());

        config.set_page(2);
        let page = filter_and_sort(&products, &config);
        assert_eq!(page.items.len(), PAGE_SIZE);
        assert_eq!(page.items.first().map(|p| p.id.as_i32()), Some(13));
    }
}
