//! Property tests for the catalog filter pipeline.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use levelup_core::{Clp, Product};
use levelup_integration_tests::product;
use levelup_storefront::catalog::{
    FilterChange, FilterConfig, PAGE_SIZE, PriceRange, SortPrice, SortRating, filter_and_sort,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn catalog() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(
        (
            "[a-z]{3,10}",
            prop::sample::select(vec!["Logitech", "Razer", "Sony", "HyperX"]),
            1_000u64..600_000u64,
            0u8..=50u8,
        ),
        0..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .zip(1..)
            .map(|((nombre, marca, precio, tenths), id)| {
                product(id, &nombre, marca, precio, f64::from(tenths) / 10.0)
            })
            .collect()
    })
}

fn filter_change() -> impl Strategy<Value = FilterChange> {
    prop_oneof![
        "[a-z]{0,4}".prop_map(FilterChange::Search),
        prop::option::of("[a-z]{3,8}").prop_map(FilterChange::Category),
        prop::option::of("[A-Za-z]{3,8}").prop_map(FilterChange::Brand),
        prop::option::of(0u8..=5u8).prop_map(FilterChange::Rating),
        (prop::option::of(0u64..100_000), prop::option::of(0u64..600_000)).prop_map(
            |(min, max)| FilterChange::PriceRange(PriceRange {
                min: min.map(Clp::new),
                max: max.map(Clp::new),
            })
        ),
        prop::sample::select(vec![SortPrice::None, SortPrice::Asc, SortPrice::Desc])
            .prop_map(FilterChange::SortPrice),
        prop::sample::select(vec![SortRating::None, SortRating::Asc, SortRating::Desc])
            .prop_map(FilterChange::SortRating),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn default_config_keeps_fixture_order(products in catalog(), page in 1usize..8) {
        let mut config = FilterConfig::default();
        config.set_page(page);
        let result = filter_and_sort(&products, &config);

        prop_assert_eq!(result.total_count, products.len());
        prop_assert_eq!(result.total_pages, products.len().div_ceil(PAGE_SIZE));
        prop_assert!(result.page >= 1);
        prop_assert!(result.page <= result.total_pages.max(1));
        prop_assert!(result.items.len() <= PAGE_SIZE);

        let start = (result.page - 1) * PAGE_SIZE;
        for (offset, item) in result.items.iter().enumerate() {
            prop_assert_eq!(item.id, products[start + offset].id);
        }
    }

    #[test]
    fn rating_bucket_is_half_open(products in catalog(), bucket in 0u8..=5u8) {
        let config = FilterConfig::default().with(FilterChange::Rating(Some(bucket)));
        let result = filter_and_sort(&products, &config);
        let lower = f64::from(bucket);

        let expected = products
            .iter()
            .filter(|p| p.rating >= lower && p.rating < lower + 1.0)
            .count();
        prop_assert_eq!(result.total_count, expected);
        for item in &result.items {
            prop_assert!(item.rating >= lower && item.rating < lower + 1.0);
        }
    }

    #[test]
    fn price_range_is_inclusive(
        products in catalog(),
        min in prop::option::of(1_000u64..300_000),
        max in prop::option::of(1_000u64..600_000),
    ) {
        let range = PriceRange { min: min.map(Clp::new), max: max.map(Clp::new) };
        let config = FilterConfig::default().with(FilterChange::PriceRange(range));
        let result = filter_and_sort(&products, &config);

        let expected = products.iter().filter(|p| range.contains(p.precio_clp)).count();
        prop_assert_eq!(result.total_count, expected);
        for item in &result.items {
            prop_assert!(min.is_none_or(|min| item.precio_clp.pesos() >= min));
            prop_assert!(max.is_none_or(|max| item.precio_clp.pesos() <= max));
        }
    }

    #[test]
    fn any_change_returns_to_first_page(page in 2usize..50, change in filter_change()) {
        let mut config = FilterConfig::default();
        config.set_page(page);
        prop_assert_eq!(config.page, page);

        config.apply(change);
        prop_assert_eq!(config.page, 1);
    }

    #[test]
    fn requested_page_is_clamped(products in catalog(), page in 0usize..100) {
        let mut config = FilterConfig::default();
        config.set_page(page);
        let result = filter_and_sort(&products, &config);
        let pages = products.len().div_ceil(PAGE_SIZE);

        prop_assert_eq!(result.page, page.clamp(1, pages.max(1)));
        prop_assert_eq!(result.has_next(), result.page < pages);
    }

    #[test]
    fn price_sort_orders_the_whole_result(products in catalog(), descending in any::<bool>()) {
        let sort = if descending { SortPrice::Desc } else { SortPrice::Asc };
        let config = FilterConfig::default().with(FilterChange::SortPrice(sort));

        let mut seen = Vec::new();
        let pages = products.len().div_ceil(PAGE_SIZE).max(1);
        for page in 1..=pages {
            let mut paged = config.clone();
            paged.set_page(page);
            seen.extend(filter_and_sort(&products, &paged).items.iter().map(|p| p.precio_clp));
        }

        prop_assert_eq!(seen.len(), products.len());
        for pair in seen.windows(2) {
            if descending {
                prop_assert!(pair[0] >= pair[1]);
            } else {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }
}

// =============================================================================
// Search normalization
// =============================================================================

#[test]
fn search_ignores_case_and_accents() {
    let products = vec![
        product(1, "Mouse Gámer Logitech G502 HERO", "Logitech", 49_990, 4.7),
        product(2, "Audífonos HyperX Cloud II", "HyperX", 79_990, 4.5),
        product(3, "Catan", "Devir", 29_990, 4.8),
    ];

    for query in ["GAMER", "gámer", "  Gamer "] {
        let config = FilterConfig::default().with(FilterChange::Search(query.to_string()));
        let result = filter_and_sort(&products, &config);
        assert_eq!(result.total_count, 1, "query {query:?}");
        assert_eq!(result.items[0].nombre, "Mouse Gámer Logitech G502 HERO");
    }

    let config = FilterConfig::default().with(FilterChange::Search("audifonos".to_string()));
    assert_eq!(filter_and_sort(&products, &config).total_count, 1);
}

#[test]
fn search_matches_product_code() {
    let products = vec![product(7, "Catan", "Devir", 29_990, 4.8)];
    let config = FilterConfig::default().with(FilterChange::Search("p007".to_string()));
    assert_eq!(filter_and_sort(&products, &config).total_count, 1);
}

#[test]
fn no_matches_is_an_empty_first_page() {
    let products = vec![product(1, "Catan", "Devir", 29_990, 4.8)];
    let config = FilterConfig::default().with(FilterChange::Search("zelda".to_string()));
    let result = filter_and_sort(&products, &config);
    assert!(result.is_empty());
    assert_eq!(result.page, 1);
    assert_eq!(result.total_pages, 0);
}
