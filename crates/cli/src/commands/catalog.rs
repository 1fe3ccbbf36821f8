//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! levelup catalog --search "mouse gamer" --brand Logitech
//! levelup catalog --category consolas --sort-price precio-desc --page 2
//! levelup catalog --min-price '$20.000' --max-price 60000 --rating 4
//! levelup categories
//! ```

use std::io::Write;

use clap::Args;
use levelup_core::Clp;
use levelup_storefront::catalog::{
    Facets, FilterChange, FilterConfig, PriceRange, SortPrice, SortRating, filter_and_sort,
};
use levelup_storefront::state::AppState;

use super::CommandError;

/// Filters, sorting and page selection for `levelup catalog`.
#[derive(Debug, Default, Args)]
pub struct CatalogArgs {
    /// Text to search in names and codes (accents and case ignored)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Category ID
    #[arg(short, long)]
    pub category: Option<String>,

    /// Exact brand
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Rating bucket: N keeps ratings in [N, N+1)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub rating: Option<u8>,

    /// Minimum price in CLP, e.g. 20000 or $20.000
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price in CLP
    #[arg(long)]
    pub max_price: Option<String>,

    /// none, precio-asc or precio-desc
    #[arg(long, default_value = "none")]
    pub sort_price: SortPrice,

    /// none, rating-asc or rating-desc
    #[arg(long, default_value = "none")]
    pub sort_rating: SortRating,

    /// Page number (clamped to the available pages)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Also list the filter options for the catalog
    #[arg(long)]
    pub facets: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

impl CatalogArgs {
    /// Build the filter state these arguments describe.
    ///
    /// # Errors
    ///
    /// Returns an error if a price bound is not a valid amount.
    pub fn filter_config(&self) -> Result<FilterConfig, CommandError> {
        let range = PriceRange {
            min: parse_price("--min-price", self.min_price.as_deref())?,
            max: parse_price("--max-price", self.max_price.as_deref())?,
        };

        let mut config = FilterConfig::default()
            .with(FilterChange::Search(self.search.clone()))
            .with(FilterChange::Category(non_blank(self.category.as_deref())))
            .with(FilterChange::Brand(non_blank(self.brand.as_deref())))
            .with(FilterChange::Rating(self.rating))
            .with(FilterChange::PriceRange(range))
            .with(FilterChange::SortPrice(self.sort_price))
            .with(FilterChange::SortRating(self.sort_rating));
        config.set_page(self.page);
        Ok(config)
    }
}

/// Parse a price bound typed the way prices are shown (`$29.990`) or plain.
///
/// A blank bound is no bound.
fn parse_price(name: &'static str, raw: Option<&str>) -> Result<Option<Clp>, CommandError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let digits: String = raw
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();

    digits
        .parse::<u64>()
        .map(|pesos| Some(Clp::new(pesos)))
        .map_err(|e| CommandError::InvalidArgument(name, format!("{raw}: {e}")))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Print one page of the catalog.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or output fails.
pub async fn list(
    state: &AppState,
    args: &CatalogArgs,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let config = args.filter_config()?;
    let products = state.fixtures().products().await;
    let page = filter_and_sort(&products, &config);

    tracing::debug!(
        filters = config.has_active_filters(),
        total = page.total_count,
        "Catalog listed"
    );

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &page).map_err(std::io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    if page.is_empty() {
        writeln!(out, "No se encontraron productos")?;
    } else {
        for product in &page.items {
            let stock = if product.in_stock() {
                format!("{} en stock", product.stock)
            } else {
                "agotado".to_string()
            };
            writeln!(
                out,
                "{:>4}  {:<6} {:<45} {:<10} {:>11}  ★{:.1}  {}",
                product.id.as_i32(),
                product.code,
                product.nombre,
                product.marca,
                product.precio_clp.display(),
                product.rating,
                stock
            )?;
        }
        writeln!(
            out,
            "Página {} de {} ({} productos)",
            page.page, page.total_pages, page.total_count
        )?;
    }

    if args.facets {
        write_facets(&Facets::from_products(&products), out)?;
    }
    Ok(())
}

fn write_facets(facets: &Facets, out: &mut impl Write) -> Result<(), CommandError> {
    writeln!(out, "Marcas: {}", facets.brands.join(", "))?;
    writeln!(out, "Categorías: {}", facets.categories.join(", "))?;
    if let (Some(min), Some(max)) = (facets.min_price, facets.max_price) {
        writeln!(out, "Precios: {min} - {max}")?;
    }
    Ok(())
}

/// Print the product categories.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn categories(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let categories = state.fixtures().categories().await;
    for category in categories.iter() {
        writeln!(out, "{:<22} {}", category.id, category.nombre)?;
    }
    Ok(())
}
