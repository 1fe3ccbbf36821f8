//! Integration tests for the Level-Up storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p levelup-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_properties` - Property tests for the filter pipeline
//! - `pricing_properties` - Property tests for totals and coupons
//! - `storefront_flow` - End-to-end flows over the bundled fixtures

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use levelup_core::{Clp, Product, ProductId};
use levelup_storefront::config::StorefrontConfig;
use levelup_storefront::state::AppState;
use levelup_storefront::storage::JsonFileStore;

/// Directory of the fixtures shipped with the storefront crate.
#[must_use]
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/assets/data")
}

/// A product with the fields the pipeline looks at.
#[must_use]
pub fn product(id: i32, nombre: &str, marca: &str, precio: u64, rating: f64) -> Product {
    Product {
        id: ProductId::new(id),
        nombre: nombre.to_string(),
        code: format!("P{id:03}"),
        categoria_id: "accesorios".to_string(),
        categoria: "Accesorios".to_string(),
        marca: marca.to_string(),
        precio_clp: Clp::new(precio),
        rating,
        stock: 10,
        descripcion: None,
        imagen: None,
    }
}

/// A state over the bundled fixtures and a file store in `dir`.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened.
pub fn file_backed_state(
    dir: &std::path::Path,
) -> Result<AppState, levelup_storefront::storage::StorageError> {
    let config = StorefrontConfig {
        data_dir: bundled_data_dir(),
        storage_path: dir.join("storage.json"),
        ..StorefrontConfig::default()
    };
    let store = JsonFileStore::open(&config.storage_path)?;
    Ok(AppState::new(config, Arc::new(store)))
}
