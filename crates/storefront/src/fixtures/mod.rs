//! JSON fixture loading.
//!
//! Products, categories and the base coupon list are read from the data
//! directory with `tokio::fs` and cached with `moka` (TTL from config). The
//! `try_*` loaders surface [`FixtureError`]; the plain loaders log the error
//! and fall back to an empty list, which is not cached.

mod cache;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use levelup_core::{Category, Coupon, Product};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use cache::{FixtureKey, FixtureValue};

/// Errors from reading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// FixtureSource
// =============================================================================

/// Loads and caches the storefront's fixture files.
#[derive(Clone)]
pub struct FixtureSource {
    inner: Arc<FixtureSourceInner>,
}

struct FixtureSourceInner {
    data_dir: PathBuf,
    cache: Cache<FixtureKey, FixtureValue>,
}

impl std::fmt::Debug for FixtureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureSource")
            .field("data_dir", &self.inner.data_dir)
            .finish_non_exhaustive()
    }
}

impl FixtureSource {
    /// Create a source reading from `data_dir`, caching each file for `ttl`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Self {
            inner: Arc::new(FixtureSourceInner {
                data_dir: data_dir.into(),
                cache,
            }),
        }
    }

    /// Directory the fixtures are read from.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    // =========================================================================
    // Strict loaders
    // =========================================================================

    /// Load `products.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(self))]
    pub async fn try_products(&self) -> Result<Arc<Vec<Product>>, FixtureError> {
        if let Some(FixtureValue::Products(products)) =
            self.inner.cache.get(&FixtureKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(self.read::<Product>(FixtureKey::Products).await?);
        self.inner
            .cache
            .insert(FixtureKey::Products, FixtureValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Load `categories.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(self))]
    pub async fn try_categories(&self) -> Result<Arc<Vec<Category>>, FixtureError> {
        if let Some(FixtureValue::Categories(categories)) =
            self.inner.cache.get(&FixtureKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(self.read::<Category>(FixtureKey::Categories).await?);
        self.inner
            .cache
            .insert(
                FixtureKey::Categories,
                FixtureValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    /// Load the base coupon list, `coupons.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(self))]
    pub async fn try_coupons(&self) -> Result<Arc<Vec<Coupon>>, FixtureError> {
        if let Some(FixtureValue::Coupons(coupons)) =
            self.inner.cache.get(&FixtureKey::Coupons).await
        {
            debug!("Cache hit for coupons");
            return Ok(coupons);
        }

        let coupons = Arc::new(self.read::<Coupon>(FixtureKey::Coupons).await?);
        self.inner
            .cache
            .insert(FixtureKey::Coupons, FixtureValue::Coupons(Arc::clone(&coupons)))
            .await;
        Ok(coupons)
    }

    // =========================================================================
    // Lenient loaders
    // =========================================================================

    /// Products, or an empty list if the fixture cannot be loaded.
    pub async fn products(&self) -> Arc<Vec<Product>> {
        self.try_products().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load products, using empty catalog");
            Arc::default()
        })
    }

    /// Categories, or an empty list if the fixture cannot be loaded.
    pub async fn categories(&self) -> Arc<Vec<Category>> {
        self.try_categories().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load categories, using empty list");
            Arc::default()
        })
    }

    /// Base coupons, or an empty list if the fixture cannot be loaded.
    pub async fn coupons(&self) -> Arc<Vec<Coupon>> {
        self.try_coupons().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load base coupons, using empty list");
            Arc::default()
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached fixture so the next load rereads the files.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    async fn read<T: DeserializeOwned>(&self, key: FixtureKey) -> Result<Vec<T>, FixtureError> {
        let path = self.inner.data_dir.join(key.file_name());
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.clone(),
                source,
            })?;
        let items: Vec<T> =
            serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), count = items.len(), "Fixture loaded");
        Ok(items)
    }
}
