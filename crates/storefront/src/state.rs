//! Application state shared across front-end commands.

use std::sync::Arc;

use crate::cart::CartService;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::coupons::CouponBook;
use crate::fixtures::FixtureSource;
use crate::loyalty::LoyaltyLedger;
use crate::pricing::PricingEngine;
use crate::profile::ProfileStore;
use crate::storage::{JsonFileStore, KeyValueStore, StorageError};

/// The key/value store as shared by every service.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and hands out services bound to
/// one shared store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: SharedStore,
    fixtures: FixtureSource,
    engine: PricingEngine,
}

impl AppState {
    /// Create application state over an existing store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: SharedStore) -> Self {
        let fixtures = FixtureSource::new(config.data_dir.clone(), config.fixture_ttl);
        let engine = config.pricing_engine();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                fixtures,
                engine,
            }),
        }
    }

    /// Create application state backed by the JSON file at `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be opened.
    pub fn open(config: StorefrontConfig) -> Result<Self, StorageError> {
        let store = JsonFileStore::open(&config.storage_path)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared store.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    /// Get a reference to the fixture loader.
    #[must_use]
    pub fn fixtures(&self) -> &FixtureSource {
        &self.inner.fixtures
    }

    /// Get the configured pricing engine.
    #[must_use]
    pub fn engine(&self) -> PricingEngine {
        self.inner.engine
    }

    #[must_use]
    pub fn cart(&self) -> CartService<SharedStore> {
        CartService::new(Arc::clone(&self.inner.store))
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileStore<SharedStore> {
        ProfileStore::new(Arc::clone(&self.inner.store))
    }

    #[must_use]
    pub fn loyalty(&self) -> LoyaltyLedger<SharedStore> {
        LoyaltyLedger::new(Arc::clone(&self.inner.store))
    }

    /// Coupon book with the base coupons from the fixtures.
    pub async fn coupons(&self) -> CouponBook<SharedStore> {
        let base = self.inner.fixtures.coupons().await;
        CouponBook::new(
            Arc::clone(&self.inner.store),
            base.as_ref().clone(),
            self.inner.config.coupon_precedence,
        )
    }

    /// Checkout with the base coupons from the fixtures.
    pub async fn checkout(&self) -> Checkout<SharedStore> {
        let base = self.inner.fixtures.coupons().await;
        Checkout::new(
            Arc::clone(&self.inner.store),
            self.inner.engine,
            base.as_ref().clone(),
            self.inner.config.coupon_precedence,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use levelup_core::UserId;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_services_share_one_store() {
        let state = AppState::new(StorefrontConfig::default(), Arc::new(MemoryStore::new()));
        state.loyalty().credit(UserId::new(1), 10).unwrap();
        assert_eq!(
            state.store().get("userPoints_1").unwrap().as_deref(),
            Some("10")
        );
        assert_eq!(state.clone().loyalty().balance(UserId::new(1)).unwrap(), 10);
    }

    #[test]
    fn test_open_creates_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            storage_path: dir.path().join("nested/storage.json"),
            ..StorefrontConfig::default()
        };
        let state = AppState::open(config).unwrap();
        state.cart().clear().unwrap();
        assert!(dir.path().join("nested/storage.json").exists());
    }
}
