//! Cache types for loaded fixture files.

use std::sync::Arc;

use levelup_core::{Category, Coupon, Product};

/// Cache key: one entry per fixture file.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FixtureKey {
    Products,
    Categories,
    Coupons,
}

impl FixtureKey {
    /// File name inside the data directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Products => "products.json",
            Self::Categories => "categories.json",
            Self::Coupons => "coupons.json",
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum FixtureValue {
    Products(Arc<Vec<Product>>),
    Categories(Arc<Vec<Category>>),
    Coupons(Arc<Vec<Coupon>>),
}
