//! Filter, sort and page selection held by the catalog view.

use std::fmt;
use std::str::FromStr;

use levelup_core::Clp;
use serde::{Deserialize, Serialize};

/// Price sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortPrice {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "precio-asc")]
    Asc,
    #[serde(rename = "precio-desc")]
    Desc,
}

/// Rating sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortRating {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "rating-asc")]
    Asc,
    #[serde(rename = "rating-desc")]
    Desc,
}

/// Unrecognized sort keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option: {0}")]
pub struct UnknownSort(pub String);

impl SortPrice {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Asc => "precio-asc",
            Self::Desc => "precio-desc",
        }
    }
}

impl SortRating {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Asc => "rating-asc",
            Self::Desc => "rating-desc",
        }
    }
}

impl FromStr for SortPrice {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "precio-asc" | "asc" => Ok(Self::Asc),
            "precio-desc" | "desc" => Ok(Self::Desc),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

impl FromStr for SortRating {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "rating-asc" | "asc" => Ok(Self::Asc),
            "rating-desc" | "desc" => Ok(Self::Desc),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

impl fmt::Display for SortPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Clp>,
    pub max: Option<Clp>,
}

impl PriceRange {
    /// Returns `true` if `price` lies within the bounds.
    #[must_use]
    pub fn contains(&self, price: Clp) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    /// Returns `true` if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A single user change to the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Search(String),
    Category(Option<String>),
    Brand(Option<String>),
    Rating(Option<u8>),
    PriceRange(PriceRange),
    SortPrice(SortPrice),
    SortRating(SortRating),
}

/// The catalog view's filter/sort/page state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub search: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Lower edge of the half-open rating bucket `[rating, rating + 1)`.
    pub rating: Option<u8>,
    pub price_range: PriceRange,
    pub sort_price: SortPrice,
    pub sort_rating: SortRating,
    /// 1-based page number.
    pub page: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            brand: None,
            rating: None,
            price_range: PriceRange::default(),
            sort_price: SortPrice::None,
            sort_rating: SortRating::None,
            page: 1,
        }
    }
}

impl FilterConfig {
    /// Apply a filter or sort change. Any change returns to page 1.
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Search(search) => self.search = search,
            FilterChange::Category(category) => self.category = category,
            FilterChange::Brand(brand) => self.brand = brand,
            FilterChange::Rating(rating) => self.rating = rating,
            FilterChange::PriceRange(range) => self.price_range = range,
            FilterChange::SortPrice(sort) => self.sort_price = sort,
            FilterChange::SortRating(sort) => self.sort_rating = sort,
        }
        self.page = 1;
    }

    /// Builder-style [`apply`](Self::apply).
    #[must_use]
    pub fn with(mut self, change: FilterChange) -> Self {
        self.apply(change);
        self
    }

    /// Move to `page`. Clamping to the available pages happens in the pipeline.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Reset every filter, sort and the page ("clear filters").
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if any filter narrows the result set.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.brand.is_some()
            || self.rating.is_some()
            || !self.price_range.is_unbounded()
    }
}
