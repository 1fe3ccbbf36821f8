//! Level-Up Storefront library.
//!
//! Catalog filtering, cart pricing, coupons, loyalty points and profiles for
//! the Level-Up gaming store, over JSON fixtures and an injected key/value
//! store.
//!
//! # Modules
//!
//! - [`catalog`] - Search, filter, sort and paginate the product list
//! - [`pricing`] - Subtotal, discounts, shipping and total
//! - [`coupons`] - Coupon availability, redemption and the coupon field
//! - [`cart`], [`profile`], [`loyalty`], [`checkout`] - Stored shopper state
//! - [`fixtures`] - Cached loading of the JSON fixtures
//! - [`storage`] - The `localStorage`-style key/value store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod coupons;
pub mod error;
pub mod fixtures;
pub mod loyalty;
pub mod pricing;
pub mod profile;
pub mod state;
pub mod storage;
