//! Level-Up Core - Shared domain types.
//!
//! This crate provides the types used across all Level-Up components:
//! - `storefront` - Catalog pipeline, pricing engine, cart, coupons and profiles
//! - `cli` - Command-line front end over the storefront services
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no storage
//! access, no fixture loading. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, CLP amounts, emails, products, coupons, cart lines and profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
