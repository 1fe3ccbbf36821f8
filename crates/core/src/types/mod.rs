//! Core types for the Level-Up storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod coupon;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod profile;

pub use cart::{CartLineItem, PricingBreakdown};
pub use coupon::{Coupon, CouponValue};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Clp;
pub use product::{Category, Product};
pub use profile::{UserProfile, age_on};
