//! Unified error handling.
//!
//! Provides a unified `AppError` type over every service error. Front ends
//! show `user_message()` and log the full error.

use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::coupons::{CouponError, INVALID_COUPON_MESSAGE};
use crate::fixtures::FixtureError;
use crate::loyalty::LoyaltyError;
use crate::profile::ProfileError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Key/value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fixture file could not be loaded.
    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Coupon error: {0}")]
    Coupon(#[from] CouponError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Loyalty error: {0}")]
    Loyalty(#[from] LoyaltyError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns `true` for errors caused by the user's input rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Fixture(_) | Self::Config(_) | Self::Internal(_) => false,
            Self::Cart(err) => !matches!(err, CartError::Storage(_)),
            Self::Coupon(err) => !matches!(err, CouponError::Storage(_)),
            Self::Profile(err) => !matches!(err, ProfileError::Storage(_)),
            Self::Loyalty(err) => !matches!(err, LoyaltyError::Storage(_)),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => true,
                CheckoutError::Coupon(err) => !matches!(err, CouponError::Storage(_)),
                CheckoutError::Storage(_) => false,
            },
            Self::NotFound(_) => true,
        }
    }

    /// Message safe to show the shopper, in Spanish.
    ///
    /// System errors collapse to a generic message; internals go to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        if !self.is_user_error() {
            return match self {
                Self::Config(_) => "Configuración inválida".to_string(),
                _ => "Ocurrió un error inesperado, intenta nuevamente".to_string(),
            };
        }

        match self {
            Self::Cart(err) => cart_message(err),
            Self::Coupon(_) | Self::Checkout(CheckoutError::Coupon(_)) => {
                INVALID_COUPON_MESSAGE.to_string()
            }
            Self::Profile(err) => profile_message(err),
            Self::Loyalty(LoyaltyError::InsufficientPoints { balance, required }) => {
                format!("Puntos insuficientes: tienes {balance}, necesitas {required}")
            }
            Self::Checkout(CheckoutError::EmptyCart) => "Tu carrito está vacío".to_string(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
            _ => self.to_string(),
        }
    }
}

fn cart_message(err: &CartError) -> String {
    match err {
        CartError::OutOfStock(_) => "Producto sin stock".to_string(),
        CartError::InvalidQuantity { stock, .. } => {
            format!("La cantidad debe estar entre 1 y {stock}")
        }
        CartError::NotInCart(_) => "El producto no está en el carrito".to_string(),
        CartError::Storage(_) => "Ocurrió un error inesperado, intenta nuevamente".to_string(),
    }
}

fn profile_message(err: &ProfileError) -> String {
    match err {
        ProfileError::EmptyName => "El nombre es obligatorio".to_string(),
        ProfileError::NameTooLong { max } => {
            format!("El nombre no puede superar {max} caracteres")
        }
        ProfileError::InvalidEmail(_) => "Correo electrónico inválido".to_string(),
        ProfileError::InvalidBirthDate(_) => {
            "Fecha de nacimiento inválida (usa AAAA-MM-DD)".to_string()
        }
        ProfileError::Underage { min, .. } => format!("Debes ser mayor de {min} años"),
        ProfileError::Storage(_) => "Ocurrió un error inesperado, intenta nuevamente".to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
