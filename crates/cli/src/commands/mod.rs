//! Command implementations.
//!
//! Each command writes its human-readable output to the given writer;
//! diagnostics go through `tracing` to stderr.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod points;
pub mod profile;

use std::io::Write;

use levelup_core::{ProductId, UserProfile};
use levelup_storefront::cart::CartError;
use levelup_storefront::checkout::CheckoutError;
use levelup_storefront::config::ConfigError;
use levelup_storefront::coupons::CouponError;
use levelup_storefront::error::AppError;
use levelup_storefront::loyalty::LoyaltyError;
use levelup_storefront::profile::ProfileError;
use levelup_storefront::state::AppState;
use levelup_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A command-line argument could not be parsed.
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(&'static str, String),
}

macro_rules! from_app_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for CommandError {
                fn from(err: $err) -> Self {
                    Self::App(AppError::from(err))
                }
            }
        )*
    };
}

from_app_error!(
    StorageError,
    CartError,
    CouponError,
    ProfileError,
    LoyaltyError,
    CheckoutError,
    ConfigError,
);

impl CommandError {
    /// Message for the shopper, in Spanish.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            Self::Io(_) => "No se pudo escribir la salida".to_string(),
            Self::InvalidArgument(name, _) => format!("Valor inválido para {name}"),
        }
    }
}

/// Show the user-facing message on stderr.
pub fn report(err: &CommandError) {
    let _ = writeln!(std::io::stderr(), "Error: {}", err.user_message());
}

/// Parse a product ID argument.
pub fn parse_product_id(raw: &str) -> Result<ProductId, CommandError> {
    raw.parse()
        .map_err(|e: std::num::ParseIntError| CommandError::InvalidArgument("id", e.to_string()))
}

/// The stored profile, required by per-user commands.
pub fn require_profile(state: &AppState) -> Result<UserProfile, CommandError> {
    state
        .profiles()
        .load()?
        .ok_or_else(|| AppError::NotFound("perfil (usa `levelup profile set`)".to_string()).into())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;
    use std::sync::Arc;

    use levelup_storefront::config::StorefrontConfig;
    use levelup_storefront::state::AppState;
    use levelup_storefront::storage::MemoryStore;

    /// Directory of the fixtures bundled with the storefront crate.
    pub fn data_dir() -> PathBuf {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/assets/data").into()
    }

    /// State over an in-memory store and the bundled fixtures.
    pub fn state() -> AppState {
        let config = StorefrontConfig {
            data_dir: data_dir(),
            ..StorefrontConfig::default()
        };
        AppState::new(config, Arc::new(MemoryStore::new()))
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap_or_default()
    }
}
