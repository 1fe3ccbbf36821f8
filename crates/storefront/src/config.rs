//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `LEVELUP_DATA_DIR` - Fixture directory (default: crates/storefront/assets/data)
//! - `LEVELUP_STORAGE_PATH` - File-backed key/value store (default: .levelup/storage.json)
//! - `LEVELUP_SHIPPING_FEE` - Flat shipping fee in CLP (default: 3990)
//! - `LEVELUP_FREE_SHIPPING_OVER` - Subtotal in CLP at which shipping is free
//! - `LEVELUP_DUOC_DISCOUNT_PERCENT` - DUOC discount, 0-100 (default: 20)
//! - `LEVELUP_COUPON_PRECEDENCE` - `stored` or `base` (default: stored)
//! - `LEVELUP_FIXTURE_TTL_SECS` - Fixture cache TTL in seconds (default: 300)
//! - `LEVELUP_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use levelup_core::Clp;
use thiserror::Error;

use crate::coupons::CouponPrecedence;
use crate::pricing::{DEFAULT_DUOC_PERCENT, PricingEngine, ShippingPolicy};

const DEFAULT_DATA_DIR: &str = "crates/storefront/assets/data";
const DEFAULT_STORAGE_PATH: &str = ".levelup/storage.json";
const DEFAULT_SHIPPING_FEE: &str = "3990";
const DEFAULT_FIXTURE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding `products.json`, `categories.json` and `coupons.json`
    pub data_dir: PathBuf,
    /// JSON file backing the key/value store
    pub storage_path: PathBuf,
    pub shipping: ShippingPolicy,
    /// DUOC discount in percent, 0-100
    pub duoc_percent: u8,
    pub coupon_precedence: CouponPrecedence,
    /// How long loaded fixtures stay cached
    pub fixture_ttl: Duration,
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "LEVELUP_DATA_DIR", DEFAULT_DATA_DIR));
        let storage_path = PathBuf::from(get_or_default(
            &lookup,
            "LEVELUP_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));

        let flat_fee = parse_or_default::<u64>(&lookup, "LEVELUP_SHIPPING_FEE", DEFAULT_SHIPPING_FEE)?;
        let free_over = parse_optional::<u64>(&lookup, "LEVELUP_FREE_SHIPPING_OVER")?;

        let duoc_percent = parse_or_default::<u8>(
            &lookup,
            "LEVELUP_DUOC_DISCOUNT_PERCENT",
            &DEFAULT_DUOC_PERCENT.to_string(),
        )?;
        if duoc_percent > 100 {
            return Err(ConfigError::InvalidEnvVar(
                "LEVELUP_DUOC_DISCOUNT_PERCENT".to_string(),
                format!("{duoc_percent} is above 100"),
            ));
        }

        let coupon_precedence = match get_optional(&lookup, "LEVELUP_COUPON_PRECEDENCE") {
            None => CouponPrecedence::default(),
            Some(raw) => parse_precedence(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "LEVELUP_COUPON_PRECEDENCE".to_string(),
                    format!("expected `stored` or `base`, got `{raw}`"),
                )
            })?,
        };

        let ttl_secs =
            parse_or_default::<u64>(&lookup, "LEVELUP_FIXTURE_TTL_SECS", DEFAULT_FIXTURE_TTL_SECS)?;
        let log_format = parse_or_default::<LogFormat>(&lookup, "LEVELUP_LOG_FORMAT", "pretty")?;

        Ok(Self {
            data_dir,
            storage_path,
            shipping: ShippingPolicy {
                flat_fee: Clp::new(flat_fee),
                free_over: free_over.map(Clp::new),
            },
            duoc_percent,
            coupon_precedence,
            fixture_ttl: Duration::from_secs(ttl_secs),
            log_format,
        })
    }

    /// A pricing engine configured from these settings.
    #[must_use]
    pub fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(self.duoc_percent, self.shipping)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            shipping: ShippingPolicy {
                flat_fee: Clp::new(3_990),
                free_over: None,
            },
            duoc_percent: DEFAULT_DUOC_PERCENT,
            coupon_precedence: CouponPrecedence::default(),
            fixture_ttl: Duration::from_secs(300),
            log_format: LogFormat::default(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an optional variable.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional(lookup, key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

fn parse_precedence(raw: &str) -> Option<CouponPrecedence> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "stored" | "stored_wins" => Some(CouponPrecedence::StoredWins),
        "base" | "base_wins" => Some(CouponPrecedence::BaseWins),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("crates/storefront/assets/data"));
        assert_eq!(config.storage_path, PathBuf::from(".levelup/storage.json"));
        assert_eq!(config.shipping.flat_fee, Clp::new(3_990));
        assert_eq!(config.shipping.free_over, None);
        assert_eq!(config.duoc_percent, 20);
        assert_eq!(config.coupon_precedence, CouponPrecedence::StoredWins);
        assert_eq!(config.fixture_ttl, Duration::from_secs(300));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LEVELUP_DATA_DIR", "/srv/data"),
            ("LEVELUP_SHIPPING_FEE", "0"),
            ("LEVELUP_FREE_SHIPPING_OVER", "50000"),
            ("LEVELUP_DUOC_DISCOUNT_PERCENT", "15"),
            ("LEVELUP_COUPON_PRECEDENCE", "base"),
            ("LEVELUP_FIXTURE_TTL_SECS", "5"),
            ("LEVELUP_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.shipping.flat_fee, Clp::ZERO);
        assert_eq!(config.shipping.free_over, Some(Clp::new(50_000)));
        assert_eq!(config.pricing_engine().duoc_percent(), 15);
        assert_eq!(config.coupon_precedence, CouponPrecedence::BaseWins);
        assert_eq!(config.fixture_ttl, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = load(&[("LEVELUP_SHIPPING_FEE", "  ")]).unwrap();
        assert_eq!(config.shipping.flat_fee, Clp::new(3_990));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("LEVELUP_SHIPPING_FEE", "gratis"),
            ("LEVELUP_FREE_SHIPPING_OVER", "-1"),
            ("LEVELUP_DUOC_DISCOUNT_PERCENT", "120"),
            ("LEVELUP_COUPON_PRECEDENCE", "newest"),
            ("LEVELUP_LOG_FORMAT", "xml"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            let ConfigError::InvalidEnvVar(name, _) = err;
            assert_eq!(name, key);
        }
    }
}
