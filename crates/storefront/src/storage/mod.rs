//! Key/value persistence standing in for browser `localStorage`.
//!
//! Services never touch a global store; they receive a [`KeyValueStore`] and
//! go through the typed helpers below, which apply one parse policy to every
//! key: a stored value that fails to parse is logged and treated as absent.
//! Lists that are rewritten in place go through [`read_json_list`] instead, so
//! one bad record never takes its neighbours with it.
//!
//! # Keys
//!
//! ```text
//! userProfile          - JSON object (UserProfile)
//! userCoupons_<id>     - JSON array of Coupon
//! userPoints_<id>      - stringified integer
//! cart                 - JSON array of CartLineItem
//! cartCount            - stringified integer
//! ```

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for writing.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Synchronous string key/value store.
///
/// Implementations use interior mutability so a single store can be shared by
/// several services. Concurrent writers are not coordinated: last write wins.
pub trait KeyValueStore {
    /// Read the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Storage key names.
pub mod keys {
    use levelup_core::UserId;

    /// Key for the serialized user profile.
    pub const USER_PROFILE: &str = "userProfile";

    /// Key for the cart lines.
    pub const CART: &str = "cart";

    /// Key for the cart badge count.
    pub const CART_COUNT: &str = "cartCount";

    /// Key for a user's stored coupons.
    #[must_use]
    pub fn user_coupons(user: UserId) -> String {
        format!("userCoupons_{user}")
    }

    /// Key for a user's loyalty points balance.
    #[must_use]
    pub fn user_points(user: UserId) -> String {
        format!("userPoints_{user}")
    }
}

/// Read and parse a JSON value, treating malformed data as absent.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Read and parse a JSON value, falling back to `T::default()`.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_json_or_default<T, S>(store: &S, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    Ok(read_json(store, key)?.unwrap_or_default())
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the backend fails.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// A stored JSON array parsed record by record.
///
/// Records that fail to parse are kept verbatim and written back after the
/// parsed ones, so a read-modify-write never drops data it could not read.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonList<T> {
    pub items: Vec<T>,
    unparsed: Vec<Value>,
}

impl<T> JsonList<T> {
    /// Number of records that could not be parsed.
    #[must_use]
    pub fn unparsed_len(&self) -> usize {
        self.unparsed.len()
    }
}

impl<T> Default for JsonList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            unparsed: Vec::new(),
        }
    }
}

/// Read a JSON array under `key`, parsing each record on its own.
///
/// A missing key is an empty list. A value that is not a JSON array holds no
/// recoverable records and reads as empty.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_json_list<T, S>(store: &S, key: &str) -> Result<JsonList<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(records) = read_json::<Vec<Value>, S>(store, key)? else {
        return Ok(JsonList::default());
    };

    let mut list = JsonList {
        items: Vec::with_capacity(records.len()),
        unparsed: Vec::new(),
    };
    for record in records {
        match <T as serde::Deserialize>::deserialize(&record) {
            Ok(item) => list.items.push(item),
            Err(e) => {
                tracing::warn!(key, error = %e, "Keeping malformed stored record");
                list.unparsed.push(record);
            }
        }
    }
    Ok(list)
}

/// Write `list` back under `key`, parsed records first.
///
/// # Errors
///
/// Returns an error if serialization or the backend fails.
pub fn write_json_list<T, S>(store: &S, key: &str, list: &JsonList<T>) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let mut records = list
        .items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    records.extend(list.unparsed.iter().cloned());
    write_json(store, key, &records)
}

/// Read a stringified counter, treating missing or malformed values as zero.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_counter<S>(store: &S, key: &str) -> Result<u64, StorageError>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(0);
    };

    match raw.trim().parse::<u64>() {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(key, raw = %raw, error = %e, "Ignoring malformed stored counter");
            Ok(0)
        }
    }
}

/// Store a counter as a decimal string.
///
/// # Errors
///
/// Returns an error if the backend fails.
pub fn write_counter<S>(store: &S, key: &str, value: u64) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    store.set(key, &value.to_string())
}
