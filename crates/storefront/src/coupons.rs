//! Coupon availability, redemption and the cart's coupon input field.
//!
//! A user's coupons come from two places: the base list shipped with the
//! storefront and the coupons stored under `userCoupons_<id>` (loyalty
//! rewards, redeemed copies). The two lists are merged by id; which copy wins
//! a collision is a [`CouponPrecedence`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use levelup_core::{Coupon, CouponId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::storage::{self, JsonList, KeyValueStore, StorageError, keys};

/// Inline message shown when a coupon code is rejected.
pub const INVALID_COUPON_MESSAGE: &str = "Cupón inválido o expirado";

/// Errors from coupon operations.
#[derive(Debug, Error)]
pub enum CouponError {
    #[error("coupon not found: {0}")]
    NotFound(String),

    #[error("coupon already used: {0}")]
    AlreadyUsed(String),

    #[error("coupon expired: {0}")]
    Expired(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Which copy of a coupon wins when the stored and base lists share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponPrecedence {
    /// The stored copy wins, so a redemption recorded in storage sticks.
    #[default]
    StoredWins,
    /// The base copy wins. Reproduces the legacy merge, where a redeemed base
    /// coupon shows up as unused again.
    BaseWins,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Source {
    Stored,
    Base,
}

/// Merge stored and base coupons by id.
///
/// Output order is first appearance (stored first, then base). Within one
/// list a later duplicate replaces an earlier one; across lists `precedence`
/// decides.
#[must_use]
pub fn merge_coupons(
    stored: Vec<Coupon>,
    base: Vec<Coupon>,
    precedence: CouponPrecedence,
) -> Vec<Coupon> {
    let mut merged: Vec<(Source, Coupon)> = Vec::with_capacity(stored.len() + base.len());
    let mut positions: HashMap<CouponId, usize> = HashMap::new();

    let incoming = stored
        .into_iter()
        .map(|c| (Source::Stored, c))
        .chain(base.into_iter().map(|c| (Source::Base, c)));

    for (source, coupon) in incoming {
        if let Some(&i) = positions.get(&coupon.id) {
            if let Some(slot) = merged.get_mut(i)
                && (slot.0 == source || precedence == CouponPrecedence::BaseWins)
            {
                *slot = (source, coupon);
            }
        } else {
            positions.insert(coupon.id.clone(), merged.len());
            merged.push((source, coupon));
        }
    }

    merged.into_iter().map(|(_, coupon)| coupon).collect()
}

/// Merge, then keep only unused coupons whose expiry is strictly after `now`.
#[must_use]
pub fn available_coupons(
    stored: Vec<Coupon>,
    base: Vec<Coupon>,
    precedence: CouponPrecedence,
    now: DateTime<Utc>,
) -> Vec<Coupon> {
    merge_coupons(stored, base, precedence)
        .into_iter()
        .filter(|coupon| coupon.is_available(now))
        .collect()
}

/// A user's coupons, backed by a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CouponBook<S> {
    store: S,
    base: Vec<Coupon>,
    precedence: CouponPrecedence,
}

impl<S: KeyValueStore> CouponBook<S> {
    /// Create a coupon book over `store` with the storefront's base coupons.
    pub const fn new(store: S, base: Vec<Coupon>, precedence: CouponPrecedence) -> Self {
        Self {
            store,
            base,
            precedence,
        }
    }

    /// Coupons stored for `user`. Records that fail to parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn stored(&self, user: UserId) -> Result<Vec<Coupon>, StorageError> {
        Ok(self.stored_list(user)?.items)
    }

    fn stored_list(&self, user: UserId) -> Result<JsonList<Coupon>, StorageError> {
        storage::read_json_list(&self.store, &keys::user_coupons(user))
    }

    /// Coupons `user` can apply right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip(self), fields(user = %user))]
    pub fn available(&self, user: UserId, now: DateTime<Utc>) -> Result<Vec<Coupon>, StorageError> {
        let coupons = available_coupons(self.stored(user)?, self.base.clone(), self.precedence, now);
        tracing::debug!(count = coupons.len(), "Available coupons");
        Ok(coupons)
    }

    /// Look up an available coupon by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn find_by_code(
        &self,
        user: UserId,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Coupon>, StorageError> {
        Ok(self
            .available(user, now)?
            .into_iter()
            .find(|coupon| coupon.matches_code(code)))
    }

    /// Store a new coupon for `user`, replacing a stored coupon with the same id.
    ///
    /// Stored records that cannot be parsed are written back untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, coupon), fields(user = %user, coupon = %coupon.id))]
    pub fn grant(&self, user: UserId, coupon: Coupon) -> Result<(), StorageError> {
        self.upsert(user, coupon)?;
        tracing::info!("Coupon granted");
        Ok(())
    }

    /// Mark the coupon named by `code` as used.
    ///
    /// An available coupon with that code is preferred over used or expired
    /// ones sharing it, so a reissued code redeems the fresh copy. The
    /// redeemed copy is written to the user's stored coupons, so a base
    /// coupon is recorded there too.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::NotFound`] for unknown codes,
    /// [`CouponError::AlreadyUsed`] or [`CouponError::Expired`] for
    /// unavailable ones, and [`CouponError::Storage`] on store failures.
    #[instrument(skip(self), fields(user = %user))]
    pub fn redeem(&self, user: UserId, code: &str, now: DateTime<Utc>) -> Result<Coupon, CouponError> {
        let merged = merge_coupons(self.stored(user)?, self.base.clone(), self.precedence);

        let Some(mut coupon) = merged
            .iter()
            .find(|coupon| coupon.matches_code(code) && coupon.is_available(now))
            .cloned()
        else {
            return Err(match merged.into_iter().find(|coupon| coupon.matches_code(code)) {
                Some(coupon) if coupon.is_used => CouponError::AlreadyUsed(coupon.code),
                Some(coupon) => CouponError::Expired(coupon.code),
                None => CouponError::NotFound(code.to_owned()),
            });
        };

        coupon.is_used = true;
        self.upsert(user, coupon.clone())?;

        tracing::info!(coupon = %coupon.id, "Coupon redeemed");
        Ok(coupon)
    }

    fn upsert(&self, user: UserId, coupon: Coupon) -> Result<(), StorageError> {
        let mut stored = self.stored_list(user)?;
        stored.items.retain(|existing| existing.id != coupon.id);
        stored.items.push(coupon);
        storage::write_json_list(&self.store, &keys::user_coupons(user), &stored)
    }
}

/// State of the cart's coupon input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponField {
    input: String,
    applied: Option<String>,
    error: Option<&'static str>,
}

impl CouponField {
    /// An empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the typed text. Editing clears a previous error.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.error = None;
    }

    /// Current text in the field.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Code of the coupon currently applied to the cart.
    #[must_use]
    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Inline error under the field.
    #[must_use]
    pub const fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Submit the typed code; `validate` decides whether it is accepted.
    ///
    /// On success the code becomes the applied coupon and the field is
    /// cleared. On failure the inline error is set and the text is kept.
    pub fn apply(&mut self, validate: impl FnOnce(&str) -> bool) -> bool {
        let code = self.input.trim().to_owned();
        if !code.is_empty() && validate(&code) {
            self.applied = Some(code);
            self.input.clear();
            self.error = None;
            true
        } else {
            self.error = Some(INVALID_COUPON_MESSAGE);
            false
        }
    }

    /// Drop the applied coupon.
    pub fn remove_applied(&mut self) {
        self.applied = None;
    }
}
