//! Loyalty points: earned on purchases, exchanged for coupons.

use chrono::{DateTime, Duration, Utc};
use levelup_core::{Clp, Coupon, CouponId, CouponValue, UserId};
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;
use tracing::instrument;

use crate::coupons::{CouponBook, CouponPrecedence};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Pesos paid per point earned.
pub const CLP_PER_POINT: u64 = 1_000;

/// Points exchanged for one reward coupon.
pub const POINTS_PER_COUPON: u64 = 100;

/// Value of a reward coupon.
pub const REWARD_COUPON_VALUE: Clp = Clp::new(5_000);

/// Days a reward coupon stays valid.
pub const REWARD_COUPON_DAYS: i64 = 30;

/// Errors from the points ledger.
#[derive(Debug, Error)]
pub enum LoyaltyError {
    #[error("not enough points: have {balance}, need {required}")]
    InsufficientPoints { balance: u64, required: u64 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Points earned for paying `total`.
#[must_use]
pub const fn points_for(total: Clp) -> u64 {
    total.pesos() / CLP_PER_POINT
}

/// Per-user points balances stored under `userPoints_<id>`.
#[derive(Debug, Clone)]
pub struct LoyaltyLedger<S> {
    store: S,
}

impl<S: KeyValueStore> LoyaltyLedger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Current balance; missing or malformed balances read as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn balance(&self, user: UserId) -> Result<u64, StorageError> {
        storage::read_counter(&self.store, &keys::user_points(user))
    }

    /// Add `points` and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn credit(&self, user: UserId, points: u64) -> Result<u64, StorageError> {
        let balance = self.balance(user)?.saturating_add(points);
        storage::write_counter(&self.store, &keys::user_points(user), balance)?;
        Ok(balance)
    }

    /// Credit the points earned by a purchase of `total`; returns the points awarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self), fields(user = %user, total = total.pesos()))]
    pub fn award_for_purchase(&self, user: UserId, total: Clp) -> Result<u64, StorageError> {
        let points = points_for(total);
        if points > 0 {
            let balance = self.credit(user, points)?;
            tracing::info!(points, balance, "Loyalty points awarded");
        }
        Ok(points)
    }

    /// Exchange [`POINTS_PER_COUPON`] points for a reward coupon.
    ///
    /// The coupon is stored with the user's coupons and returned.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::InsufficientPoints`] if the balance is too low.
    #[instrument(skip(self), fields(user = %user))]
    pub fn redeem_for_coupon(&self, user: UserId, now: DateTime<Utc>) -> Result<Coupon, LoyaltyError> {
        let balance = self.balance(user)?;
        if balance < POINTS_PER_COUPON {
            return Err(LoyaltyError::InsufficientPoints {
                balance,
                required: POINTS_PER_COUPON,
            });
        }

        let coupon = reward_coupon(now);
        CouponBook::new(&self.store, Vec::new(), CouponPrecedence::StoredWins)
            .grant(user, coupon.clone())?;
        storage::write_counter(
            &self.store,
            &keys::user_points(user),
            balance - POINTS_PER_COUPON,
        )?;

        tracing::info!(code = %coupon.code, "Points exchanged for coupon");
        Ok(coupon)
    }
}

/// A fresh reward coupon with a random `LVL-XXXXXXXX` code.
fn reward_coupon(now: DateTime<Utc>) -> Coupon {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();

    Coupon {
        id: CouponId::generate(),
        code: format!("LVL-{suffix}"),
        expires_at: Some(now + Duration::days(REWARD_COUPON_DAYS)),
        is_used: false,
        value: Some(CouponValue::Amount(REWARD_COUPON_VALUE)),
        description: Some(format!("Canje de {POINTS_PER_COUPON} puntos")),
    }
}
