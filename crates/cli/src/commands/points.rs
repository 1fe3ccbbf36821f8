//! Loyalty points commands.

use std::io::Write;

use chrono::Utc;
use levelup_storefront::loyalty::POINTS_PER_COUPON;
use levelup_storefront::state::AppState;

use super::{CommandError, require_profile};

/// Print the points balance of the stored profile.
///
/// # Errors
///
/// Returns an error if there is no profile or the store fails.
pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let profile = require_profile(state)?;
    let balance = state.loyalty().balance(profile.id)?;
    writeln!(out, "Tienes {balance} puntos")?;
    if balance >= POINTS_PER_COUPON {
        writeln!(out, "Canjea {POINTS_PER_COUPON} puntos con `levelup points redeem`")?;
    }
    Ok(())
}

/// Exchange points for a reward coupon.
///
/// # Errors
///
/// Returns an error if there is no profile, the balance is too low, or the
/// store fails.
pub fn redeem(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let profile = require_profile(state)?;
    let coupon = state.loyalty().redeem_for_coupon(profile.id, Utc::now())?;
    if let Some(value) = coupon.value {
        writeln!(out, "Nuevo cupón {} por {value}", coupon.code)?;
    }
    if let Some(expires) = coupon.expires_at {
        writeln!(out, "Válido hasta {}", expires.format("%Y-%m-%d"))?;
    }
    Ok(())
}
