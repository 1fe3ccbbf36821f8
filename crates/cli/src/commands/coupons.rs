//! Coupon commands.

use std::io::Write;

use chrono::Utc;
use levelup_storefront::checkout::CheckoutRequest;
use levelup_storefront::coupons::CouponField;
use levelup_storefront::state::AppState;

use super::cart::write_breakdown;
use super::{CommandError, require_profile};

/// List the coupons the stored profile can apply right now.
///
/// # Errors
///
/// Returns an error if there is no profile or the store fails.
pub async fn list(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let profile = require_profile(state)?;
    let coupons = state.coupons().await.available(profile.id, Utc::now())?;

    if coupons.is_empty() {
        writeln!(out, "No tienes cupones disponibles")?;
        return Ok(());
    }

    for coupon in &coupons {
        let expires = coupon
            .expires_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let value = coupon.value.map(|v| v.to_string()).unwrap_or_default();
        writeln!(
            out,
            "{:<14} {:>8}  vence {}  {}",
            coupon.code,
            value,
            expires,
            coupon.description.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

/// Preview the cart total with a coupon applied, without redeeming it.
///
/// An unknown, used or expired code shows the inline coupon error.
///
/// # Errors
///
/// Returns an error if there is no profile or the store fails. A store
/// failure is reported as an error, never as a rejected code.
pub async fn apply(state: &AppState, code: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let profile = require_profile(state)?;
    let coupons = state.coupons().await;
    let now = Utc::now();

    let found = coupons.find_by_code(profile.id, code.trim(), now)?.is_some();

    let mut field = CouponField::new();
    field.set_input(code);
    let accepted = field.apply(|_| found);

    let Some(applied) = field.applied().filter(|_| accepted) else {
        writeln!(out, "{}", field.error().unwrap_or_default())?;
        return Ok(());
    };

    let request = CheckoutRequest {
        coupon_code: Some(applied.to_owned()),
        ..CheckoutRequest::default()
    };
    let (_, breakdown, _) = state.checkout().await.quote(&profile, &request, now)?;
    writeln!(out, "Cupón {applied} aplicado")?;
    write_breakdown(&breakdown, out)?;
    Ok(())
}
