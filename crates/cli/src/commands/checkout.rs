//! Checkout command.

use std::io::Write;

use chrono::Utc;
use levelup_core::Clp;
use levelup_storefront::checkout::CheckoutRequest;
use levelup_storefront::state::AppState;

use super::cart::{write_breakdown, write_lines};
use super::{CommandError, require_profile};

/// Complete the order for the stored profile and print the receipt.
///
/// # Errors
///
/// Returns an error if there is no profile, the cart is empty, the coupon
/// cannot be redeemed, or the store fails.
pub async fn complete(
    state: &AppState,
    coupon: Option<String>,
    promo: u64,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let profile = require_profile(state)?;
    let request = CheckoutRequest {
        coupon_code: coupon,
        promo_discount: Clp::new(promo),
    };

    let receipt = state
        .checkout()
        .await
        .complete(&profile, &request, Utc::now())?;

    writeln!(out, "Pedido {}", receipt.order_id)?;
    writeln!(out, "Fecha: {}", receipt.placed_at.format("%Y-%m-%d %H:%M"))?;
    write_lines(&receipt.lines, out)?;
    write_breakdown(&receipt.breakdown, out)?;
    if let Some(code) = &receipt.coupon_code {
        writeln!(out, "Cupón usado: {code}")?;
    }
    writeln!(out, "Ganaste {} puntos", receipt.points_awarded)?;
    writeln!(out, "¡Gracias por comprar en Level-Up!")?;
    Ok(())
}
