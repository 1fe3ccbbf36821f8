//! Cart commands.

use std::io::Write;

use levelup_core::{CartLineItem, PricingBreakdown};
use levelup_storefront::error::AppError;
use levelup_storefront::pricing::DiscountInputs;
use levelup_storefront::state::AppState;

use super::{CommandError, parse_product_id};

/// Print the cart lines and the price breakdown.
///
/// The DUOC discount is included when the stored profile is DUOC-verified.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output fails.
pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let lines = state.cart().lines()?;
    if lines.is_empty() {
        writeln!(out, "Tu carrito está vacío")?;
        return Ok(());
    }

    let duoc = state.profiles().load()?.is_some_and(|p| p.is_duoc);
    let inputs = DiscountInputs {
        duoc,
        ..DiscountInputs::default()
    };
    let breakdown = state.engine().breakdown(&lines, &inputs);

    write_lines(&lines, out)?;
    write_breakdown(&breakdown, out)?;
    Ok(())
}

/// Add a product from the catalog.
///
/// # Errors
///
/// Returns an error if the product does not exist, is out of stock, or the
/// store fails.
pub async fn add(
    state: &AppState,
    id: &str,
    qty: u32,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let id = parse_product_id(id)?;
    let products = state.fixtures().products().await;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;

    let line = state.cart().add(product, qty)?;
    writeln!(
        out,
        "Agregado: {} x{} ({})",
        line.name,
        line.qty,
        line.line_total()
    )?;
    writeln!(out, "Productos en el carrito: {}", state.cart().item_count()?)?;
    Ok(())
}

/// Change the quantity of a line.
///
/// # Errors
///
/// Returns an error if the line is missing, the quantity is out of range, or
/// the store fails.
pub fn update(
    state: &AppState,
    id: &str,
    qty: u32,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let line = state.cart().set_quantity(parse_product_id(id)?, qty)?;
    writeln!(out, "Actualizado: {} x{}", line.name, line.qty)?;
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the line is missing or the store fails.
pub fn remove(state: &AppState, id: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let id = parse_product_id(id)?;
    state.cart().remove(id)?;
    writeln!(out, "Producto {id} eliminado del carrito")?;
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn clear(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    state.cart().clear()?;
    writeln!(out, "Carrito vaciado")?;
    Ok(())
}

pub(super) fn write_lines(lines: &[CartLineItem], out: &mut impl Write) -> std::io::Result<()> {
    for line in lines {
        writeln!(
            out,
            "{:>4}  {:<45} {:>11} x{:<3} {:>12}",
            line.id.as_i32(),
            line.name,
            line.price.display(),
            line.qty,
            line.line_total().display()
        )?;
    }
    Ok(())
}

pub(super) fn write_breakdown(
    breakdown: &PricingBreakdown,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out, "Subtotal:        {:>12}", breakdown.subtotal.display())?;
    if !breakdown.discount.is_zero() {
        writeln!(out, "Descuento:      -{:>12}", breakdown.discount.display())?;
    }
    if !breakdown.coupon_discount.is_zero() {
        writeln!(out, "Cupón:          -{:>12}", breakdown.coupon_discount.display())?;
    }
    if !breakdown.duoc_discount.is_zero() {
        writeln!(out, "Descuento DUOC: -{:>12}", breakdown.duoc_discount.display())?;
    }
    let savings = breakdown.total_savings();
    if !savings.is_zero() {
        writeln!(out, "Ahorras:         {:>12}", savings.display())?;
    }
    writeln!(out, "Envío:           {:>12}", breakdown.shipping.display())?;
    writeln!(out, "Total:           {:>12}", breakdown.total.display())?;
    Ok(())
}
