//! Cart line items and the pricing breakdown shown in the cart summary.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Clp;
use super::product::Product;

/// One product line in the cart.
///
/// The quantity invariant `1 <= qty <= stock` is enforced by the code that
/// mutates the cart, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Clp,
    pub qty: u32,
    #[serde(default)]
    pub image: Option<String>,
    pub stock: u32,
}

impl CartLineItem {
    /// Build a line for `product` with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, qty: u32) -> Self {
        Self {
            id: product.id,
            name: product.nombre.clone(),
            price: product.precio_clp,
            qty,
            image: product.imagen.clone(),
            stock: product.stock,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Clp {
        self.price.times(self.qty)
    }
}

/// Subtotal/discount/total breakdown of a cart.
///
/// Invariant: `total = max(0, subtotal - discount - coupon_discount - duoc_discount + shipping)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub subtotal: Clp,
    pub discount: Clp,
    pub coupon_discount: Clp,
    pub duoc_discount: Clp,
    pub shipping: Clp,
    pub total: Clp,
}

impl PricingBreakdown {
    /// Sum of every discount component.
    #[must_use]
    pub fn total_savings(&self) -> Clp {
        self.discount + self.coupon_discount + self.duoc_discount
    }
}
