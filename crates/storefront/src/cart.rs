//! Shopping cart persisted under the `cart` and `cartCount` keys.
//!
//! The quantity invariant `1 <= qty <= stock` is enforced here, at the point
//! of mutation. `cartCount` mirrors the total quantity for the header badge and
//! is rewritten on every change.

use levelup_core::{CartLineItem, Clp, Product, ProductId};
use thiserror::Error;
use tracing::instrument;

use crate::pricing::PricingEngine;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error("invalid quantity {qty}: must be between 1 and {stock}")]
    InvalidQuantity { qty: u32, stock: u32 },

    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Cart operations over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: KeyValueStore> CartService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Current cart lines; a malformed cart reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn lines(&self) -> Result<Vec<CartLineItem>, StorageError> {
        storage::read_json_or_default(&self.store, keys::CART)
    }

    /// Add `qty` units of `product`.
    ///
    /// Adding a product already in the cart merges into its line. The
    /// resulting quantity is clamped to the product's stock, and the line's
    /// price and stock are refreshed from `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] for products with no stock and
    /// [`CartError::InvalidQuantity`] for a zero quantity.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub fn add(&self, product: &Product, qty: u32) -> Result<CartLineItem, CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.id));
        }
        if qty == 0 {
            return Err(CartError::InvalidQuantity {
                qty,
                stock: product.stock,
            });
        }

        let mut lines = self.lines()?;
        let line = if let Some(existing) = lines.iter_mut().find(|line| line.id == product.id) {
            let merged = existing.qty.saturating_add(qty).min(product.stock);
            *existing = CartLineItem::from_product(product, merged);
            existing.clone()
        } else {
            let line = CartLineItem::from_product(product, qty.min(product.stock));
            lines.push(line.clone());
            line
        };

        if line.qty < qty {
            tracing::debug!(requested = qty, stock = product.stock, "Quantity clamped to stock");
        }

        self.persist(&lines)?;
        tracing::info!(qty = line.qty, "Added to cart");
        Ok(line)
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line and
    /// [`CartError::InvalidQuantity`] if `qty` is outside `1..=stock`.
    #[instrument(skip(self))]
    pub fn set_quantity(&self, id: ProductId, qty: u32) -> Result<CartLineItem, CartError> {
        let mut lines = self.lines()?;
        let line = lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CartError::NotInCart(id))?;

        if qty < 1 || qty > line.stock {
            return Err(CartError::InvalidQuantity {
                qty,
                stock: line.stock,
            });
        }

        line.qty = qty;
        let updated = line.clone();
        self.persist(&lines)?;
        Ok(updated)
    }

    /// Remove the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line.
    #[instrument(skip(self))]
    pub fn remove(&self, id: ProductId) -> Result<(), CartError> {
        let mut lines = self.lines()?;
        let before = lines.len();
        lines.retain(|line| line.id != id);
        if lines.len() == before {
            return Err(CartError::NotInCart(id));
        }
        self.persist(&lines)?;
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StorageError> {
        self.persist(&[])
    }

    /// Total units across all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn item_count(&self) -> Result<u64, StorageError> {
        Ok(count(&self.lines()?))
    }

    /// Sum of `price * qty` over the lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn subtotal(&self) -> Result<Clp, StorageError> {
        Ok(PricingEngine::subtotal(&self.lines()?))
    }

    fn persist(&self, lines: &[CartLineItem]) -> Result<(), StorageError> {
        storage::write_json(&self.store, keys::CART, lines)?;
        storage::write_counter(&self.store, keys::CART_COUNT, count(lines))
    }
}

fn count(lines: &[CartLineItem]) -> u64 {
    lines.iter().map(|line| u64::from(line.qty)).sum()
}
