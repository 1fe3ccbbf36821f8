//! Order completion: price the cart, redeem the coupon, award points.

use chrono::{DateTime, Utc};
use levelup_core::{CartLineItem, Clp, Coupon, PricingBreakdown, UserProfile};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::cart::CartService;
use crate::coupons::{CouponBook, CouponError, CouponPrecedence};
use crate::loyalty::LoyaltyLedger;
use crate::pricing::{DiscountInputs, PricingEngine};
use crate::storage::{KeyValueStore, StorageError};

/// Errors from completing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What the buyer brings to checkout besides the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Code typed into the coupon field.
    pub coupon_code: Option<String>,
    /// Promotional discount decided outside the engine.
    pub promo_discount: Clp,
}

/// A completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub lines: Vec<CartLineItem>,
    pub breakdown: PricingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub points_awarded: u64,
    pub placed_at: DateTime<Utc>,
}

/// Ties the cart, coupon book, points ledger and pricing engine together.
#[derive(Debug, Clone)]
pub struct Checkout<S> {
    cart: CartService<S>,
    coupons: CouponBook<S>,
    loyalty: LoyaltyLedger<S>,
    engine: PricingEngine,
}

impl<S: KeyValueStore + Clone> Checkout<S> {
    /// Create a checkout over `store`.
    pub fn new(
        store: S,
        engine: PricingEngine,
        base_coupons: Vec<Coupon>,
        precedence: CouponPrecedence,
    ) -> Self {
        Self {
            cart: CartService::new(store.clone()),
            coupons: CouponBook::new(store.clone(), base_coupons, precedence),
            loyalty: LoyaltyLedger::new(store),
            engine,
        }
    }

    /// Price the current cart for `user` without committing anything.
    ///
    /// Returns the breakdown together with the coupon it applied.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Coupon`] if the requested code is not
    /// available to `user`.
    pub fn quote(
        &self,
        user: &UserProfile,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> Result<(Vec<CartLineItem>, PricingBreakdown, Option<Coupon>), CheckoutError> {
        let lines = self.cart.lines()?;

        let coupon = match request.coupon_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(
                self.coupons
                    .find_by_code(user.id, code, now)?
                    .ok_or_else(|| CouponError::NotFound(code.to_owned()))?,
            ),
            _ => None,
        };

        let inputs = DiscountInputs {
            promo_discount: request.promo_discount,
            coupon: coupon.as_ref().and_then(|c| c.value),
            duoc: user.is_duoc,
        };
        let breakdown = self.engine.breakdown(&lines, &inputs);
        Ok((lines, breakdown, coupon))
    }

    /// Complete the order.
    ///
    /// Prices the cart, redeems the applied coupon, awards points on the
    /// total paid and empties the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart,
    /// [`CheckoutError::Coupon`] if the coupon cannot be redeemed, and
    /// [`CheckoutError::Storage`] on store failures.
    #[instrument(skip(self, user, request), fields(user = %user.id))]
    pub fn complete(
        &self,
        user: &UserProfile,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderReceipt, CheckoutError> {
        let (lines, breakdown, coupon) = self.quote(user, request, now)?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let coupon_code = match coupon {
            Some(coupon) => Some(self.coupons.redeem(user.id, &coupon.code, now)?.code),
            None => None,
        };
        let points_awarded = self.loyalty.award_for_purchase(user.id, breakdown.total)?;
        self.cart.clear()?;

        let receipt = OrderReceipt {
            order_id: Uuid::new_v4(),
            lines,
            breakdown,
            coupon_code,
            points_awarded,
            placed_at: now,
        };

        tracing::info!(
            order_id = %receipt.order_id,
            total = receipt.breakdown.total.pesos(),
            points = points_awarded,
            "Order completed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};
    use levelup_core::{CouponId, CouponValue, Email, Product, ProductId, UserId};

    use super::*;
    use crate::pricing::ShippingPolicy;
    use crate::storage::{MemoryStore, keys};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn user(is_duoc: bool) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            nombre: "Camila".to_string(),
            email: Email::parse("camila@duoc.cl").unwrap(),
            fecha_nacimiento: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            is_duoc,
            referral_code: None,
        }
    }

    fn product(id: i32, precio: u64) -> Product {
        Product {
            id: ProductId::new(id),
            nombre: format!("Producto {id}"),
            code: format!("P{id:03}"),
            categoria_id: "consolas".to_string(),
            categoria: "Consolas".to_string(),
            marca: "Sony".to_string(),
            precio_clp: Clp::new(precio),
            rating: 4.8,
            stock: 10,
            descripcion: None,
            imagen: None,
        }
    }

    fn base_coupons() -> Vec<Coupon> {
        vec![Coupon {
            id: CouponId::from("c-10"),
            code: "GAMER10".to_string(),
            expires_at: Some(now() + Duration::days(10)),
            is_used: false,
            value: Some(CouponValue::Percent(10)),
            description: None,
        }]
    }

    fn checkout(store: &MemoryStore) -> Checkout<&MemoryStore> {
        let engine = PricingEngine::new(
            20,
            ShippingPolicy {
                flat_fee: Clp::new(3_990),
                free_over: None,
            },
        );
        Checkout::new(store, engine, base_coupons(), CouponPrecedence::StoredWins)
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            checkout(&store).complete(&user(false), &CheckoutRequest::default(), now()),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_complete_with_coupon_and_duoc() {
        let store = MemoryStore::new();
        CartService::new(&store).add(&product(1, 50_000), 2).unwrap();

        let request = CheckoutRequest {
            coupon_code: Some("gamer10".to_string()),
            promo_discount: Clp::ZERO,
        };
        let receipt = checkout(&store).complete(&user(true), &request, now()).unwrap();

        // 100_000 - 10_000 coupon - 20_000 DUOC + 3_990 shipping
        assert_eq!(receipt.breakdown.total, Clp::new(73_990));
        assert_eq!(receipt.coupon_code.as_deref(), Some("GAMER10"));
        assert_eq!(receipt.points_awarded, 73);
        assert_eq!(receipt.lines.len(), 1);

        assert!(CartService::new(&store).lines().unwrap().is_empty());
        assert_eq!(LoyaltyLedger::new(&store).balance(UserId::new(1)).unwrap(), 73);

        // The coupon is spent.
        CartService::new(&store).add(&product(1, 50_000), 1).unwrap();
        assert!(matches!(
            checkout(&store).complete(&user(true), &request, now()),
            Err(CheckoutError::Coupon(CouponError::NotFound(_)))
        ));
    }

    #[test]
    fn test_reissued_code_completes_after_quote() {
        let store = MemoryStore::new();
        let used = Coupon {
            id: CouponId::from("c-10-2024"),
            is_used: true,
            ..base_coupons().remove(0)
        };
        crate::storage::write_json(&store, &keys::user_coupons(UserId::new(1)), &vec![used])
            .unwrap();
        CartService::new(&store).add(&product(1, 50_000), 1).unwrap();

        let request = CheckoutRequest {
            coupon_code: Some("GAMER10".to_string()),
            promo_discount: Clp::ZERO,
        };
        let checkout = checkout(&store);
        let (_, _, quoted) = checkout.quote(&user(false), &request, now()).unwrap();
        assert_eq!(quoted.unwrap().id, CouponId::from("c-10"));

        let receipt = checkout.complete(&user(false), &request, now()).unwrap();
        assert_eq!(receipt.coupon_code.as_deref(), Some("GAMER10"));
        assert_eq!(receipt.breakdown.coupon_discount, Clp::new(5_000));
    }

    #[test]
    fn test_unknown_coupon_leaves_cart_untouched() {
        let store = MemoryStore::new();
        CartService::new(&store).add(&product(1, 10_000), 1).unwrap();
        let request = CheckoutRequest {
            coupon_code: Some("NOPE".to_string()),
            promo_discount: Clp::ZERO,
        };
        assert!(checkout(&store).complete(&user(false), &request, now()).is_err());
        assert_eq!(CartService::new(&store).item_count().unwrap(), 1);
    }
}
