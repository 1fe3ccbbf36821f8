//! Cart pricing: subtotal, discounts, shipping and total.
//!
//! # Order of operations
//!
//! All discounts are summed and subtracted from the subtotal, shipping is
//! added, and only then is the result floored at zero. Shipping therefore
//! cannot be "absorbed" by an oversized discount the way it would be if the
//! clamp ran before shipping was added.

use levelup_core::{CartLineItem, Clp, CouponValue, PricingBreakdown};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default DUOC student discount, in percent.
pub const DEFAULT_DUOC_PERCENT: u8 = 20;

/// `max(0, subtotal - discount - coupon_discount - duoc_discount + shipping)`.
///
/// ```
/// use levelup_core::Clp;
/// use levelup_storefront::pricing::compute_total;
///
/// let total = compute_total(
///     Clp::new(100_000),
///     Clp::new(10_000),
///     Clp::new(5_000),
///     Clp::new(20_000),
///     Clp::new(3_000),
/// );
/// assert_eq!(total, Clp::new(68_000));
/// ```
#[must_use]
pub fn compute_total(
    subtotal: Clp,
    discount: Clp,
    coupon_discount: Clp,
    duoc_discount: Clp,
    shipping: Clp,
) -> Clp {
    let discounts = i128::from(discount.pesos())
        + i128::from(coupon_discount.pesos())
        + i128::from(duoc_discount.pesos());
    let total = i128::from(subtotal.pesos()) - discounts + i128::from(shipping.pesos());
    Clp::new(u64::try_from(total.max(0)).unwrap_or(u64::MAX))
}

/// Flat-rate shipping with an optional free-shipping threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub flat_fee: Clp,
    /// Subtotals at or above this ship free.
    pub free_over: Option<Clp>,
}

impl ShippingPolicy {
    /// Shipping charged for `subtotal`. An empty cart ships nothing.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Clp) -> Clp {
        if subtotal.is_zero() || self.free_over.is_some_and(|threshold| subtotal >= threshold) {
            Clp::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Caller-supplied discount inputs for one pricing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountInputs {
    /// Promotional discount decided outside the engine.
    pub promo_discount: Clp,
    /// Value of the applied coupon, if any.
    pub coupon: Option<CouponValue>,
    /// Whether the profile carries the DUOC verification flag.
    pub duoc: bool,
}

/// Computes [`PricingBreakdown`]s for cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    duoc_percent: u8,
    shipping: ShippingPolicy,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DUOC_PERCENT, ShippingPolicy::default())
    }
}

impl PricingEngine {
    /// Create an engine. `duoc_percent` is capped at 100.
    #[must_use]
    pub fn new(duoc_percent: u8, shipping: ShippingPolicy) -> Self {
        Self {
            duoc_percent: duoc_percent.min(100),
            shipping,
        }
    }

    /// The DUOC discount rate in percent.
    #[must_use]
    pub const fn duoc_percent(&self) -> u8 {
        self.duoc_percent
    }

    /// The shipping policy in effect.
    #[must_use]
    pub const fn shipping(&self) -> ShippingPolicy {
        self.shipping
    }

    /// Sum of `price * qty` over the lines.
    #[must_use]
    pub fn subtotal(lines: &[CartLineItem]) -> Clp {
        lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Price `lines` with the given discounts.
    ///
    /// Coupon and DUOC discounts are both computed on the subtotal.
    #[must_use]
    pub fn breakdown(&self, lines: &[CartLineItem], inputs: &DiscountInputs) -> PricingBreakdown {
        let subtotal = Self::subtotal(lines);
        let discount = inputs.promo_discount;
        let coupon_discount = inputs
            .coupon
            .map_or(Clp::ZERO, |value| value.discount_on(subtotal));
        let duoc_discount = if inputs.duoc {
            subtotal.percent(Decimal::from(self.duoc_percent))
        } else {
            Clp::ZERO
        };
        let shipping = self.shipping.shipping_for(subtotal);
        let total = compute_total(subtotal, discount, coupon_discount, duoc_discount, shipping);

        tracing::debug!(
            subtotal = subtotal.pesos(),
            discount = discount.pesos(),
            coupon_discount = coupon_discount.pesos(),
            duoc_discount = duoc_discount.pesos(),
            shipping = shipping.pesos(),
            total = total.pesos(),
            "Cart priced"
        );

        PricingBreakdown {
            subtotal,
            discount,
            coupon_discount,
            duoc_discount,
            shipping,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use levelup_core::ProductId;

    use super::*;

    fn line(id: i32, price: u64, qty: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            price: Clp::new(price),
            qty,
            image: None,
            stock: 10,
        }
    }

    #[test]
    fn test_total_never_negative() {
        let total = compute_total(
            Clp::new(10_000),
            Clp::new(5_000),
            Clp::new(5_000),
            Clp::new(5_000),
            Clp::ZERO,
        );
        assert_eq!(total, Clp::ZERO);
    }

    #[test]
    fn test_total_reference_case() {
        let total = compute_total(
            Clp::new(100_000),
            Clp::new(10_000),
            Clp::new(5_000),
            Clp::new(20_000),
            Clp::new(3_000),
        );
        assert_eq!(total, Clp::new(68_000));
    }

    #[test]
    fn test_clamp_happens_after_shipping() {
        // -5000 + 3000 stays below zero: shipping does not survive the clamp.
        let total = compute_total(
            Clp::new(10_000),
            Clp::new(15_000),
            Clp::ZERO,
            Clp::ZERO,
            Clp::new(3_000),
        );
        assert_eq!(total, Clp::ZERO);

        // -1000 + 3000 = 2000.
        let total = compute_total(
            Clp::new(10_000),
            Clp::new(11_000),
            Clp::ZERO,
            Clp::ZERO,
            Clp::new(3_000),
        );
        assert_eq!(total, Clp::new(2_000));
    }

    #[test]
    fn test_total_does_not_overflow() {
        let max = Clp::new(u64::MAX);
        assert_eq!(compute_total(max, Clp::ZERO, Clp::ZERO, Clp::ZERO, max), max);
        assert_eq!(compute_total(Clp::ZERO, max, max, max, Clp::ZERO), Clp::ZERO);
    }

    #[test]
    fn test_shipping_policy() {
        let policy = ShippingPolicy {
            flat_fee: Clp::new(3_990),
            free_over: Some(Clp::new(100_000)),
        };
        assert_eq!(policy.shipping_for(Clp::ZERO), Clp::ZERO);
        assert_eq!(policy.shipping_for(Clp::new(99_999)), Clp::new(3_990));
        assert_eq!(policy.shipping_for(Clp::new(100_000)), Clp::ZERO);
    }

    #[test]
    fn test_breakdown_with_duoc_and_coupon() {
        let engine = PricingEngine::new(
            20,
            ShippingPolicy {
                flat_fee: Clp::new(3_990),
                free_over: None,
            },
        );
        let lines = vec![line(1, 29_990, 2), line(2, 40_020, 1)];
        let inputs = DiscountInputs {
            promo_discount: Clp::new(1_000),
            coupon: Some(CouponValue::Amount(Clp::new(5_000))),
            duoc: true,
        };

        let breakdown = engine.breakdown(&lines, &inputs);
        assert_eq!(breakdown.subtotal, Clp::new(100_000));
        assert_eq!(breakdown.discount, Clp::new(1_000));
        assert_eq!(breakdown.coupon_discount, Clp::new(5_000));
        assert_eq!(breakdown.duoc_discount, Clp::new(20_000));
        assert_eq!(breakdown.shipping, Clp::new(3_990));
        assert_eq!(breakdown.total, Clp::new(77_990));
    }

    #[test]
    fn test_breakdown_of_empty_cart() {
        let engine = PricingEngine::default();
        let breakdown = engine.breakdown(&[], &DiscountInputs::default());
        assert_eq!(breakdown, PricingBreakdown::default());
    }

    #[test]
    fn test_duoc_percent_is_capped() {
        assert_eq!(PricingEngine::new(250, ShippingPolicy::default()).duoc_percent(), 100);
    }
}
