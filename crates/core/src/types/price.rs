//! Chilean peso amounts.
//!
//! CLP has no minor unit, so every amount is a whole, non-negative number of
//! pesos. Percentages are applied with decimal arithmetic and rounded half away
//! from zero, matching how prices are rounded at the till.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in Chilean pesos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Clp(u64);

impl Clp {
    /// Zero pesos.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a number of pesos.
    #[must_use]
    pub const fn new(pesos: u64) -> Self {
        Self(pesos)
    }

    /// Returns the number of pesos.
    #[must_use]
    pub const fn pesos(self) -> u64 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(qty)))
    }

    /// Take `percent` percent of this amount, rounded half away from zero.
    ///
    /// Percentages above 100 are capped at 100.
    ///
    /// ```
    /// use levelup_core::Clp;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Clp::new(59_990).percent(Decimal::from(20)), Clp::new(11_998));
    /// assert_eq!(Clp::new(5).percent(Decimal::from(50)), Clp::new(3));
    /// ```
    #[must_use]
    pub fn percent(self, percent: Decimal) -> Self {
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let amount = Decimal::from(self.0) * percent / Decimal::ONE_HUNDRED;
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(rounded.to_u64().unwrap_or(self.0))
    }

    /// Format with Chilean thousands separators, e.g. `$1.234.567`.
    #[must_use]
    pub fn display(self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        let offset = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Clp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Clp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Clp {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Clp {
    fn from(pesos: u64) -> Self {
        Self(pesos)
    }
}

impl From<Clp> for u64 {
    fn from(amount: Clp) -> Self {
        amount.0
    }
}
