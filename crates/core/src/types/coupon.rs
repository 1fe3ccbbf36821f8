//! Coupons issued by promotions and the loyalty program.
//!
//! A coupon is consumed at most once (`is_used` flips to `true` on redemption)
//! and is never available once its expiry instant has passed, whether or not
//! it was used.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::CouponId;
use super::price::Clp;

/// What a coupon takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CouponValue {
    /// Percentage of the subtotal, 0-100.
    Percent(u8),
    /// Fixed amount, capped at the subtotal.
    Amount(Clp),
}

impl CouponValue {
    /// Discount this value grants on `subtotal`.
    #[must_use]
    pub fn discount_on(self, subtotal: Clp) -> Clp {
        match self {
            Self::Percent(pct) => subtotal.percent(Decimal::from(pct)),
            Self::Amount(amount) => amount.min(subtotal),
        }
    }
}

impl fmt::Display for CouponValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(pct) => write!(f, "{pct}%"),
            Self::Amount(amount) => write!(f, "{amount}"),
        }
    }
}

/// A coupon as stored under `userCoupons_<id>` or shipped in the base list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    /// Expiry instant. Older records call this field `expiryDate`.
    #[serde(
        default,
        alias = "expiryDate",
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CouponValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Coupon {
    /// Returns `true` unless the expiry instant is strictly in the future.
    ///
    /// A coupon without any expiry is treated as expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at <= now)
    }

    /// Returns `true` if the coupon is unused and unexpired.
    #[must_use]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && !self.is_expired(now)
    }

    /// Returns `true` if `code` names this coupon (case-insensitive, trimmed).
    #[must_use]
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid coupon expiry: {raw}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn coupon(expires_at: Option<DateTime<Utc>>, is_used: bool) -> Coupon {
        Coupon {
            id: CouponId::from("c1"),
            code: "LEVELUP10".to_string(),
            expires_at,
            is_used,
            value: Some(CouponValue::Percent(10)),
            description: None,
        }
    }

    #[test]
    fn test_past_expiry_is_unavailable_even_if_unused() {
        let c = coupon(Some(now() - Duration::days(1)), false);
        assert!(c.is_expired(now()));
        assert!(!c.is_available(now()));
    }

    #[test]
    fn test_expiry_at_now_is_expired() {
        assert!(coupon(Some(now()), false).is_expired(now()));
    }

    #[test]
    fn test_missing_expiry_is_expired() {
        assert!(!coupon(None, false).is_available(now()));
    }

    #[test]
    fn test_used_coupon_is_unavailable() {
        let c = coupon(Some(now() + Duration::days(1)), true);
        assert!(!c.is_expired(now()));
        assert!(!c.is_available(now()));
    }

    #[test]
    fn test_matches_code_ignores_case_and_whitespace() {
        let c = coupon(None, false);
        assert!(c.matches_code(" levelup10 "));
        assert!(!c.matches_code("LEVELUP20"));
    }

    #[test]
    fn test_discount_values() {
        assert_eq!(
            CouponValue::Percent(10).discount_on(Clp::new(59_990)),
            Clp::new(5_999)
        );
        assert_eq!(
            CouponValue::Amount(Clp::new(5_000)).discount_on(Clp::new(3_000)),
            Clp::new(3_000)
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(CouponValue::Percent(15).to_string(), "15%");
        assert_eq!(CouponValue::Amount(Clp::new(5_000)).to_string(), "$5.000");
    }

    #[test]
    fn test_deserialize_accepts_expiry_date_alias_and_plain_dates() {
        let json = r#"{"id":"a","code":"X","expiryDate":"2025-12-31","isUsed":false}"#;
        let c: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(
            c.expires_at,
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap())
        );

        let json = r#"{"id":"b","code":"Y","expiresAt":"2025-07-01T10:00:00.000Z"}"#;
        let c: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(
            c.expires_at,
            Some(Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap())
        );
        assert!(!c.is_used);
    }

    #[test]
    fn test_deserialize_rejects_garbage_expiry() {
        let json = r#"{"id":"a","code":"X","expiresAt":"mañana"}"#;
        assert!(serde_json::from_str::<Coupon>(json).is_err());
    }

    #[test]
    fn test_value_wire_format() {
        let json = serde_json::to_string(&CouponValue::Amount(Clp::new(5_000))).unwrap();
        assert_eq!(json, r#"{"type":"amount","value":5000}"#);
        let parsed: CouponValue = serde_json::from_str(r#"{"type":"percent","value":15}"#).unwrap();
        assert_eq!(parsed, CouponValue::Percent(15));
    }
}
