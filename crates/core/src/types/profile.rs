//! The locally stored user profile.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A user profile as persisted under the `userProfile` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub nombre: String,
    pub email: Email,
    pub fecha_nacimiento: NaiveDate,
    /// Student-verification flag that unlocks the DUOC discount.
    #[serde(default)]
    pub is_duoc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

impl UserProfile {
    /// Age in whole years on `today`.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        age_on(self.fecha_nacimiento, today)
    }
}

/// Age in whole years of someone born on `birth` as of `today`.
///
/// Returns 0 for birth dates in the future.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let Some(years) = today.year().checked_sub(birth.year()) else {
        return 0;
    };
    let had_birthday = (today.month(), today.day()) >= (birth.month(), birth.day());
    let years = if had_birthday { years } else { years - 1 };
    u32::try_from(years).unwrap_or(0)
}
