//! Profile form validation and the stored `userProfile`.

use chrono::NaiveDate;
use levelup_core::{Email, EmailError, UserId, UserProfile, age_on};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Minimum age to register.
pub const MIN_AGE: u32 = 18;

/// Maximum length of `nombre`, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Errors from profile validation and persistence.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("invalid birth date: {0}")]
    InvalidBirthDate(String),

    #[error("must be at least {min} years old, got {age}")]
    Underage { age: u32, min: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Raw profile form input, validated by [`ProfileInput::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub nombre: String,
    pub email: String,
    /// `YYYY-MM-DD`.
    pub fecha_nacimiento: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

impl ProfileInput {
    /// Validate the form and build a profile for `id`.
    ///
    /// `isDuoc` is derived from the email domain. A blank referral code is
    /// dropped; others are trimmed and uppercased.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`ProfileError`].
    pub fn validate(self, id: UserId, today: NaiveDate) -> Result<UserProfile, ProfileError> {
        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if nombre.chars().count() > MAX_NAME_CHARS {
            return Err(ProfileError::NameTooLong {
                max: MAX_NAME_CHARS,
            });
        }

        let email = Email::parse(&self.email)?;

        let raw_date = self.fecha_nacimiento.trim();
        let fecha_nacimiento = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| ProfileError::InvalidBirthDate(raw_date.to_owned()))?;
        if fecha_nacimiento > today {
            return Err(ProfileError::InvalidBirthDate(raw_date.to_owned()));
        }

        let age = age_on(fecha_nacimiento, today);
        if age < MIN_AGE {
            return Err(ProfileError::Underage { age, min: MIN_AGE });
        }

        let referral_code = self
            .referral_code
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty());

        Ok(UserProfile {
            id,
            nombre: nombre.to_owned(),
            is_duoc: email.is_duoc(),
            email,
            fecha_nacimiento,
            referral_code,
        })
    }
}

/// The single locally stored profile.
#[derive(Debug, Clone)]
pub struct ProfileStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored profile; a malformed profile loads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self) -> Result<Option<UserProfile>, StorageError> {
        storage::read_json(&self.store, keys::USER_PROFILE)
    }

    /// Replace the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self, profile), fields(user = %profile.id, duoc = profile.is_duoc))]
    pub fn save(&self, profile: &UserProfile) -> Result<(), StorageError> {
        storage::write_json(&self.store, keys::USER_PROFILE, profile)?;
        tracing::info!("Profile saved");
        Ok(())
    }

    /// Delete the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::USER_PROFILE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn input(nombre: &str, email: &str, fecha: &str) -> ProfileInput {
        ProfileInput {
            nombre: nombre.to_string(),
            email: email.to_string(),
            fecha_nacimiento: fecha.to_string(),
            referral_code: None,
        }
    }

    #[test]
    fn test_valid_duoc_profile() {
        let mut form = input("  Valentina Rojas ", "V.Rojas@DUOC.cl", "2001-03-15");
        form.referral_code = Some(" amigo10 ".to_string());
        let profile = form.validate(UserId::new(1), today()).unwrap();
        assert_eq!(profile.nombre, "Valentina Rojas");
        assert_eq!(profile.email.as_str(), "v.rojas@duoc.cl");
        assert!(profile.is_duoc);
        assert_eq!(profile.referral_code.as_deref(), Some("AMIGO10"));
    }

    #[test]
    fn test_non_duoc_email() {
        let profile = input("Diego", "diego@gmail.com", "1990-01-01")
            .validate(UserId::new(2), today())
            .unwrap();
        assert!(!profile.is_duoc);
        assert!(profile.referral_code.is_none());
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            input("  ", "a@b.cl", "1990-01-01").validate(UserId::new(1), today()),
            Err(ProfileError::EmptyName)
        ));
        assert!(matches!(
            input(&"x".repeat(101), "a@b.cl", "1990-01-01").validate(UserId::new(1), today()),
            Err(ProfileError::NameTooLong { max: 100 })
        ));
        assert!(matches!(
            input("Ana", "ana", "1990-01-01").validate(UserId::new(1), today()),
            Err(ProfileError::InvalidEmail(_))
        ));
        assert!(matches!(
            input("Ana", "ana@b.cl", "01/01/1990").validate(UserId::new(1), today()),
            Err(ProfileError::InvalidBirthDate(_))
        ));
        assert!(matches!(
            input("Ana", "ana@b.cl", "2007-06-02").validate(UserId::new(1), today()),
            Err(ProfileError::Underage { age: 17, min: 18 })
        ));
    }

    #[test]
    fn test_turns_eighteen_today() {
        assert!(input("Ana", "ana@b.cl", "2007-06-01")
            .validate(UserId::new(1), today())
            .is_ok());
    }

    #[test]
    fn test_store_roundtrip_and_malformed() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        assert!(profiles.load().unwrap().is_none());

        let profile = input("Ana", "ana@duoc.cl", "2000-01-01")
            .validate(UserId::new(5), today())
            .unwrap();
        profiles.save(&profile).unwrap();
        assert_eq!(profiles.load().unwrap(), Some(profile));

        store.set("userProfile", "{\"id\":").unwrap();
        assert!(profiles.load().unwrap().is_none());

        profiles.clear().unwrap();
        assert!(store.get("userProfile").unwrap().is_none());
    }
}
