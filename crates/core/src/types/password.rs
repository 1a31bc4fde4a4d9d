//! Password hashing with bcrypt.
//!
//! Stored credentials are bcrypt hashes in modular crypt format
//! (`$2b$10$<salt><digest>`), which is what the login flow of the
//! storefront verifies against.

use core::fmt;
use std::str::FromStr;

use bcrypt::{BcryptError, HashParts};
use serde::{Deserialize, Serialize};

/// Work factor used for admin credentials.
pub const DEFAULT_COST: u32 = 10;

/// Errors that can occur when hashing or verifying a password.
#[derive(thiserror::Error, Debug)]
pub enum PasswordError {
    /// bcrypt refused to hash (bad cost, RNG failure).
    #[error("password hashing failed: {0}")]
    Hash(#[source] BcryptError),

    /// The stored value is not a bcrypt hash.
    #[error("stored password is not a valid bcrypt hash: {0}")]
    Malformed(#[source] BcryptError),
}

/// A salted password hash as stored in the user record.
///
/// Values read back from the store are wrapped as-is: a legacy or
/// hand-edited row may hold something that is not bcrypt at all, and that
/// only matters once someone tries to verify against it.
///
/// `Debug` is redacted so hashes do not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a value read from the store.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Returns the hash string as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the bcrypt cost encoded in the hash, or `None` if the value
    /// is not a bcrypt hash.
    #[must_use]
    pub fn cost(&self) -> Option<u32> {
        HashParts::from_str(&self.0).ok().map(|parts| parts.get_cost())
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[REDACTED]").finish()
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hash `plaintext` with a fresh random salt at the given bcrypt cost.
///
/// Two calls with the same input produce different strings that both verify.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if the cost is outside bcrypt's supported
/// range (4..=31) or the system RNG fails.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<PasswordHash, PasswordError> {
    bcrypt::hash(plaintext, cost)
        .map(PasswordHash)
        .map_err(PasswordError::Hash)
}

/// Check `plaintext` against a stored hash.
///
/// # Errors
///
/// Returns `PasswordError::Malformed` if `hash` is not a bcrypt hash. A
/// well-formed hash that does not match yields `Ok(false)`.
pub fn verify_password(plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordError> {
    bcrypt::verify(plaintext, &hash.0).map_err(PasswordError::Malformed)
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PasswordHash {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PasswordHash {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PasswordHash {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("password123", TEST_COST).unwrap();
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn test_default_cost_is_encoded() {
        let hash = hash_password("password123", DEFAULT_COST).unwrap();
        assert!(hash.as_str().starts_with("$2b$10$"));
        assert_eq!(hash.cost(), Some(DEFAULT_COST));
    }

    #[test]
    fn test_salt_differs_between_calls() {
        let first = hash_password("password123", TEST_COST).unwrap();
        let second = hash_password("password123", TEST_COST).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("password123", &first).unwrap());
        assert!(verify_password("password123", &second).unwrap());
    }

    #[test]
    fn test_cost_out_of_range() {
        assert!(matches!(
            hash_password("password123", 3),
            Err(PasswordError::Hash(_))
        ));
        assert!(matches!(
            hash_password("password123", 32),
            Err(PasswordError::Hash(_))
        ));
    }

    #[test]
    fn test_verify_against_legacy_value() {
        let legacy = PasswordHash::from_stored("oldhash".to_owned());
        assert_eq!(legacy.cost(), None);
        assert!(matches!(
            verify_password("password123", &legacy),
            Err(PasswordError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_hash_from_other_implementation() {
        // $2a$ hashes written by other bcrypt libraries must keep working
        let hash = PasswordHash::from_stored(
            "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW".to_owned(),
        );
        assert_eq!(hash.cost(), Some(5));
        assert!(verify_password("U*U", &hash).unwrap());
        assert!(!verify_password("U*V", &hash).unwrap());
    }

    #[test]
    fn test_debug_is_redacted() {
        let hash = hash_password("password123", TEST_COST).unwrap();
        let debug = format!("{hash:?}");
        assert!(!debug.contains("$2b$"));
        assert!(debug.contains("REDACTED"));
    }
}
