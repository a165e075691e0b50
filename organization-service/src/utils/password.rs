use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Plaintext secret. `Debug` is redacted so it never ends up in logs.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Argon2 PHC string as stored with the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid password hash format: {0}")]
    MalformedHash(String),

    #[error("Password verification failed: {0}")]
    Verify(String),
}

/// Hash a password using Argon2id with a fresh random salt.
///
/// The salt is embedded in the returned PHC string, so hashing the same
/// password twice yields different values.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, HashingError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| HashingError::Hash(e.to_string()))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Check a password against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash (or a backend
/// failure) is an error. Argon2 compares in constant time.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<bool, HashingError> {
    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| HashingError::MalformedHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(HashingError::Verify(e.to_string())),
    }
}
