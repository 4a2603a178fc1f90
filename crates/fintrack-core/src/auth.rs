//! Credential handling
//!
//! Password hashing (Argon2id, PHC string format) and the input rules for
//! registration and profile updates.

use std::sync::OnceLock;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::FieldError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
///
/// Malformed or unusable hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Collects field errors for a request, in field order
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank value
    pub fn required(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.map(|v| v.trim().is_empty()).unwrap_or(true) {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Require a syntactically valid email address
    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if !value.map(is_valid_email).unwrap_or(false) {
            self.errors
                .push(FieldError::new(field, "Please include a valid email"));
        }
        self
    }

    /// Require a password of at least `MIN_PASSWORD_LEN` characters
    pub fn password(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.map(|v| v.chars().count()).unwrap_or(0) < MIN_PASSWORD_LEN {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Record an arbitrary failure
    pub fn fail(&mut self, field: &str, message: &str) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn finish(&mut self) -> std::result::Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
