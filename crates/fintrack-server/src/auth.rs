//! Session and password-reset tokens
//!
//! Both are HS256 JWTs signed with the server secret. Reset tokens carry a
//! `purpose` claim so they can never be used as a session.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session lifetime
pub const SESSION_TOKEN_DAYS: i64 = 7;

/// Password reset token lifetime
pub const RESET_TOKEN_HOURS: i64 = 1;

const RESET_PURPOSE: &str = "password-reset";

/// The authenticated owner of a request, attached by the auth middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

fn sign(secret: &str, claims: &Claims) -> jsonwebtoken::errors::Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Issue a session token for a user
pub fn issue_session_token(secret: &str, user_id: i64) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        id: user_id,
        exp: (Utc::now() + Duration::days(SESSION_TOKEN_DAYS)).timestamp(),
        purpose: None,
    };
    sign(secret, &claims)
}

/// Issue a short-lived password reset token
pub fn issue_reset_token(secret: &str, user_id: i64) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        id: user_id,
        exp: (Utc::now() + Duration::hours(RESET_TOKEN_HOURS)).timestamp(),
        purpose: Some(RESET_PURPOSE.to_string()),
    };
    sign(secret, &claims)
}

/// User id of a valid, unexpired session token
pub fn verify_session_token(secret: &str, token: &str) -> Option<i64> {
    verify(secret, token)
        .filter(|c| c.purpose.is_none())
        .map(|c| c.id)
}

/// User id of a valid, unexpired reset token
pub fn verify_reset_token(secret: &str, token: &str) -> Option<i64> {
    verify(secret, token)
        .filter(|c| c.purpose.as_deref() == Some(RESET_PURPOSE))
        .map(|c| c.id)
}
