//! Registration, login and the current-user endpoint

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{issue_session_token, AuthUser};
use crate::{AppError, AppState, JsonBody};
use fintrack_core::auth::{hash_password, verify_password, Validator};
use fintrack_core::models::User;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn session(state: &AppState, user_id: i64) -> Result<Json<TokenResponse>, AppError> {
    let token = issue_session_token(&state.config.jwt_secret, user_id)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Validator::new()
        .required("name", req.name.as_deref(), "Name is required")
        .email("email", req.email.as_deref())
        .password(
            "password",
            req.password.as_deref(),
            "Please enter a password with 6 or more characters",
        )
        .finish()
        .map_err(AppError::validation)?;

    let (name, email, password) = (
        req.name.unwrap_or_default(),
        req.email.unwrap_or_default(),
        req.password.unwrap_or_default(),
    );

    if state.db.get_user_by_email(&email)?.is_some() {
        return Err(AppError::bad_request("User already exists"));
    }

    let hash = hash_password(&password)?;
    let user = state
        .db
        .create_user(&name, &email, &hash)
        .map_err(AppError::from_core)?;

    info!(user_id = user.id, "Registered new user");
    session(&state, user.id)
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Validator::new()
        .email("email", req.email.as_deref())
        .required("password", req.password.as_deref(), "Password is required")
        .finish()
        .map_err(AppError::validation)?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(user) = state.db.get_user_by_email(&email)? else {
        return Err(AppError::bad_request("Invalid credentials"));
    };
    if !verify_password(&password, &user.password_hash) {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    session(&state, user.id)
}

/// GET /api/auth/me - The authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    state
        .db
        .get_user(auth.id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}
