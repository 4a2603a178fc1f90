//! Profile, settings and password handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{issue_reset_token, verify_reset_token, AuthUser};
use crate::{AppError, AppState, JsonBody, MessageResponse};
use fintrack_core::auth::{hash_password, verify_password, Validator};
use fintrack_core::models::{PreferencesPatch, User, UserPreferences};

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Only returned outside production, where no mail delivery exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

fn current_user(state: &AppState, auth: AuthUser) -> Result<User, AppError> {
    state
        .db
        .get_user(auth.id)?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    current_user(&state, auth).map(Json)
}

/// PUT /api/users/profile - Update name and email
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<ProfileRequest>,
) -> Result<Json<User>, AppError> {
    Validator::new()
        .required("name", req.name.as_deref(), "Name is required")
        .email("email", req.email.as_deref())
        .finish()
        .map_err(AppError::validation)?;

    let name = req.name.unwrap_or_default();
    let email = req.email.unwrap_or_default();

    state
        .db
        .update_user_profile(auth.id, &name, &email)
        .map_err(AppError::from_core)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// PUT /api/users/settings - Patch preferences
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(patch): JsonBody<PreferencesPatch>,
) -> Result<Json<UserPreferences>, AppError> {
    let user = state
        .db
        .update_user_preferences(auth.id, &patch)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.preferences))
}

/// PUT /api/users/password - Change password, given the current one
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    Validator::new()
        .required(
            "currentPassword",
            req.current_password.as_deref(),
            "Current password is required",
        )
        .password(
            "newPassword",
            req.new_password.as_deref(),
            "Please enter a new password with 6 or more characters",
        )
        .finish()
        .map_err(AppError::validation)?;

    let user = current_user(&state, auth)?;
    let current = req.current_password.unwrap_or_default();
    if !verify_password(&current, &user.password_hash) {
        return Err(AppError::bad_request("Current password is incorrect"));
    }

    let hash = hash_password(&req.new_password.unwrap_or_default())?;
    state.db.update_user_password(user.id, &hash)?;
    info!(user_id = user.id, "Password changed");

    Ok(MessageResponse::new("Password updated successfully"))
}

/// POST /api/users/forgot-password - Issue a one-hour reset token
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    Validator::new()
        .email("email", req.email.as_deref())
        .finish()
        .map_err(AppError::validation)?;

    let email = req.email.unwrap_or_default();
    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let token = issue_reset_token(&state.config.jwt_secret, user.id)?;
    info!(user_id = user.id, "Issued password reset token");

    Ok(Json(ForgotPasswordResponse {
        message: "Password reset token issued".to_string(),
        reset_token: (!state.config.is_production()).then_some(token),
    }))
}

/// POST /api/users/reset-password - Set a new password with a reset token
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    Validator::new()
        .required("token", req.token.as_deref(), "Token is required")
        .password(
            "password",
            req.password.as_deref(),
            "Please enter a password with 6 or more characters",
        )
        .finish()
        .map_err(AppError::validation)?;

    let token = req.token.unwrap_or_default();
    let user_id = verify_reset_token(&state.config.jwt_secret, token.trim())
        .ok_or_else(|| AppError::bad_request("Invalid or expired token"))?;

    let hash = hash_password(&req.password.unwrap_or_default())?;
    if !state.db.update_user_password(user_id, &hash)? {
        return Err(AppError::bad_request("Invalid or expired token"));
    }
    info!(user_id, "Password reset");

    Ok(MessageResponse::new("Password has been reset"))
}
