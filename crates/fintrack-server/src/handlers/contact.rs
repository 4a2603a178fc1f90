//! Contact form

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::{AppError, AppState, JsonBody};
use fintrack_core::auth::Validator;
use fintrack_core::models::{ContactMessage, NewContactMessage};

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub message: String,
}

/// POST /api/contact - Public submission
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    Validator::new()
        .required("name", req.name.as_deref(), "Name is required")
        .email("email", req.email.as_deref())
        .required("subject", req.subject.as_deref(), "Subject is required")
        .required("message", req.message.as_deref(), "Message is required")
        .finish()
        .map_err(AppError::validation)?;

    let id = state.db.insert_contact_message(&NewContactMessage {
        name: req.name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        subject: req.subject.unwrap_or_default(),
        message: req.message.unwrap_or_default(),
    })?;
    info!(id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            id,
            message: "Thank you for your message. We will get back to you soon.".to_string(),
        }),
    ))
}

/// GET /api/contact - All submissions, newest first
pub async fn list_contact_messages(
    State(state): State<Arc<AppState>>,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    Ok(Json(state.db.list_contact_messages()?))
}
