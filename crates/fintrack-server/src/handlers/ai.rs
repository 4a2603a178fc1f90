//! Question answering and insights

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthUser;
use crate::{AppError, AppState, JsonBody};
use fintrack_core::models::FieldError;

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

/// POST /api/ai/ask (also /api/questions)
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Result<JsonBody<AskRequest>, AppError>,
) -> Result<Json<AskResponse>, AppError> {
    // A missing, malformed or non-string question all read as no question
    let req = body.map(|JsonBody(req)| req).unwrap_or_default();
    let question = req
        .question
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if question.is_empty() {
        return Err(AppError::validation(vec![FieldError::new(
            "question",
            "Question is required",
        )]));
    }

    let answer = state.advisor().answer_question(auth.id, question).await?;
    debug!(user_id = auth.id, source = answer.source.as_str(), "Answered question");

    Ok(Json(AskResponse {
        answer: answer.answer,
    }))
}

/// GET /api/ai/insights (also /api/insights)
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<InsightsResponse>, AppError> {
    let insights = state.advisor().insights(auth.id).await?;
    debug!(
        user_id = auth.id,
        source = insights.source.as_str(),
        count = insights.insights.len(),
        "Produced insights"
    );

    Ok(Json(InsightsResponse {
        insights: insights.insights,
    }))
}
