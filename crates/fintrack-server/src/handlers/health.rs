//! Health checks

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub database: &'static str,
    pub environment: String,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.db.ping() {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
        timestamp: Utc::now().to_rfc3339(),
        database,
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/health/db - 503 when no working connection can be obtained
pub async fn health_db(State(state): State<Arc<AppState>>) -> Response {
    match state.db.ping() {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "database": "connected",
        }))
        .into_response(),
        Err(e) => {
            warn!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "error",
                    "database": "disconnected",
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/health/echo - Reflect the request back for connectivity debugging
pub async fn health_echo(
    Query(query): Query<BTreeMap<String, String>>,
    request: Request,
) -> Json<EchoResponse> {
    let headers = request
        .headers()
        .iter()
        .filter(|(name, _)| {
            // Never reflect credentials
            !matches!(name.as_str(), "authorization" | "x-auth-token" | "cookie")
        })
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect();

    Json(EchoResponse {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        headers,
        query,
    })
}
