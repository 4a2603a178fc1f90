//! Test utilities for fintrack-core
//!
//! A mock remote advisor served over real HTTP, so the `RemoteAdvisor`
//! client and the server's fallback paths can be exercised end to end.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::sync::oneshot;

use crate::ai::{AskRequest, AskResponse, ImportRequest, InsightsResponse};

/// How the mock server responds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Well-formed responses
    Normal,
    /// 500 on every route
    Failing,
    /// 200 with a body that is not the expected JSON
    Garbage,
    /// Well-formed responses after a delay
    Slow(Duration),
}

#[derive(Clone)]
struct MockState {
    behavior: MockBehavior,
    imports: Arc<Mutex<Vec<ImportRequest>>>,
}

/// Mock remote advisor for testing and development
pub struct MockAdvisorServer {
    addr: SocketAddr,
    imports: Arc<Mutex<Vec<ImportRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAdvisorServer {
    /// Start a well-behaved mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockBehavior::Normal).await
    }

    /// Start the mock server with a specific behavior
    pub async fn start_with(behavior: MockBehavior) -> Self {
        let imports = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            behavior,
            imports: imports.clone(),
        };

        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/ai/ask", post(handle_ask))
            .route("/ai/insights", get(handle_insights))
            .route("/transactions/import", post(handle_import))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            imports,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Import requests received so far
    pub fn imports(&self) -> Vec<ImportRequest> {
        self.imports.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAdvisorServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Apply the configured failure mode, if any
async fn misbehave(behavior: MockBehavior) -> Option<Response> {
    match behavior {
        MockBehavior::Normal => None,
        MockBehavior::Failing => {
            Some((StatusCode::INTERNAL_SERVER_ERROR, "advisor exploded").into_response())
        }
        MockBehavior::Garbage => Some((StatusCode::OK, "<html>not json</html>").into_response()),
        MockBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            None
        }
    }
}

async fn handle_health(State(state): State<MockState>) -> Response {
    if let Some(response) = misbehave(state.behavior).await {
        return response;
    }
    (StatusCode::OK, "ok").into_response()
}

async fn handle_ask(State(state): State<MockState>, Json(request): Json<AskRequest>) -> Response {
    if let Some(response) = misbehave(state.behavior).await {
        return response;
    }
    Json(AskResponse {
        answer: format!(
            "Remote answer for user {}: {}",
            request.user_id, request.question
        ),
    })
    .into_response()
}

#[derive(Deserialize)]
struct InsightsQuery {
    user_id: i64,
}

async fn handle_insights(
    State(state): State<MockState>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    if let Some(response) = misbehave(state.behavior).await {
        return response;
    }
    Json(InsightsResponse {
        insights: vec![format!("Remote insight for user {}", query.user_id)],
    })
    .into_response()
}

async fn handle_import(
    State(state): State<MockState>,
    Json(request): Json<ImportRequest>,
) -> Response {
    if let Some(response) = misbehave(state.behavior).await {
        return response;
    }
    state.imports.lock().unwrap().push(request);
    (StatusCode::CREATED, Json(serde_json::json!({ "imported": true }))).into_response()
}
