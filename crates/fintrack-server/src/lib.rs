//! Fintrack Web Server
//!
//! Axum-based REST API for the Fintrack personal finance backend.
//!
//! Security features:
//! - JWT session authentication (secure by default, use --no-auth for local dev)
//! - Owner checks on every transaction
//! - Restrictive CORS policy
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use fintrack_core::ai::{AdvisorBackend, AdvisorClient};
use fintrack_core::db::Database;
use fintrack_core::models::FieldError;
use fintrack_core::Advisor;

pub mod auth;
mod handlers;

pub use auth::{AuthUser, Claims};

/// Secret used to sign session and reset tokens
pub const JWT_SECRET_ENV: &str = "FINTRACK_JWT_SECRET";

/// Comma-separated list of allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "FINTRACK_ALLOWED_ORIGINS";

/// Deployment environment reported by the health endpoint
pub const ENVIRONMENT_ENV: &str = "FINTRACK_ENV";

/// Alternative header carrying a session token
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Routes reachable without a session
const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("POST", "/api/auth/register"),
    ("POST", "/api/auth/login"),
    ("POST", "/api/users/forgot-password"),
    ("POST", "/api/users/reset-password"),
    ("POST", "/api/contact"),
    ("GET", "/api/health"),
    ("GET", "/api/health/db"),
    ("GET", "/api/health/echo"),
];

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Deployment environment name (development, production, ...)
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            jwt_secret: String::new(),
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from environment variables
    pub fn from_env(require_auth: bool) -> Self {
        Self {
            require_auth,
            allowed_origins: std::env::var(ALLOWED_ORIGINS_ENV)
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or_default(),
            jwt_secret: std::env::var(JWT_SECRET_ENV).unwrap_or_default(),
            environment: std::env::var(ENVIRONMENT_ENV)
                .ok()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Parse a comma-separated list of CORS origins
pub fn parse_allowed_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub advisor: Option<AdvisorClient>,
}

impl AppState {
    /// Remote-first advisor bound to this state's store
    pub fn advisor(&self) -> Advisor<'_> {
        Advisor::new(&self.db, self.advisor.as_ref())
    }
}

fn is_public(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| *m == method.as_str() && *p == path.trim_end_matches('/'))
}

/// Pull a session token from `Authorization: Bearer` or `x-auth-token`
fn extract_token(request: &Request) -> Option<&str> {
    let headers = request.headers();
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .or_else(|| headers.get(AUTH_TOKEN_HEADER).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware - validates the session token and attaches the owner
///
/// With authentication disabled every request acts as the single local
/// development user.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    if !state.config.require_auth {
        return match state.db.ensure_local_user() {
            Ok(user) => {
                request.extensions_mut().insert(AuthUser { id: user.id });
                next.run(request).await
            }
            Err(e) => AppError::from(e).into_response(),
        };
    }

    let Some(token) = extract_token(&request) else {
        warn!(path = %request.uri().path(), "Unauthorized request - no token");
        return AppError::unauthorized("No token, authorization denied").into_response();
    };

    match auth::verify_session_token(&state.config.jwt_secret, token) {
        Some(user_id) => {
            request.extensions_mut().insert(AuthUser { id: user_id });
            next.run(request).await
        }
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - invalid token");
            AppError::unauthorized("Token is not valid").into_response()
        }
    }
}

/// Message-only response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// JSON request body that never rejects with 415/422
///
/// An empty body (or one with no content type) deserializes as `T::default()`.
/// Anything that is not valid JSON for `T` becomes a 400 field error on `body`,
/// so clients always see the same `{"errors": [...]}` shape.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::bad_request("Request body could not be read"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!(error = %e, "Rejected request body");
            AppError::validation(vec![FieldError::new(
                "body",
                "Request body must be valid JSON",
            )])
        })
    }
}

/// Create the application router
pub fn create_router_with_advisor(
    db: Database,
    config: ServerConfig,
    advisor: Option<AdvisorClient>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        advisor,
    });

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::get_me))
        // Users
        .route(
            "/users/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/users/settings", put(handlers::update_settings))
        .route("/users/password", put(handlers::change_password))
        .route("/users/forgot-password", post(handlers::forgot_password))
        .route("/users/reset-password", post(handlers::reset_password))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/stats", get(handlers::transaction_stats))
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // Advisor
        .route("/ai/ask", post(handlers::ask_question))
        .route("/questions", post(handlers::ask_question))
        .route("/ai/insights", get(handlers::get_insights))
        .route("/insights", get(handlers::get_insights))
        // Contact
        .route(
            "/contact",
            get(handlers::list_contact_messages).post(handlers::submit_contact),
        )
        // Health
        .route("/health", get(handlers::health))
        .route("/health/db", get(handlers::health_db))
        .route("/health/echo", get(handlers::health_echo));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static(AUTH_TOKEN_HEADER),
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.require_auth && config.jwt_secret.trim().is_empty() {
        anyhow::bail!(
            "{} must be set when authentication is enabled (or pass --no-auth)",
            JWT_SECRET_ENV
        );
    }
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    }

    info!(database = db.path(), "Opening store");
    let advisor = AdvisorClient::from_env();
    check_advisor_connection(advisor.as_ref()).await;

    let app = create_router_with_advisor(db, config, advisor);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log remote advisor status
async fn check_advisor_connection(advisor: Option<&AdvisorClient>) {
    match advisor {
        Some(client) => {
            if client.health_check().await {
                info!("✅ Remote advisor connected: {}", client.host());
            } else {
                warn!(
                    "⚠️  Remote advisor configured but not responding: {} (local fallback active)",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  Remote advisor not configured (set FINTRACK_ADVISOR_URL to enable)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    errors: Option<Vec<FieldError>>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            errors: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 400 with per-field detail
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            errors: Some(errors),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Map a core error, keeping validation and not-found detail
    pub fn from_core(err: fintrack_core::Error) -> Self {
        match err {
            fintrack_core::Error::Validation { field, message } => {
                Self::validation(vec![FieldError::new(&field, &message)])
            }
            fintrack_core::Error::NotFound(what) => Self::not_found(&format!("{} not found", what)),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.errors {
            Some(errors) => Json(serde_json::json!({ "errors": errors })),
            None => Json(serde_json::json!({ "error": self.message })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            errors: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
