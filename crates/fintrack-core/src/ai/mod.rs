//! Remote advisor abstraction
//!
//! The remote advisor is an optional HTTP analytics service that answers
//! free-text questions and produces insights for a user. It is best effort:
//! callers treat every error as "unavailable" and fall back to the local
//! rules in [`crate::insights`].
//!
//! # Architecture
//!
//! - `AdvisorBackend` trait: the operations the service offers
//! - `AdvisorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `RemoteAdvisor` (HTTP), `MockAdvisor`
//!
//! # Configuration
//!
//! Environment variables, read once at startup:
//! - `FINTRACK_ADVISOR_URL`: base URL of the service. Unset disables the advisor.
//! - `FINTRACK_ADVISOR_TIMEOUT_SECS`: per-request timeout (default: 10)

mod mock;
mod remote;
pub mod types;

pub use mock::MockAdvisor;
pub use remote::RemoteAdvisor;
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Transaction;

pub const ADVISOR_URL_ENV: &str = "FINTRACK_ADVISOR_URL";
pub const ADVISOR_TIMEOUT_ENV: &str = "FINTRACK_ADVISOR_TIMEOUT_SECS";
pub const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 10;

/// Where the remote advisor lives and how long to wait for it
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl AdvisorConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_ADVISOR_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the advisor configuration from the environment
    ///
    /// Returns None when `FINTRACK_ADVISOR_URL` is unset or blank. An
    /// unparseable timeout falls back to the default.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ADVISOR_URL_ENV).ok()?;
        if url.trim().is_empty() {
            return None;
        }

        let timeout = match std::env::var(ADVISOR_TIMEOUT_ENV) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid {}, using {}s",
                        ADVISOR_TIMEOUT_ENV,
                        DEFAULT_ADVISOR_TIMEOUT_SECS
                    );
                    DEFAULT_ADVISOR_TIMEOUT_SECS
                }
            },
            Err(_) => DEFAULT_ADVISOR_TIMEOUT_SECS,
        };

        Some(Self::new(url.trim()).with_timeout(Duration::from_secs(timeout)))
    }
}

/// Operations offered by a remote advisor
///
/// Every failure is reported as `Error::AdvisorUnavailable`.
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Answer a free-text question for a user
    async fn ask(&self, user_id: i64, question: &str) -> Result<String>;

    /// Produce insights for a user
    async fn insights(&self, user_id: i64) -> Result<Vec<String>>;

    /// Mirror transactions into the advisor's own store
    async fn import_transactions(&self, user_id: i64, transactions: &[Transaction]) -> Result<()>;

    /// Check if the advisor is reachable
    async fn health_check(&self) -> bool;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete advisor client enum
#[derive(Clone)]
pub enum AdvisorClient {
    /// HTTP advisor service
    Remote(RemoteAdvisor),
    /// In-process mock for testing
    Mock(MockAdvisor),
}

impl AdvisorClient {
    /// Create an advisor client from environment variables
    ///
    /// Returns None if no advisor is configured or the HTTP client cannot be
    /// built.
    pub fn from_env() -> Option<Self> {
        let config = AdvisorConfig::from_env()?;
        match RemoteAdvisor::new(config) {
            Ok(remote) => Some(AdvisorClient::Remote(remote)),
            Err(e) => {
                tracing::warn!("Remote advisor disabled: {}", e);
                None
            }
        }
    }

    /// Create a remote advisor client
    pub fn remote(config: AdvisorConfig) -> Result<Self> {
        Ok(AdvisorClient::Remote(RemoteAdvisor::new(config)?))
    }

    /// Create a healthy mock advisor for testing
    pub fn mock() -> Self {
        AdvisorClient::Mock(MockAdvisor::new())
    }
}

#[async_trait]
impl AdvisorBackend for AdvisorClient {
    async fn ask(&self, user_id: i64, question: &str) -> Result<String> {
        match self {
            AdvisorClient::Remote(b) => b.ask(user_id, question).await,
            AdvisorClient::Mock(b) => b.ask(user_id, question).await,
        }
    }

    async fn insights(&self, user_id: i64) -> Result<Vec<String>> {
        match self {
            AdvisorClient::Remote(b) => b.insights(user_id).await,
            AdvisorClient::Mock(b) => b.insights(user_id).await,
        }
    }

    async fn import_transactions(&self, user_id: i64, transactions: &[Transaction]) -> Result<()> {
        match self {
            AdvisorClient::Remote(b) => b.import_transactions(user_id, transactions).await,
            AdvisorClient::Mock(b) => b.import_transactions(user_id, transactions).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdvisorClient::Remote(b) => b.health_check().await,
            AdvisorClient::Mock(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            AdvisorClient::Remote(b) => b.host(),
            AdvisorClient::Mock(b) => b.host(),
        }
    }
}
