//! Mock advisor for testing
//!
//! Predictable answers without a running service. An unhealthy mock fails
//! every call the way an unreachable remote advisor would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Transaction;

use super::AdvisorBackend;

#[derive(Clone, Default)]
pub struct MockAdvisor {
    /// Whether calls succeed
    pub healthy: bool,
    imported: Arc<AtomicUsize>,
}

impl MockAdvisor {
    /// Create a new mock advisor (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            imported: Arc::default(),
        }
    }

    /// Create a mock advisor whose every call fails
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            imported: Arc::default(),
        }
    }

    /// Number of transactions accepted through `import_transactions`
    ///
    /// Shared between clones.
    pub fn imported_count(&self) -> usize {
        self.imported.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(Error::AdvisorUnavailable("mock advisor is unhealthy".into()))
        }
    }
}

#[async_trait]
impl AdvisorBackend for MockAdvisor {
    async fn ask(&self, _user_id: i64, question: &str) -> Result<String> {
        self.check()?;
        Ok(format!("Mock answer: {}", question.trim()))
    }

    async fn insights(&self, user_id: i64) -> Result<Vec<String>> {
        self.check()?;
        Ok(vec![format!("Mock insight for user {}", user_id)])
    }

    async fn import_transactions(&self, _user_id: i64, transactions: &[Transaction]) -> Result<()> {
        self.check()?;
        self.imported.fetch_add(transactions.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
