//! Advisor orchestration
//!
//! Answers and insights come from the remote advisor when one is configured
//! and reachable. Any remote failure is logged and replaced by the local
//! rules run over the owner's aggregate, so callers always get a usable
//! result unless the store itself fails.

use tracing::{debug, warn};

use crate::ai::{AdvisorBackend, AdvisorClient};
use crate::db::Database;
use crate::error::Result;
use crate::insights::{answer_question, generate_insights};
use crate::models::Transaction;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Local,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub insights: Vec<String>,
    pub source: Source,
}

/// Remote-first advisor with local fallback
pub struct Advisor<'a> {
    db: &'a Database,
    remote: Option<&'a AdvisorClient>,
}

impl<'a> Advisor<'a> {
    pub fn new(db: &'a Database, remote: Option<&'a AdvisorClient>) -> Self {
        Self { db, remote }
    }

    /// Advisor that never leaves the process
    pub fn local(db: &'a Database) -> Self {
        Self::new(db, None)
    }

    /// Answer a question for `user_id`
    pub async fn answer_question(&self, user_id: i64, question: &str) -> Result<Answer> {
        if let Some(remote) = self.remote {
            match remote.ask(user_id, question).await {
                Ok(answer) => {
                    return Ok(Answer {
                        answer,
                        source: Source::Remote,
                    })
                }
                Err(e) => warn!(
                    user_id,
                    host = remote.host(),
                    "Remote advisor failed to answer, using local rules: {}",
                    e
                ),
            }
        }

        let stats = self.db.transaction_stats(user_id)?;
        debug!(user_id, "Answering question locally");
        Ok(Answer {
            answer: answer_question(&stats, question),
            source: Source::Local,
        })
    }

    /// Produce insights for `user_id`
    pub async fn insights(&self, user_id: i64) -> Result<Insights> {
        if let Some(remote) = self.remote {
            match remote.insights(user_id).await {
                Ok(insights) => {
                    return Ok(Insights {
                        insights,
                        source: Source::Remote,
                    })
                }
                Err(e) => warn!(
                    user_id,
                    host = remote.host(),
                    "Remote advisor failed to produce insights, using local rules: {}",
                    e
                ),
            }
        }

        let stats = self.db.transaction_stats(user_id)?;
        Ok(Insights {
            insights: generate_insights(&stats),
            source: Source::Local,
        })
    }

    /// Copy a newly created transaction to the remote advisor
    ///
    /// Best effort: returns whether the advisor accepted it and never fails.
    pub async fn mirror_transaction(&self, tx: &Transaction) -> bool {
        let Some(remote) = self.remote else {
            return false;
        };

        match remote
            .import_transactions(tx.user_id, std::slice::from_ref(tx))
            .await
        {
            Ok(()) => {
                debug!(transaction_id = tx.id, "Mirrored transaction to advisor");
                true
            }
            Err(e) => {
                warn!(
                    transaction_id = tx.id,
                    host = remote.host(),
                    "Failed to mirror transaction to advisor: {}",
                    e
                );
                false
            }
        }
    }
}
