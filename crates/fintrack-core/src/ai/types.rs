//! Wire types for the remote advisor protocol

use serde::{Deserialize, Serialize};

use crate::models::{Category, Transaction};

/// `POST /ai/ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub user_id: i64,
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// `GET /ai/insights?user_id=`
#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

/// `POST /transactions/import`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub user_id: i64,
    pub transactions: Vec<ImportedTransaction>,
}

/// A transaction as the advisor sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedTransaction {
    pub name: String,
    pub amount: f64,
    /// RFC 3339
    pub date: String,
    pub category: Category,
    pub notes: Option<String>,
}

impl From<&Transaction> for ImportedTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            name: tx.name.clone(),
            amount: tx.amount,
            date: tx.date.to_rfc3339(),
            category: tx.category,
            notes: tx.notes.clone(),
        }
    }
}
