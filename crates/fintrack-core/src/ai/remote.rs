//! HTTP remote advisor

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

use super::types::{AskRequest, AskResponse, ImportRequest, ImportedTransaction, InsightsResponse};
use super::{AdvisorBackend, AdvisorConfig};

/// Advisor reached over HTTP/JSON
///
/// Every request carries the configured timeout, so a hung service delays a
/// caller by at most that long before the local fallback takes over.
#[derive(Clone)]
pub struct RemoteAdvisor {
    http_client: Client,
    config: AdvisorConfig,
}

impl RemoteAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

fn unavailable(e: impl std::fmt::Display) -> Error {
    Error::AdvisorUnavailable(e.to_string())
}

/// Reject non-2xx responses and decode the body
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::AdvisorUnavailable(format!(
            "{} returned {}",
            response.url(),
            status
        )));
    }
    response.json::<T>().await.map_err(unavailable)
}

#[async_trait]
impl AdvisorBackend for RemoteAdvisor {
    async fn ask(&self, user_id: i64, question: &str) -> Result<String> {
        let request = AskRequest {
            user_id,
            question: question.to_string(),
        };

        let response = self
            .http_client
            .post(self.url("/ai/ask"))
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;

        let body: AskResponse = decode(response).await?;
        debug!("Advisor answer: {}", body.answer);

        if body.answer.trim().is_empty() {
            return Err(Error::AdvisorUnavailable("empty answer".into()));
        }
        Ok(body.answer)
    }

    async fn insights(&self, user_id: i64) -> Result<Vec<String>> {
        let response = self
            .http_client
            .get(self.url("/ai/insights"))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .map_err(unavailable)?;

        let body: InsightsResponse = decode(response).await?;
        debug!("Advisor returned {} insights", body.insights.len());

        if body.insights.is_empty() {
            return Err(Error::AdvisorUnavailable("no insights returned".into()));
        }
        Ok(body.insights)
    }

    async fn import_transactions(&self, user_id: i64, transactions: &[Transaction]) -> Result<()> {
        let request = ImportRequest {
            user_id,
            transactions: transactions.iter().map(ImportedTransaction::from).collect(),
        };

        let response = self
            .http_client
            .post(self.url("/transactions/import"))
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::AdvisorUnavailable(format!(
                "import returned {}",
                status
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self.http_client.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn host(&self) -> &str {
        &self.config.base_url
    }
}
