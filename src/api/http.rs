//! Implements the `TransactionApi` trait over HTTP+JSON using `reqwest`.

use crate::api::TransactionApi;
use crate::model::{NewTransaction, Summary, Transaction, TransactionId};
use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const TRANSACTIONS: &str = "transactions";
const SUMMARY: &str = "summary";
const CREATE_FAILED: &str = "Failed to create transaction";
const DELETE_FAILED: &str = "Failed to delete transaction";

/// Talks to the transaction service rooted at `base`. The base URL may carry a path prefix, e.g.
/// `https://example.com/api`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

/// The body the service sends along with a failed mutation.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpApi {
    pub fn new(base: Url, timeout: Duration) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            bail!("The API URL '{base}' cannot be used as a base URL");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Unable to build the HTTP client")?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the base URL, percent-encoding each of them.
    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("The API URL '{}' cannot be used as a base URL", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET and parses a successful response as `T`. Non-2xx responses are errors.
    async fn get_json<T>(&self, url: Url) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("GET {url} failed with status {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Unable to parse the response from {url}"))
    }
}

#[async_trait::async_trait]
impl TransactionApi for HttpApi {
    async fn list_transactions(&self, user_id: &str) -> anyhow::Result<Vec<Transaction>> {
        let url = self.endpoint(&[TRANSACTIONS, user_id])?;
        let transactions: Vec<Transaction> = self.get_json(url).await?;
        debug!("Received {} transactions", transactions.len());
        Ok(transactions)
    }

    async fn summary(&self, user_id: &str) -> anyhow::Result<Summary> {
        let url = self.endpoint(&[TRANSACTIONS, SUMMARY, user_id])?;
        self.get_json(url).await
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<Transaction>> {
        let url = self.endpoint(&[TRANSACTIONS])?;
        trace!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(transaction)
            .send()
            .await
            .context(CREATE_FAILED)?;

        let status = response.status();
        if !status.is_success() {
            // The service explains itself with `{"error": "..."}` when it can.
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { error: Some(error) }) if !error.trim().is_empty() => error,
                _ => CREATE_FAILED.to_string(),
            };
            debug!("Create failed with status {status}: {message}");
            bail!("{message}");
        }

        // A success body may be the created record or just a status, both are fine.
        let body = response.text().await.context(CREATE_FAILED)?;
        match serde_json::from_str::<Transaction>(&body) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                debug!("Create response is not a transaction: {e}");
                Ok(None)
            }
        }
    }

    async fn delete_transaction(&self, id: &TransactionId) -> anyhow::Result<()> {
        let url = self.endpoint(&[TRANSACTIONS, &id.to_string()])?;
        trace!("DELETE {url}");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context(DELETE_FAILED)?;

        let status = response.status();
        if !status.is_success() {
            bail!("{DELETE_FAILED}: the service responded with status {status}");
        }
        Ok(())
    }
}
