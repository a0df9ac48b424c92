//! The remote transaction service and the ways of talking to it.
//!
//! `TransactionApi` is the seam between the client and the service. `HttpApi` talks to the real
//! service over HTTP. `TestApi` keeps everything in memory and is used when the program runs in
//! test mode.

mod http;
mod test_client;

use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Summary, Transaction, TransactionId};
use crate::Config;
use std::sync::Arc;

pub use http::HttpApi;
pub use test_client::{TestApi, TestApiState};

/// When this environment variable is set and non-empty, the program uses `TestApi` instead of the
/// real service.
pub const TEST_MODE_ENV: &str = "EXPENSE_SYNC_IN_TEST_MODE";

/// The operations offered by the remote transaction service.
#[async_trait::async_trait]
pub trait TransactionApi: Send + Sync {
    /// Lists the transactions owned by `user_id`, in the order the service returns them.
    async fn list_transactions(&self, user_id: &str) -> anyhow::Result<Vec<Transaction>>;

    /// Gets the service-computed aggregate of all of `user_id`'s transactions.
    async fn summary(&self, user_id: &str) -> anyhow::Result<Summary>;

    /// Creates a transaction. Returns the created record when the service sends one back.
    ///
    /// The error's top-level message is suitable for showing to the user.
    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<Transaction>>;

    /// Deletes the transaction identified by `id`.
    async fn delete_transaction(&self, id: &TransactionId) -> anyhow::Result<()>;
}

/// Which implementation of `TransactionApi` the program uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the configured service over HTTP.
    #[default]
    Http,
    /// Use the in-memory `TestApi`.
    Test,
}

impl Mode {
    /// Returns `Mode::Test` if `EXPENSE_SYNC_IN_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the `TransactionApi` for `mode`.
pub fn client(config: &Config, mode: Mode) -> crate::Result<Arc<dyn TransactionApi>> {
    match mode {
        Mode::Http => {
            let api = HttpApi::new(config.api_url().clone(), config.request_timeout())
                .pub_result(ErrorType::Config)?;
            Ok(Arc::new(api))
        }
        Mode::Test => Ok(Arc::new(TestApi::default())),
    }
}
