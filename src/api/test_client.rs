//! Implements the `TransactionApi` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a transaction service.

use crate::api::TransactionApi;
use crate::model::{Amount, NewTransaction, Summary, Transaction, TransactionId};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// The user that owns the seed data.
pub const SEED_USER: &str = "user_seed";

/// Everything the in-memory service knows, plus knobs for making it misbehave.
#[derive(Debug, Default, Clone)]
pub struct TestApiState {
    /// All transactions of all users, newest first.
    pub transactions: Vec<Transaction>,
    /// When true, listing transactions fails.
    pub fail_list: bool,
    /// When true, getting the summary fails.
    pub fail_summary: bool,
    /// When true, deleting fails.
    pub fail_delete: bool,
    /// When `Some`, creating fails. An inner `Some` is the message the service reports.
    pub fail_create: Option<Option<String>>,
    /// Artificial latency added to the list call.
    pub list_delay: Option<Duration>,
    /// Artificial latency added to the summary call.
    pub summary_delay: Option<Duration>,
    /// How many times each operation has been called.
    pub calls: Calls,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub list: usize,
    pub summary: usize,
    pub create: usize,
    pub delete: usize,
}

/// An implementation of the `TransactionApi` trait that keeps its data in memory. Clones share the
/// same data. By default it is seeded with a few transactions owned by `SEED_USER`.
#[derive(Debug, Clone)]
pub struct TestApi {
    state: Arc<Mutex<TestApiState>>,
}

impl TestApi {
    /// Create a new `TestApi` holding `state`.
    pub fn new(state: TestApiState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Create a `TestApi` with no transactions at all.
    pub fn empty() -> Self {
        Self::new(TestApiState::default())
    }

    /// A copy of the current state.
    pub fn get_state(&self) -> TestApiState {
        self.lock().clone()
    }

    /// Changes the state in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut TestApiState),
    {
        f(&mut self.lock())
    }

    pub fn calls(&self) -> Calls {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, TestApiState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for TestApi {
    /// Loads seed data from this module.
    fn default() -> Self {
        let transactions = match load_csv(TRANSACTION_DATA) {
            Ok(transactions) => transactions,
            Err(e) => {
                tracing::error!("Unable to load the seed transactions: {e:#}");
                Vec::new()
            }
        };
        Self::new(TestApiState {
            transactions,
            ..TestApiState::default()
        })
    }
}

#[async_trait::async_trait]
impl TransactionApi for TestApi {
    async fn list_transactions(&self, user_id: &str) -> anyhow::Result<Vec<Transaction>> {
        let delay = {
            let mut state = self.lock();
            state.calls.list += 1;
            state.list_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.lock();
        if state.fail_list {
            bail!("Connection reset while listing transactions");
        }
        Ok(state
            .transactions
            .iter()
            .filter(|t| t.user_id() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn summary(&self, user_id: &str) -> anyhow::Result<Summary> {
        let delay = {
            let mut state = self.lock();
            state.calls.summary += 1;
            state.summary_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.lock();
        if state.fail_summary {
            bail!("Connection reset while fetching the summary");
        }
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for t in state
            .transactions
            .iter()
            .filter(|t| t.user_id() == Some(user_id))
        {
            let value = t.amount().value();
            if value.is_sign_positive() {
                income += value;
            } else {
                expenses += value;
            }
        }
        Ok(Summary::new(
            Amount::new(income + expenses),
            Amount::new(income),
            Amount::new(expenses),
        ))
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<Transaction>> {
        let mut state = self.lock();
        state.calls.create += 1;
        if let Some(reason) = &state.fail_create {
            match reason {
                Some(message) => bail!("{message}"),
                None => bail!("Failed to create transaction"),
            }
        }
        let created = Transaction {
            id: TransactionId::Text(uuid::Uuid::new_v4().to_string()),
            user_id: Some(transaction.user_id().to_string()),
            title: transaction.title().to_string(),
            amount: transaction.amount(),
            category: transaction.category().to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            other_fields: BTreeMap::new(),
        };
        state.transactions.insert(0, created.clone());
        Ok(Some(created))
    }

    async fn delete_transaction(&self, id: &TransactionId) -> anyhow::Result<()> {
        let mut state = self.lock();
        state.calls.delete += 1;
        if state.fail_delete {
            bail!("Failed to delete transaction: the service responded with status 500");
        }
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id() != id);
        if state.transactions.len() == before {
            bail!("Failed to delete transaction: the service responded with status 404");
        }
        Ok(())
    }
}

/// Loads transactions from a CSV-formatted string with the columns
/// `id,user_id,title,amount,category,created_at`.
fn load_csv(csv_data: &str) -> anyhow::Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut transactions = Vec::new();
    for (ix, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Bad seed row {}", ix + 2))?;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        let amount = Amount::from_str(&field(3))
            .with_context(|| format!("Bad amount in seed row {}", ix + 2))?;
        transactions.push(Transaction {
            id: TransactionId::Text(field(0)),
            user_id: Some(field(1)),
            title: field(2),
            amount: Amount::new(amount.value()),
            category: field(4),
            created_at: Some(field(5)),
            other_fields: BTreeMap::new(),
        });
    }
    Ok(transactions)
}

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"id,user_id,title,amount,category,created_at
tx-0006,user_seed,Coffee,-4.50,Food & Drinks,2026-10-18
tx-0005,user_seed,Paycheck,2400.00,Income,2026-10-15
tx-0004,user_seed,Electric Bill,-142.67,Bills,2026-10-14
tx-0003,user_seed,Bus Pass,-75.00,Transportation,2026-10-10
tx-0002,user_seed,Movie Night,-28.00,Entertainment,2026-10-07
tx-0001,user_seed,Running Shoes,-89.99,Shopping,2026-10-03
"##;
