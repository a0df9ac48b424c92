//! The client-side view of one user's transactions and summary.
//!
//! `TransactionSync` owns the state a dashboard renders (the transaction list, the summary and a
//! loading flag) and the operations that refresh or mutate it through a `TransactionApi`. None of
//! its operations return errors: read failures are logged and leave the previous values in place,
//! mutation failures are reported through the `Notifier`.
//!
//! Each reload is numbered. When reloads overlap, only the most recently started one writes its
//! results and clears `is_loading`; the results of older reloads are discarded.

use crate::api::TransactionApi;
use crate::model::{Summary, Transaction, TransactionId};
use crate::notify::{Notification, Notifier};
use crate::Session;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, trace};

const DELETE_SUCCEEDED: &str = "Transaction deleted successfully";
const DELETE_FAILED: &str = "Failed to delete transaction";

/// Which parts of the state the most recent reload failed to refresh.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Staleness {
    pub transactions: bool,
    pub summary: bool,
}

impl Staleness {
    pub fn any(&self) -> bool {
        self.transactions || self.summary
    }
}

/// A snapshot of the synchronized state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState {
    is_loading: bool,
    transactions: Vec<Transaction>,
    summary: Summary,
    stale: Staleness,
}

impl Default for SyncState {
    /// Nothing has been loaded yet, so the state starts out loading.
    fn default() -> Self {
        Self {
            is_loading: true,
            transactions: Vec::new(),
            summary: Summary::default(),
            stale: Staleness::default(),
        }
    }
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The user's transactions in the order the service returned them.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn stale(&self) -> Staleness {
        self.stale
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: SyncState,
    /// The number of the most recently started reload.
    generation: u64,
}

/// Keeps one user's transactions and summary in sync with the transaction service.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct TransactionSync {
    api: Arc<dyn TransactionApi>,
    notifier: Arc<dyn Notifier>,
    session: Session,
    inner: Arc<Mutex<Inner>>,
}

impl TransactionSync {
    pub fn new(api: Arc<dyn TransactionApi>, notifier: Arc<dyn Notifier>, session: Session) -> Self {
        Self {
            api,
            notifier,
            session,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A copy of the current state.
    pub async fn state(&self) -> SyncState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.state.is_loading
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().await.state.transactions.clone()
    }

    pub async fn summary(&self) -> Summary {
        self.inner.lock().await.state.summary
    }

    /// Reloads the transaction list and the summary.
    ///
    /// Does nothing when nobody is signed in. Otherwise both fetches run concurrently and
    /// `is_loading` stays true until both have settled. A fetch that fails leaves its part of the
    /// state as it was and marks it stale.
    pub async fn load_data(&self) {
        let Some(user_id) = self.session.user_id() else {
            debug!("Nobody is signed in, not loading transactions");
            return;
        };

        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state.is_loading = true;
            inner.generation
        };
        trace!("Starting reload {generation} for {user_id}");

        let (transactions, summary) = tokio::join!(
            self.api.list_transactions(user_id),
            self.api.summary(user_id)
        );

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(
                "Discarding the results of reload {generation}, reload {} has started since",
                inner.generation
            );
            return;
        }

        match transactions {
            Ok(transactions) => {
                debug!("Loaded {} transactions", transactions.len());
                inner.state.transactions = transactions;
                inner.state.stale.transactions = false;
            }
            Err(e) => {
                error!("Error fetching transactions: {e:#}");
                inner.state.stale.transactions = true;
            }
        }

        match summary {
            Ok(summary) => {
                inner.state.summary = summary;
                inner.state.stale.summary = false;
            }
            Err(e) => {
                error!("Error fetching summary: {e:#}");
                inner.state.stale.summary = true;
            }
        }

        inner.state.is_loading = false;
    }

    /// Deletes a transaction, then reloads everything so that the summary matches the service.
    ///
    /// On failure the state is left alone and an error notification is shown. Returns whether the
    /// transaction was deleted.
    pub async fn delete_transaction(&self, id: &TransactionId) -> bool {
        match self.api.delete_transaction(id).await {
            Ok(()) => {
                debug!("Deleted transaction {id}");
                self.load_data().await;
                self.notifier.notify(Notification::success(DELETE_SUCCEEDED));
                true
            }
            Err(e) => {
                error!("Error deleting transaction {id}: {e:#}");
                self.notifier.notify(Notification::error(DELETE_FAILED));
                false
            }
        }
    }
}
