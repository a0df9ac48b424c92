//! `expense list`: the dashboard.
//!
//! Renders the balance card followed by the recent transactions, newest first as the service
//! returns them.

use crate::commands::{require_user, Out};
use crate::model::{Summary, Transaction};
use crate::sync::{Staleness, TransactionSync};
use crate::Result;
use serde::Serialize;
use std::fmt::Write;
use tracing::{debug, warn};

const NO_TRANSACTIONS: &str = "No transactions found";

/// The structured output of `expense list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    summary: Summary,
    transactions: Vec<DashboardRow>,
    stale: Staleness,
}

/// One line in "Recent Transactions".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    id: String,
    title: String,
    category: String,
    amount: String,
    date: Option<String>,
}

impl From<&Transaction> for DashboardRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id().to_string(),
            title: t.title().to_string(),
            category: t.category().to_string(),
            amount: t.amount().signed(),
            date: t.display_date(),
        }
    }
}

impl DashboardRow {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The amount with an explicit sign, e.g. `-$4.50`.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl Dashboard {
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn transactions(&self) -> &[DashboardRow] {
        &self.transactions
    }

    pub fn stale(&self) -> Staleness {
        self.stale
    }

    /// The text shown to the user. The summary is shown exactly as the service computed it, so
    /// `expenses` keeps whatever sign the service gave it.
    pub fn render(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Total Balance: {}", self.summary.balance());
        let _ = writeln!(s, "Income: {}", self.summary.income());
        let _ = writeln!(s, "Expenses: {}", self.summary.expenses());
        let _ = writeln!(s);
        let _ = write!(s, "Recent Transactions");
        if self.transactions.is_empty() {
            let _ = write!(s, "\n{NO_TRANSACTIONS}");
            return s;
        }
        for row in &self.transactions {
            let _ = write!(s, "\n  {} ({}) {}", row.title, row.category, row.amount);
            if let Some(date) = &row.date {
                let _ = write!(s, "  {date}");
            }
        }
        s
    }
}

/// Loads the signed-in user's transactions and summary and renders them.
///
/// Failing to reach the service is not an error here: whatever could not be refreshed is shown
/// as it was (empty on a fresh start) and a warning is logged.
pub async fn list(sync: &TransactionSync, limit: Option<usize>) -> Result<Out<Dashboard>> {
    require_user(sync.session())?;
    sync.load_data().await;
    let state = sync.state().await;

    if state.stale().transactions {
        warn!("Unable to refresh the transactions, they may be out of date");
    }
    if state.stale().summary {
        warn!("Unable to refresh the balance, it may be out of date");
    }

    let transactions: Vec<DashboardRow> = state
        .transactions()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(DashboardRow::from)
        .collect();
    debug!(
        "Showing {} of {} transactions",
        transactions.len(),
        state.transactions().len()
    );

    let dashboard = Dashboard {
        summary: *state.summary(),
        transactions,
        stale: state.stale(),
    };
    Ok(Out::new(dashboard.render(), dashboard))
}
