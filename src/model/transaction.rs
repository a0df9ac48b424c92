use crate::model::{Amount, Category};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The identifier the transaction service assigns to a transaction. It is opaque to the client;
/// some services use strings and others use integer keys, so both are accepted and written back
/// in the same JSON type.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionId::Number(n) => write!(f, "{n}"),
            TransactionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        TransactionId::Text(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        TransactionId::Text(value)
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        TransactionId::Number(value)
    }
}

/// A single transaction as returned by the transaction service.
///
/// Fields the client does not know about are kept in `other_fields` so that a transaction
/// serializes back to exactly what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub(crate) id: TransactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) user_id: Option<String>,
    pub(crate) title: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<String>,
    #[serde(flatten)]
    pub(crate) other_fields: BTreeMap<String, Value>,
}

impl Transaction {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn other_fields(&self) -> &BTreeMap<String, Value> {
        &self.other_fields
    }

    /// The creation date rendered like `Oct 19, 2026`. Falls back to the raw value when it is not
    /// a recognizable date.
    pub fn display_date(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        Some(match parse_date(raw) {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => raw.to_string(),
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// The body of a create request: everything but the `id`, which the service assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub(crate) user_id: String,
    pub(crate) title: String,
    pub(crate) amount: Amount,
    pub(crate) category: Category,
}

impl NewTransaction {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        amount: Amount,
        category: Category,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            amount,
            category,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }
}
