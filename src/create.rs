//! Creating a transaction from what the user typed into the form.
//!
//! Validation happens entirely before anything is sent: a form that fails validation never
//! reaches the transaction service. The user never types a sign; the expense/income toggle
//! decides it.

use crate::api::TransactionApi;
use crate::model::{Amount, Category, NewTransaction, Transaction};
use crate::notify::{Notification, Notifier};
use crate::Session;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{debug, error};

const CREATE_SUCCEEDED: &str = "Transaction created successfully";
const NOT_SIGNED_IN: &str = "You must be signed in to create a transaction";

/// The raw contents of the new-transaction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub is_expense: bool,
}

impl Default for TransactionForm {
    /// An empty form with the toggle on "expense".
    fn default() -> Self {
        Self {
            title: String::new(),
            amount: String::new(),
            category: String::new(),
            is_expense: true,
        }
    }
}

/// The field that stopped a form from being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    Title,
    Amount,
    Category,
}

impl FormError {
    /// The message shown next to the offending field.
    pub fn message(&self) -> &'static str {
        match self {
            FormError::Title => "Please enter a transaction title",
            FormError::Amount => "Please enter a valid amount",
            FormError::Category => "Please select a category",
        }
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FormError {}

/// A form that passed validation: a positive amount and a known category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidForm<'a> {
    title: &'a str,
    amount: Amount,
    category: Category,
    is_expense: bool,
}

impl ValidForm<'_> {
    /// The amount with the sign the toggle asks for.
    pub fn signed_amount(&self) -> Amount {
        if self.is_expense {
            self.amount.expense()
        } else {
            self.amount.income()
        }
    }

    /// The request body for `user_id`.
    pub fn to_new_transaction(&self, user_id: &str) -> NewTransaction {
        NewTransaction::new(user_id, self.title, self.signed_amount(), self.category)
    }
}

impl TransactionForm {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        is_expense: bool,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            category: category.into(),
            is_expense,
        }
    }

    /// Checks the fields in the order they appear on screen and reports the first problem.
    pub fn validate(&self) -> Result<ValidForm<'_>, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Title);
        }

        let amount = match Amount::from_str(&self.amount) {
            Ok(amount) if amount.is_positive() => amount,
            _ => return Err(FormError::Amount),
        };

        if self.category.trim().is_empty() {
            return Err(FormError::Category);
        }
        let category =
            Category::from_label_or_id(&self.category).map_err(|_| FormError::Category)?;

        Ok(ValidForm {
            title: &self.title,
            amount,
            category,
            is_expense: self.is_expense,
        })
    }
}

/// What happened when the form was submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The form was rejected before anything was sent.
    Invalid(FormError),
    /// The service refused or could not be reached. The message has been shown to the user, who
    /// should stay on the form.
    Failed(String),
    /// The transaction exists. The created record is included when the service sent it back.
    Created(Option<Transaction>),
}

impl CreateOutcome {
    /// Whether the front end may leave the form.
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Validates `form` and, if it is valid, creates the transaction for the signed-in user.
///
/// Every outcome is also reported through `notifier`, including validation problems, which are
/// additionally returned so they can be shown next to the field.
pub async fn submit(
    api: &dyn TransactionApi,
    session: &Session,
    notifier: &dyn Notifier,
    form: &TransactionForm,
) -> CreateOutcome {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(e) => {
            debug!("Rejected the transaction form: {e}");
            notifier.notify(Notification::error(e.message()));
            return CreateOutcome::Invalid(e);
        }
    };

    let Some(user_id) = session.user_id() else {
        notifier.notify(Notification::error(NOT_SIGNED_IN));
        return CreateOutcome::Failed(NOT_SIGNED_IN.to_string());
    };

    let body = valid.to_new_transaction(user_id);
    match api.create_transaction(&body).await {
        Ok(created) => {
            notifier.notify(Notification::success(CREATE_SUCCEEDED));
            CreateOutcome::Created(created)
        }
        Err(e) => {
            error!("Error creating transaction: {e:#}");
            let message = e.to_string();
            notifier.notify(Notification::error(&message));
            CreateOutcome::Failed(message)
        }
    }
}
