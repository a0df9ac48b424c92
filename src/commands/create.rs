use crate::api::TransactionApi;
use crate::args::{CreateArgs, Direction};
use crate::commands::{require_user, Out};
use crate::create::{submit, CreateOutcome, TransactionForm};
use crate::model::Transaction;
use crate::notify::Notifier;
use crate::{Error, ErrorType, Result, Session};
use anyhow::anyhow;

/// Validates the arguments as if they had been typed into the new-transaction form and creates
/// the transaction for the signed-in user.
///
/// # Errors
/// - `ErrorType::Session` if nobody is signed in
/// - `ErrorType::Validation` if the title, amount or category is rejected
/// - `ErrorType::Request` if the service refuses or cannot be reached
pub async fn create(
    api: &dyn TransactionApi,
    session: &Session,
    notifier: &dyn Notifier,
    args: &CreateArgs,
) -> Result<Out<Option<Transaction>>> {
    require_user(session)?;
    let form = TransactionForm::new(
        args.title(),
        args.amount(),
        args.category(),
        args.direction() == Direction::Expense,
    );

    match submit(api, session, notifier, &form).await {
        CreateOutcome::Created(created) => {
            let message = match &created {
                Some(t) => format!("Created '{}' for {}", t.title(), t.amount().signed()),
                None => "Created the transaction".to_string(),
            };
            Ok(Out::new(message, created))
        }
        CreateOutcome::Invalid(e) => Err(Error::new(ErrorType::Validation, anyhow!(e))),
        CreateOutcome::Failed(message) => Err(Error::new(ErrorType::Request, anyhow!(message))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestApi;
    use crate::notify::MemoryNotifier;
    use crate::test::{TestEnv, TEST_USER};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_expense() {
        let env = TestEnv::new().await;
        let session = Session::from_config(&env.config(), None);
        let api = TestApi::empty();
        let notifier = MemoryNotifier::new();
        let args = CreateArgs::new("Lunch", "12.50", "food", Direction::Expense);

        let out = create(&api, &session, &notifier, &args).await.unwrap();
        assert_eq!(out.message(), "Created 'Lunch' for -$12.50");

        let state = api.get_state();
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.transactions[0].user_id(), Some(TEST_USER));
        assert_eq!(state.transactions[0].category(), "Food & Drinks");
        assert_eq!(state.transactions[0].amount().value(), Decimal::new(-1250, 2));
    }

    #[tokio::test]
    async fn test_create_income() {
        let env = TestEnv::new().await;
        let session = Session::from_config(&env.config(), None);
        let api = TestApi::empty();
        let args = CreateArgs::new("Refund", "$1,000", "Income", Direction::Income);
        let out = create(&api, &session, &MemoryNotifier::new(), &args)
            .await
            .unwrap();
        assert_eq!(out.message(), "Created 'Refund' for +$1,000.00");
    }

    #[tokio::test]
    async fn test_create_invalid() {
        let env = TestEnv::new().await;
        let session = Session::from_config(&env.config(), None);
        let api = TestApi::empty();
        let args = CreateArgs::new("Lunch", "-5", "food", Direction::Expense);
        let err = create(&api, &session, &MemoryNotifier::new(), &args)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(err.to_string(), "Please enter a valid amount");
        assert_eq!(api.calls().create, 0);
    }

    #[tokio::test]
    async fn test_create_signed_out() {
        let api = TestApi::empty();
        let args = CreateArgs::new("Lunch", "5", "food", Direction::Expense);
        let err = create(&api, &Session::signed_out(), &MemoryNotifier::new(), &args)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Session);
    }

    #[tokio::test]
    async fn test_create_refused() {
        let env = TestEnv::new().await;
        let session = Session::from_config(&env.config(), None);
        let api = TestApi::empty();
        api.update(|s| s.fail_create = Some(None));
        let args = CreateArgs::new("Lunch", "5", "food", Direction::Expense);
        let err = create(&api, &session, &MemoryNotifier::new(), &args)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
        assert_eq!(err.to_string(), "Failed to create transaction");
    }
}
