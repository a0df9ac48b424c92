use crate::commands::{require_user, Out};
use crate::model::TransactionId;
use crate::sync::TransactionSync;
use crate::{Error, ErrorType, Result};
use anyhow::anyhow;

/// Deletes the transaction with `id` and reloads the signed-in user's data.
///
/// The id is sent exactly as given; ids are opaque to the client.
///
/// # Errors
/// - `ErrorType::Session` if nobody is signed in
/// - `ErrorType::Request` if the service did not delete the transaction
pub async fn delete(sync: &TransactionSync, id: &str) -> Result<Out<TransactionId>> {
    require_user(sync.session())?;
    let id = TransactionId::from(id);
    if !sync.delete_transaction(&id).await {
        return Err(Error::new(
            ErrorType::Request,
            anyhow!("Failed to delete transaction {id}"),
        ));
    }
    let remaining = sync.transactions().await.len();
    Ok(Out::new(
        format!("Deleted transaction {id}, {remaining} remaining"),
        id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestApi, TestApiState};
    use crate::notify::NotificationKind;
    use crate::test::{TestEnv, TEST_USER};
    use serde_json::json;

    fn api_with(ids: &[&str]) -> TestApi {
        let transactions = ids
            .iter()
            .map(|id| {
                serde_json::from_value(json!({
                    "id": id,
                    "user_id": TEST_USER,
                    "title": "Coffee",
                    "amount": -4.5,
                    "category": "Food & Drinks"
                }))
                .unwrap()
            })
            .collect();
        TestApi::new(TestApiState {
            transactions,
            ..TestApiState::default()
        })
    }

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::new().await;
        let api = api_with(&["a", "b"]);
        let (sync, notifier) = env.sync(&api);

        let out = delete(&sync, "a").await.unwrap();
        assert_eq!(out.message(), "Deleted transaction a, 1 remaining");
        assert_eq!(api.calls().list, 1);
        assert_eq!(
            notifier.notifications()[0].message(),
            "Transaction deleted successfully"
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let env = TestEnv::new().await;
        let api = api_with(&["a"]);
        let (sync, notifier) = env.sync(&api);

        let err = delete(&sync, "zzz").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
        assert_eq!(api.calls().list, 0);
        assert_eq!(notifier.notifications()[0].kind(), NotificationKind::Error);
        assert_eq!(api.get_state().transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_signed_out() {
        let env = TestEnv::signed_out().await;
        let api = api_with(&["a"]);
        let (sync, _) = env.sync(&api);
        let err = delete(&sync, "a").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Session);
        assert_eq!(api.calls().delete, 0);
    }
}
