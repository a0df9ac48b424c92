//! Runs `HttpApi` against a mock transaction service on a local port.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use expense_sync::api::{HttpApi, TransactionApi};
use expense_sync::create::{submit, CreateOutcome, TransactionForm};
use expense_sync::model::TransactionId;
use expense_sync::notify::{MemoryNotifier, NotificationKind};
use expense_sync::{Session, TransactionSync};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

const USER: &str = "user 1";

#[derive(Debug)]
struct Mock {
    transactions: Value,
    summary: Value,
    create_status: StatusCode,
    create_body: Option<Value>,
    delete_status: StatusCode,
    list_users: Vec<String>,
    summary_users: Vec<String>,
    posted: Vec<Value>,
    deleted: Vec<String>,
}

impl Default for Mock {
    fn default() -> Self {
        Self {
            transactions: json!([]),
            summary: json!({"balance": 0, "income": 0, "expenses": 0}),
            create_status: StatusCode::CREATED,
            create_body: None,
            delete_status: StatusCode::OK,
            list_users: Vec::new(),
            summary_users: Vec::new(),
            posted: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<Mock>>;

async fn list(State(mock): State<Shared>, Path(user_id): Path<String>) -> Json<Value> {
    let mut mock = mock.lock().unwrap();
    mock.list_users.push(user_id);
    Json(mock.transactions.clone())
}

async fn summary(State(mock): State<Shared>, Path(user_id): Path<String>) -> Json<Value> {
    let mut mock = mock.lock().unwrap();
    mock.summary_users.push(user_id);
    Json(mock.summary.clone())
}

async fn create(State(mock): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut mock = mock.lock().unwrap();
    mock.posted.push(body);
    match mock.create_body.clone() {
        Some(body) => (mock.create_status, Json(body)).into_response(),
        None => mock.create_status.into_response(),
    }
}

async fn delete(State(mock): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut mock = mock.lock().unwrap();
    mock.deleted.push(id);
    mock.delete_status
}

/// Starts the mock service under `/api` and returns an `HttpApi` pointed at it.
async fn serve(mock: Mock) -> (Shared, HttpApi) {
    let shared = Arc::new(Mutex::new(mock));
    let routes = Router::new()
        .route("/transactions", post(create))
        .route("/transactions/summary/{user_id}", get(summary))
        .route("/transactions/{id}", get(list).delete(delete))
        .with_state(shared.clone());
    let app = Router::new().nest("/api", routes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (shared, api_for(addr))
}

fn api_for(addr: SocketAddr) -> HttpApi {
    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    HttpApi::new(base, Duration::from_secs(5)).unwrap()
}

fn sync(api: HttpApi) -> (TransactionSync, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let sync = TransactionSync::new(Arc::new(api), notifier.clone(), Session::new(USER));
    (sync, notifier)
}

#[tokio::test]
async fn test_load_data_round_trips_exactly() {
    let transactions = json!([
        {"id": "1", "title": "Coffee", "amount": -4.5, "category": "Food & Drinks"},
        {
            "id": 7,
            "user_id": USER,
            "title": "Paycheck",
            "amount": "2400.00",
            "category": "Income",
            "created_at": "2026-10-15T09:30:00.000Z",
            "receipt_url": null
        }
    ]);
    let (mock, api) = serve(Mock {
        transactions: transactions.clone(),
        summary: json!({"balance": 2395.5, "income": 2400, "expenses": -4.5}),
        ..Mock::default()
    })
    .await;
    let (sync, _) = sync(api);

    sync.load_data().await;

    let state = sync.state().await;
    assert!(!state.is_loading());
    assert!(!state.stale().any());
    assert_eq!(serde_json::to_value(state.transactions()).unwrap(), transactions);
    assert_eq!(state.summary().balance().value(), Decimal::new(23955, 1));

    // Path segments arrive decoded, so the space in the user id survived encoding.
    let mock = mock.lock().unwrap();
    assert_eq!(mock.list_users, vec![USER.to_string()]);
    assert_eq!(mock.summary_users, vec![USER.to_string()]);
}

#[tokio::test]
async fn test_float_amounts_come_back_identical() {
    let transactions = json!([
        {"id": 1, "title": "Split bill", "amount": 0.30000000000000004, "category": "Other"},
        {"id": 2, "title": "Parking", "amount": -4.0, "category": "Transportation"},
        {"id": 3, "title": "Lottery", "amount": 1e30, "category": "Income"}
    ]);
    let (_, api) = serve(Mock {
        transactions: transactions.clone(),
        ..Mock::default()
    })
    .await;

    let listed = api.list_transactions(USER).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(serde_json::to_value(&listed).unwrap(), transactions);
    assert_eq!(serde_json::to_string(&listed[1].amount()).unwrap(), "-4.0");
}

#[tokio::test]
async fn test_summary_with_string_values() {
    let (_, api) = serve(Mock {
        summary: json!({"balance": "2395.50", "income": "2400.00", "expenses": "-4.50"}),
        ..Mock::default()
    })
    .await;
    let summary = api.summary(USER).await.unwrap();
    assert_eq!(summary.balance().value(), Decimal::new(239550, 2));
    assert_eq!(summary.income().to_string(), "$2,400.00");
    assert_eq!(summary.expenses().to_string(), "-$4.50");
}

#[tokio::test]
async fn test_create_sends_signed_amount() {
    let (mock, api) = serve(Mock {
        create_body: Some(json!({
            "id": 12,
            "user_id": USER,
            "title": "Lunch",
            "amount": "-12.50",
            "category": "Food & Drinks",
            "created_at": "2026-10-19T12:00:00Z"
        })),
        ..Mock::default()
    })
    .await;
    let notifier = MemoryNotifier::new();
    let session = Session::new(USER);

    let expense = TransactionForm::new("Lunch", "12.50", "Food & Drinks", true);
    let outcome = submit(&api, &session, &notifier, &expense).await;
    let CreateOutcome::Created(Some(created)) = outcome else {
        panic!("expected a created transaction, got {outcome:?}");
    };
    assert_eq!(created.id(), &TransactionId::Number(12));

    let income = TransactionForm::new("Refund", "$12.50", "income", false);
    assert!(submit(&api, &session, &notifier, &income).await.is_created());

    let mock = mock.lock().unwrap();
    assert_eq!(
        mock.posted,
        vec![
            json!({"user_id": USER, "title": "Lunch", "amount": -12.5, "category": "Food & Drinks"}),
            json!({"user_id": USER, "title": "Refund", "amount": 12.5, "category": "Income"}),
        ]
    );
    let notifications = notifier.notifications();
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .all(|n| n.message() == "Transaction created successfully"));
}

#[tokio::test]
async fn test_create_success_without_record() {
    let (_, api) = serve(Mock {
        create_status: StatusCode::OK,
        create_body: Some(json!({"status": "ok"})),
        ..Mock::default()
    })
    .await;
    let form = TransactionForm::new("Lunch", "5", "food", true);
    let outcome = submit(&api, &Session::new(USER), &MemoryNotifier::new(), &form).await;
    assert_eq!(outcome, CreateOutcome::Created(None));
}

#[tokio::test]
async fn test_create_error_message() {
    let (_, api) = serve(Mock {
        create_status: StatusCode::BAD_REQUEST,
        create_body: Some(json!({"error": "Title is too long"})),
        ..Mock::default()
    })
    .await;
    let notifier = MemoryNotifier::new();
    let form = TransactionForm::new("Lunch", "5", "food", true);
    let outcome = submit(&api, &Session::new(USER), &notifier, &form).await;
    assert_eq!(outcome, CreateOutcome::Failed("Title is too long".to_string()));
    assert_eq!(notifier.notifications()[0].kind(), NotificationKind::Error);
    assert_eq!(notifier.notifications()[0].message(), "Title is too long");
}

#[tokio::test]
async fn test_create_error_without_message() {
    let (_, api) = serve(Mock {
        create_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Mock::default()
    })
    .await;
    let form = TransactionForm::new("Lunch", "5", "food", true);
    let outcome = submit(&api, &Session::new(USER), &MemoryNotifier::new(), &form).await;
    assert_eq!(
        outcome,
        CreateOutcome::Failed("Failed to create transaction".to_string())
    );
}

#[tokio::test]
async fn test_delete_reloads_once() {
    let (mock, api) = serve(Mock::default()).await;
    let (sync, notifier) = sync(api);

    assert!(sync.delete_transaction(&TransactionId::from("42")).await);

    {
        let mock = mock.lock().unwrap();
        assert_eq!(mock.deleted, vec!["42".to_string()]);
        assert_eq!(mock.list_users.len(), 1);
        assert_eq!(mock.summary_users.len(), 1);
    }
    assert!(!sync.is_loading().await);
    assert_eq!(
        notifier.notifications()[0].message(),
        "Transaction deleted successfully"
    );
}

#[tokio::test]
async fn test_delete_failure_does_not_reload() {
    let (mock, api) = serve(Mock {
        delete_status: StatusCode::NOT_FOUND,
        ..Mock::default()
    })
    .await;
    let (sync, notifier) = sync(api);

    assert!(!sync.delete_transaction(&TransactionId::Number(42)).await);
    assert!(sync.is_loading().await);

    let mock = mock.lock().unwrap();
    assert_eq!(mock.deleted, vec!["42".to_string()]);
    assert!(mock.list_users.is_empty());
    let notifications = notifier.notifications();
    assert_eq!(notifications[0].kind(), NotificationKind::Error);
    assert_eq!(notifications[0].message(), "Failed to delete transaction");
}

#[tokio::test]
async fn test_unreachable_service() {
    // Grab a free port and close it again so that nothing is listening there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (sync, notifier) = sync(api_for(addr));
    sync.load_data().await;

    let state = sync.state().await;
    assert!(!state.is_loading());
    assert!(state.transactions().is_empty());
    assert!(state.stale().transactions);
    assert!(state.stale().summary);
    assert!(notifier.notifications().is_empty());
}
