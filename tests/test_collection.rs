mod common;

use chromadesk::domain::error::DomainError;
use chromadesk::domain::ports::collection_backend::BackendError;
use chromadesk::domain::values::query_limit::QueryLimit;
use chromadesk::infrastructure::memory::BackendOp;
use std::collections::HashSet;

fn limit(n: usize) -> QueryLimit {
    QueryLimit::new(n).unwrap()
}

#[tokio::test]
async fn test_operations_before_connect_fail_not_connected() {
    let (desk, backend) = common::setup();

    assert!(desk.store("hello").await.unwrap_err().is_not_connected());
    assert!(desk.query("hello", limit(3)).await.unwrap_err().is_not_connected());
    assert!(desk.list_all().await.unwrap_err().is_not_connected());

    assert_eq!(backend.call_count(BackendOp::Add), 0);
    assert_eq!(backend.call_count(BackendOp::Query), 0);
    assert_eq!(backend.call_count(BackendOp::GetAll), 0);
}

#[tokio::test]
async fn test_empty_store_still_requires_connection() {
    let (desk, _) = common::setup();
    let err = desk.store(Vec::<String>::new()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotConnected(_)));
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let (desk, backend) = common::setup();
    desk.connect().await.unwrap();
    let first = desk.collection().handle().await.unwrap();
    desk.connect().await.unwrap();
    let second = desk.collection().handle().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.collection_count(), 1);
    assert!(desk.collection().is_connected().await);
}

#[tokio::test]
async fn test_connect_failure_leaves_wrapper_unconnected() {
    let (desk, backend) = common::setup();
    backend.fail_next(BackendOp::GetOrCreate, BackendError::transport("connection refused"));

    let err = desk.connect().await.unwrap_err();
    assert!(matches!(err, DomainError::ConnectionFailure { .. }));
    assert!(err.is_transient());
    assert!(!desk.collection().is_connected().await);
    assert!(desk.list_all().await.unwrap_err().is_not_connected());

    // No internal retry: exactly one attempt reached the backend.
    assert_eq!(backend.call_count(BackendOp::GetOrCreate), 1);
}

#[tokio::test]
async fn test_store_then_list_grows_by_n() {
    let (desk, _) = common::connected().await;
    desk.store("seed").await.unwrap();
    let before = desk.list_all().await.unwrap().len();

    let ids = desk.store(["a", "b", "c"]).await.unwrap();
    assert_eq!(ids.len(), 3);

    let all = desk.list_all().await.unwrap();
    assert_eq!(all.len(), before + 3);
    let docs: HashSet<&str> = all.iter().map(|d| d.document.as_str()).collect();
    for expected in ["a", "b", "c"] {
        assert!(docs.contains(expected));
    }
    for id in &ids {
        assert!(all.iter().any(|d| &d.id == id));
    }
}

#[tokio::test]
async fn test_store_assigns_unique_ids() {
    let (desk, _) = common::connected().await;
    let ids = desk.store(vec!["same", "same", "same"]).await.unwrap();
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 3);
}

#[tokio::test]
async fn test_store_does_not_filter_empty_strings() {
    let (desk, _) = common::connected().await;
    desk.store(vec!["", "text"]).await.unwrap();
    let all = desk.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|d| d.document.is_empty()));
}

#[tokio::test]
async fn test_rejected_store_is_rolled_back() {
    let (desk, backend) = common::connected().await;
    desk.store("kept").await.unwrap();
    backend.fail_next(BackendOp::Add, BackendError::status(422, "bad batch"));

    let err = desk.store(vec!["x", "y"]).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreFailure { .. }));
    assert!(!err.is_transient());
    assert_eq!(backend.call_count(BackendOp::Delete), 1);

    let all = desk.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].document, "kept");
}

#[tokio::test]
async fn test_query_respects_limit_and_ordering() {
    let (desk, _) = common::connected().await;
    desk.store(vec![
        "rust ownership and borrowing",
        "rust async runtimes",
        "baking sourdough bread",
        "gardening in spring",
        "rust borrow checker errors",
    ])
    .await
    .unwrap();

    let hits = desk.query("rust borrow checker", limit(3)).await.unwrap();
    assert!(hits.len() <= 3);
    assert!(!hits.is_empty());
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[tokio::test]
async fn test_exact_text_is_nearest() {
    let (desk, _) = common::connected().await;
    desk.store(vec!["alpha beta gamma", "the quick brown fox", "lorem ipsum dolor"])
        .await
        .unwrap();

    let hits = desk.query("the quick brown fox", limit(3)).await.unwrap();
    assert_eq!(hits[0].document, "the quick brown fox");
    let min = hits.iter().map(|h| h.distance).fold(f64::INFINITY, f64::min);
    assert_eq!(hits[0].distance, min);
}

#[tokio::test]
async fn test_query_on_empty_collection_is_empty_not_error() {
    let (desk, _) = common::connected().await;
    let hits = desk.query("nonexistent-unique-token-xyz", limit(5)).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_batch_query_returns_one_list_per_text() {
    let (desk, _) = common::connected().await;
    desk.store(vec!["apples", "oranges"]).await.unwrap();

    let batches = desk
        .collection()
        .query(vec!["apples", "oranges", "pears"], limit(1))
        .await
        .unwrap();
    assert_eq!(batches.len(), 3);
    assert!(batches.iter().all(|b| b.len() == 1));
    assert_eq!(batches[0][0].document, "apples");
    assert_eq!(batches[1][0].document, "oranges");
}

#[tokio::test]
async fn test_remote_failures_map_to_operation_kind() {
    let (desk, backend) = common::connected().await;

    backend.fail_next(BackendOp::Query, BackendError::status(500, "boom"));
    let err = desk.query("x", limit(1)).await.unwrap_err();
    assert!(matches!(err, DomainError::QueryFailure { transient: true, .. }));

    backend.fail_next(BackendOp::GetAll, BackendError::decode("garbage"));
    let err = desk.list_all().await.unwrap_err();
    assert!(matches!(err, DomainError::ListFailure { transient: false, .. }));

    // A failure does not disconnect the wrapper.
    assert!(desk.list_all().await.is_ok());
}

#[tokio::test]
async fn test_heartbeat_needs_no_connection() {
    let (desk, _) = common::setup();
    assert!(desk.heartbeat().await.unwrap() > 0);
}
