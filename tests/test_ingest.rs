mod common;

use chromadesk::domain::error::DomainError;
use chromadesk::domain::values::upload_format::UploadFormat;
use chromadesk::infrastructure::memory::BackendOp;
use std::io::Write;

#[tokio::test]
async fn test_text_upload_one_document_per_line() {
    let (desk, _) = common::connected().await;
    let count = desk
        .ingest("first line\n\n  second line  \nthird line\n", UploadFormat::Text)
        .await
        .unwrap();
    assert_eq!(count, 3);

    let docs: Vec<String> = desk.list_all().await.unwrap().into_iter().map(|d| d.document).collect();
    assert_eq!(docs, vec!["first line", "second line", "third line"]);
}

#[tokio::test]
async fn test_json_array_upload() {
    let (desk, _) = common::connected().await;
    let count = desk.ingest(r#"["one", "two", 3]"#, UploadFormat::Json).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(desk.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_json_object_rejected_before_store() {
    let (desk, backend) = common::connected().await;
    let err = desk
        .ingest(r#"{"not": "a list"}"#, UploadFormat::Json)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert_eq!(backend.call_count(BackendOp::Add), 0);
}

#[tokio::test]
async fn test_blank_upload_rejected_before_store() {
    let (desk, backend) = common::connected().await;
    let err = desk.ingest("\n   \n", UploadFormat::Text).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert_eq!(backend.call_count(BackendOp::Add), 0);
}

#[tokio::test]
async fn test_ingest_file_detects_format_from_extension() {
    let (desk, _) = common::connected().await;
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"["from file a", "from file b"]"#).unwrap();

    let count = desk.ingest_file(file.path(), None).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_ingest_file_with_forced_format() {
    let (desk, _) = common::connected().await;
    let mut file = tempfile::Builder::new().suffix(".data").tempfile().unwrap();
    writeln!(file, "line one").unwrap();
    writeln!(file, "line two").unwrap();

    assert!(desk.ingest_file(file.path(), None).await.is_err());
    let count = desk.ingest_file(file.path(), Some(UploadFormat::Text)).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_ingest_file_with_mime_type_format() {
    let (desk, _) = common::connected().await;
    let mut file = tempfile::Builder::new().suffix(".upload").tempfile().unwrap();
    write!(file, r#"["first", "second", "third"]"#).unwrap();

    let format = "application/json".parse::<UploadFormat>().unwrap();
    let count = desk.ingest_file(file.path(), Some(format)).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_ingest_requires_connection() {
    let (desk, _) = common::setup();
    let err = desk.ingest("doc", UploadFormat::Text).await.unwrap_err();
    assert!(err.is_not_connected());
}
