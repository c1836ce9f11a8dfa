use chromadesk::config::{EmbeddingChoice, Settings};
use chromadesk::domain::error::DomainError;
use chromadesk::domain::ports::embedding_port::EmbeddingProvider;
use chromadesk::domain::values::endpoint::Endpoint;
use chromadesk::domain::values::query_limit::QueryLimit;
use chromadesk::infrastructure::chroma::config::{ApiVersion, ChromaConfig};
use chromadesk::infrastructure::chroma::http::ChromaHttpBackend;
use chromadesk::infrastructure::embeddings::hashing::HashingProvider;
use chromadesk::{build_embedder, ChromaDesk};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_config_for_endpoint() {
    let config = ChromaConfig::for_endpoint(&Endpoint::new("chroma", 9000, "notes"))
        .with_api_version(ApiVersion::V1)
        .with_timeout(Duration::from_secs(2));
    assert_eq!(config.url, "http://chroma:9000");
    assert_eq!(config.timeout, Duration::from_secs(2));
    let backend = ChromaHttpBackend::new(config).unwrap();
    assert_eq!(backend.config().api_version, ApiVersion::V1);
}

#[test]
fn test_default_settings_embed_on_client() {
    let settings = Settings::default();
    assert_eq!(settings.embedding, EmbeddingChoice::Hash);
    let embedder = build_embedder(&settings).expect("default settings attach an embedder");
    assert_eq!(embedder.dimension(), 256);

    let text_only = Settings { embedding: EmbeddingChoice::Server, ..Settings::default() };
    assert!(build_embedder(&text_only).is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_connection_failure() {
    // Port 9 (discard) is essentially never served on loopback.
    let endpoint = Endpoint::new("127.0.0.1", 9, "documents");
    let config = ChromaConfig::for_endpoint(&endpoint)
        .with_connect_timeout(Duration::from_millis(500))
        .with_timeout(Duration::from_secs(2));
    let backend = Arc::new(ChromaHttpBackend::new(config).unwrap());
    let desk = ChromaDesk::with_backend(endpoint, backend);

    let err = desk.connect().await.unwrap_err();
    assert!(matches!(err, DomainError::ConnectionFailure { .. }));
    assert!(err.is_transient());
    assert!(desk.store("x").await.unwrap_err().is_not_connected());
}

// ---------------------------------------------------------------------------
// Live tests: need a running Chroma server.
// Run with: CHROMA_URL=http://localhost:8000 cargo test -- --ignored
// ---------------------------------------------------------------------------

fn live_desk(collection: &str) -> ChromaDesk {
    let url = std::env::var("CHROMA_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let endpoint = Endpoint::new("localhost", 8000, collection);
    let backend = ChromaHttpBackend::new(ChromaConfig::new(url))
        .unwrap()
        .with_embedder(Arc::new(HashingProvider::default()));
    let backend = Arc::new(backend);
    ChromaDesk::with_backend(endpoint, backend)
}

#[tokio::test]
#[ignore = "requires running Chroma server"]
async fn test_live_store_list_query() {
    let desk = live_desk(&format!("chromadesk_test_{}", uuid::Uuid::new_v4().simple()));
    desk.connect().await.unwrap();
    desk.connect().await.unwrap();

    let before = desk.list_all().await.unwrap().len();
    desk.store(["a", "b", "c"]).await.unwrap();
    let all = desk.list_all().await.unwrap();
    assert_eq!(all.len(), before + 3);

    let hits = desk.query("b", QueryLimit::new(2).unwrap()).await.unwrap();
    assert!(hits.len() <= 2);
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}
