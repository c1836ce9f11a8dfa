//! Chroma HTTP backend.
//!
//! Talks to Chroma's REST API directly with reqwest. The REST API stores and
//! searches vectors, so an embedding provider is normally attached and
//! vectors are computed here and sent alongside the text. Without one the
//! backend sends raw `documents` and `query_texts`, which only works against
//! a server that embeds on its side.

use crate::domain::entities::document::{QueryHit, StoredDocument};
use crate::domain::ports::collection_backend::{BackendError, CollectionBackend, CollectionHandle};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::chroma::config::ChromaConfig;
use crate::infrastructure::chroma::wire::{
    AddRequest, CollectionInfo, CreateCollectionRequest, DeleteRequest, GetRequest, GetResponse,
    QueryRequest, QueryResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

const GET_INCLUDE: &[&str] = &["documents"];

pub struct ChromaHttpBackend {
    http: Client,
    config: ChromaConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl ChromaHttpBackend {
    pub fn new(config: ChromaConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| BackendError::rejected(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { http, config, embedder: None })
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn config(&self) -> &ChromaConfig {
        &self.config
    }

    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Option<Vec<Vec<f32>>>, BackendError> {
        let Some(embedder) = &self.embedder else {
            return Ok(None);
        };
        let vectors = embedder
            .embed(texts, input_type)
            .await
            .map_err(|e| BackendError::rejected(e.to_string()))?;
        if vectors.len() != texts.len() {
            return Err(BackendError::rejected(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(Some(vectors))
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response, BackendError> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;
        check_status(resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let resp = self.post(url, body).await?;
        let text = resp.text().await.map_err(|e| BackendError::transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| BackendError::decode(format!("{e}: {text}")))
    }
}

async fn check_status(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    error!(status = %status, body = %text, "Chroma HTTP error");
    Err(BackendError::status(status.as_u16(), text))
}

#[async_trait::async_trait]
impl CollectionBackend for ChromaHttpBackend {
    async fn heartbeat(&self) -> Result<i64, BackendError> {
        debug!(url = %self.config.url, "Chroma heartbeat check");
        let resp = self
            .http
            .get(self.config.heartbeat_url())
            .send()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;
        let body: Value = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::decode(e.to_string()))?;
        body["nanosecond heartbeat"]
            .as_i64()
            .ok_or_else(|| BackendError::decode(format!("unexpected heartbeat body: {body}")))
    }

    async fn get_or_create_collection(&self, name: &str) -> Result<CollectionHandle, BackendError> {
        let info: CollectionInfo = self
            .post_json(
                &self.config.collections_url(),
                &CreateCollectionRequest { name, get_or_create: true },
            )
            .await?;
        info!(name = %info.name, id = %info.id, "Collection get_or_create");
        Ok(info.into())
    }

    async fn add(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
    ) -> Result<(), BackendError> {
        let embeddings = self.embed(documents, InputType::Document).await?;
        let url = self.config.record_url(&collection.id, "add");
        self.post(&url, &AddRequest { ids, documents, embeddings }).await?;
        info!(collection = %collection.name, count = ids.len(), "Added documents");
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionHandle,
        texts: &[String],
        n_results: usize,
    ) -> Result<Vec<Vec<QueryHit>>, BackendError> {
        let query_embeddings = self.embed(texts, InputType::Query).await?;
        let body = QueryRequest::new(texts, query_embeddings, n_results);
        debug!(collection = %collection.name, n_results, queries = texts.len(), "Querying collection");
        let resp: QueryResponse = self
            .post_json(&self.config.record_url(&collection.id, "query"), &body)
            .await?;
        resp.into_hits()
    }

    async fn get_all(&self, collection: &CollectionHandle) -> Result<Vec<StoredDocument>, BackendError> {
        let resp: GetResponse = self
            .post_json(
                &self.config.record_url(&collection.id, "get"),
                &GetRequest { include: GET_INCLUDE },
            )
            .await?;
        let docs = resp.into_documents();
        debug!(collection = %collection.name, count = docs.len(), "Fetched all documents");
        Ok(docs)
    }

    async fn delete(&self, collection: &CollectionHandle, ids: &[String]) -> Result<(), BackendError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.post(&self.config.record_url(&collection.id, "delete"), &DeleteRequest { ids })
            .await?;
        info!(collection = %collection.name, count = ids.len(), "Deleted documents");
        Ok(())
    }
}
