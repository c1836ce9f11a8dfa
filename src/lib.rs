pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::collection::DocumentCollection;
use crate::application::ingest::IngestUseCase;
use crate::application::overview::{CollectionOverview, OverviewUseCase};
use crate::application::tools::DocumentTools;
use crate::config::{BackendKind, EmbeddingChoice, Settings};
use crate::domain::entities::document::{QueryHit, StoredDocument, TextBatch};
use crate::domain::error::DomainError;
use crate::domain::ports::collection_backend::CollectionBackend;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::endpoint::Endpoint;
use crate::domain::values::query_limit::QueryLimit;
use crate::domain::values::upload_format::UploadFormat;
use crate::infrastructure::chroma::config::ChromaConfig;
use crate::infrastructure::chroma::http::ChromaHttpBackend;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::memory::InMemoryBackend;
use std::path::Path;
use std::sync::Arc;

pub struct ChromaDesk {
    collection: Arc<DocumentCollection>,
    tools: DocumentTools,
}

impl ChromaDesk {
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        let backend = build_backend(settings)?;
        Ok(Self::with_backend(settings.endpoint.clone(), backend))
    }

    pub fn with_backend(endpoint: Endpoint, backend: Arc<dyn CollectionBackend>) -> Self {
        let collection = Arc::new(DocumentCollection::new(endpoint, backend));
        Self {
            tools: DocumentTools::new(collection.clone()),
            collection,
        }
    }

    pub fn collection(&self) -> &Arc<DocumentCollection> {
        &self.collection
    }

    pub fn tools(&self) -> &DocumentTools {
        &self.tools
    }

    // Delegating methods
    pub async fn connect(&self) -> Result<(), DomainError> {
        self.collection.connect().await
    }

    pub async fn heartbeat(&self) -> Result<i64, DomainError> {
        self.collection.heartbeat().await
    }

    pub async fn store(&self, documents: impl Into<TextBatch>) -> Result<Vec<String>, DomainError> {
        self.collection.store(documents).await
    }

    pub async fn query(&self, text: &str, limit: QueryLimit) -> Result<Vec<QueryHit>, DomainError> {
        self.collection.query_one(text, limit).await
    }

    pub async fn list_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        self.collection.list_all().await
    }

    pub async fn overview(&self) -> Result<CollectionOverview, DomainError> {
        OverviewUseCase::overview(&self.collection).await
    }

    pub async fn ingest(&self, body: &str, format: UploadFormat) -> Result<usize, DomainError> {
        IngestUseCase::ingest(&self.collection, body, format).await
    }

    pub async fn ingest_file(&self, path: &Path, format: Option<UploadFormat>) -> Result<usize, DomainError> {
        IngestUseCase::ingest_file(&self.collection, path, format).await
    }
}

pub fn build_embedder(settings: &Settings) -> Option<Arc<dyn EmbeddingProvider>> {
    let key = settings.embedding_api_key.clone();
    let model = settings.embedding_model.clone();
    match settings.embedding {
        EmbeddingChoice::Server => None,
        EmbeddingChoice::Hash => Some(Arc::new(HashingProvider::default())),
        EmbeddingChoice::OpenAi => Some(Arc::new(OpenAiProvider::new(key, model))),
        EmbeddingChoice::Voyage => Some(Arc::new(VoyageProvider::new(key, model, None))),
    }
}

pub fn build_backend(settings: &Settings) -> Result<Arc<dyn CollectionBackend>, DomainError> {
    let embedder = build_embedder(settings);
    match settings.backend {
        BackendKind::Memory => Ok(Arc::new(match embedder {
            Some(e) => InMemoryBackend::with_embedder(e),
            None => InMemoryBackend::new(),
        })),
        BackendKind::Chroma => {
            let config = ChromaConfig::for_endpoint(&settings.endpoint)
                .with_tenant(settings.tenant.clone())
                .with_database(settings.database.clone())
                .with_api_version(settings.api_version)
                .with_timeout(settings.timeout);
            let backend = ChromaHttpBackend::new(config).map_err(|e| DomainError::Config(e.to_string()))?;
            Ok(Arc::new(match embedder {
                Some(e) => backend.with_embedder(e),
                None => backend,
            }))
        }
    }
}
