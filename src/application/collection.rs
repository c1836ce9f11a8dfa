//! Connection wrapper around one remote collection.
//!
//! Every record operation goes through [`DocumentCollection::connected_handle`],
//! so store, query and list all fail with [`DomainError::NotConnected`] until
//! [`DocumentCollection::connect`] has succeeded once. There is no way back
//! to the unconnected state; drop the wrapper instead.
//!
//! Calls are meant to be issued one at a time. The wrapper is `Send + Sync`
//! so it can be shared behind an `Arc`, but concurrent calls carry no
//! ordering guarantee between them.

use crate::domain::entities::document::{QueryHit, StoredDocument, TextBatch};
use crate::domain::error::DomainError;
use crate::domain::ports::collection_backend::{BackendError, CollectionBackend, CollectionHandle};
use crate::domain::values::endpoint::Endpoint;
use crate::domain::values::query_limit::QueryLimit;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum ConnectionState {
    Unconnected,
    Connected(CollectionHandle),
}

pub struct DocumentCollection {
    endpoint: Endpoint,
    backend: Arc<dyn CollectionBackend>,
    state: RwLock<ConnectionState>,
}

impl DocumentCollection {
    pub fn new(endpoint: Endpoint, backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            endpoint,
            backend,
            state: RwLock::new(ConnectionState::Unconnected),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected(_))
    }

    pub async fn handle(&self) -> Option<CollectionHandle> {
        match &*self.state.read().await {
            ConnectionState::Connected(h) => Some(h.clone()),
            ConnectionState::Unconnected => None,
        }
    }

    /// Get-or-create the named collection and bind to it. Safe to repeat.
    pub async fn connect(&self) -> Result<(), DomainError> {
        let handle = self
            .backend
            .get_or_create_collection(&self.endpoint.collection)
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "Connect failed");
                DomainError::ConnectionFailure { transient: e.is_transient(), message: e.to_string() }
            })?;

        info!(
            client = %self.endpoint.client_name,
            endpoint = %self.endpoint,
            collection_id = %handle.id,
            "Connected to collection"
        );
        *self.state.write().await = ConnectionState::Connected(handle);
        Ok(())
    }

    async fn connected_handle(&self) -> Result<CollectionHandle, DomainError> {
        self.handle()
            .await
            .ok_or_else(|| DomainError::NotConnected(self.endpoint.collection.clone()))
    }

    /// Store one document or a batch, each under a fresh UUID. Returns the ids
    /// in input order.
    ///
    /// The batch is all-or-nothing from the caller's side: if the remote add
    /// is rejected, the generated ids are deleted again (best effort) before
    /// the failure is reported.
    pub async fn store(&self, documents: impl Into<TextBatch>) -> Result<Vec<String>, DomainError> {
        let handle = self.connected_handle().await?;
        let documents = documents.into().into_inner();
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = documents.iter().map(|_| uuid::Uuid::new_v4().to_string()).collect();
        match self.backend.add(&handle, &ids, &documents).await {
            Ok(()) => {
                debug!(collection = %handle.name, count = ids.len(), "Stored documents");
                Ok(ids)
            }
            Err(e) => {
                self.roll_back(&handle, &ids).await;
                Err(store_failure(e))
            }
        }
    }

    async fn roll_back(&self, handle: &CollectionHandle, ids: &[String]) {
        match self.backend.delete(handle, ids).await {
            Ok(()) => debug!(collection = %handle.name, count = ids.len(), "Rolled back rejected batch"),
            Err(e) => warn!(
                collection = %handle.name,
                count = ids.len(),
                error = %e,
                "Rollback of rejected batch failed; some documents may remain"
            ),
        }
    }

    /// Similarity search. Returns one hit list per query text, each sorted by
    /// ascending distance and at most `limit` long.
    pub async fn query(
        &self,
        texts: impl Into<TextBatch>,
        limit: QueryLimit,
    ) -> Result<Vec<Vec<QueryHit>>, DomainError> {
        let handle = self.connected_handle().await?;
        let texts = texts.into().into_inner();
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut batches = self
            .backend
            .query(&handle, &texts, limit.value())
            .await
            .map_err(|e| DomainError::QueryFailure { transient: e.is_transient(), message: e.to_string() })?;

        if batches.len() != texts.len() {
            return Err(DomainError::QueryFailure {
                message: format!("expected {} result sets, got {}", texts.len(), batches.len()),
                transient: false,
            });
        }
        for hits in &mut batches {
            hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
            hits.truncate(limit.value());
        }
        Ok(batches)
    }

    pub async fn query_one(&self, text: &str, limit: QueryLimit) -> Result<Vec<QueryHit>, DomainError> {
        let mut batches = self.query(text, limit).await?;
        Ok(batches.pop().unwrap_or_default())
    }

    /// Every stored document, in the order the server returns them.
    pub async fn list_all(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let handle = self.connected_handle().await?;
        self.backend
            .get_all(&handle)
            .await
            .map_err(|e| DomainError::ListFailure { transient: e.is_transient(), message: e.to_string() })
    }

    /// Server liveness. Does not require a connection.
    pub async fn heartbeat(&self) -> Result<i64, DomainError> {
        self.backend
            .heartbeat()
            .await
            .map_err(|e| DomainError::ConnectionFailure { transient: e.is_transient(), message: e.to_string() })
    }
}

fn store_failure(e: BackendError) -> DomainError {
    DomainError::StoreFailure { transient: e.is_transient(), message: e.to_string() }
}
