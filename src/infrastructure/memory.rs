//! In-process collection backend.
//!
//! Keeps collections in memory, embeds with the attached provider and ranks
//! by squared L2 distance, which is Chroma's default space. Used when no
//! server is available and by the test suite, which can also queue failures
//! for a given operation.

use crate::domain::entities::document::{QueryHit, StoredDocument};
use crate::domain::ports::collection_backend::{BackendError, CollectionBackend, CollectionHandle};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::embeddings::hashing::HashingProvider;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    Heartbeat,
    GetOrCreate,
    Add,
    Query,
    GetAll,
    Delete,
}

struct Record {
    id: String,
    document: String,
    embedding: Vec<f32>,
}

struct Collection {
    id: String,
    records: Vec<Record>,
}

#[derive(Default)]
struct State {
    collections: HashMap<String, Collection>,
    faults: HashMap<BackendOp, BackendError>,
    calls: HashMap<BackendOp, usize>,
}

pub struct InMemoryBackend {
    embedder: Arc<dyn EmbeddingProvider>,
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::with_embedder(Arc::new(HashingProvider::default()))
    }

    pub fn with_embedder(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder, state: Mutex::new(State::default()) }
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: BackendOp, error: BackendError) {
        if let Ok(mut state) = self.state.lock() {
            state.faults.insert(op, error);
        }
    }

    /// How many times `op` has been invoked, failed calls included.
    pub fn call_count(&self, op: BackendOp) -> usize {
        self.state
            .lock()
            .map(|s| s.calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn collection_count(&self) -> usize {
        self.state.lock().map(|s| s.collections.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::rejected(format!("backend state poisoned: {e}")))
    }

    fn enter(&self, op: BackendOp) -> Result<(), BackendError> {
        let mut state = self.lock()?;
        *state.calls.entry(op).or_default() += 1;
        match state.faults.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, BackendError> {
        self.embedder
            .embed(texts, input_type)
            .await
            .map_err(|e| BackendError::rejected(e.to_string()))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        InMemoryBackend::new()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

fn unknown_collection(handle: &CollectionHandle) -> BackendError {
    BackendError::status(404, format!("Collection {} does not exist", handle.name))
}

#[async_trait::async_trait]
impl CollectionBackend for InMemoryBackend {
    async fn heartbeat(&self) -> Result<i64, BackendError> {
        self.enter(BackendOp::Heartbeat)?;
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);
        Ok(nanos)
    }

    async fn get_or_create_collection(&self, name: &str) -> Result<CollectionHandle, BackendError> {
        self.enter(BackendOp::GetOrCreate)?;
        if name.trim().is_empty() {
            return Err(BackendError::status(422, "collection name cannot be empty"));
        }
        let mut state = self.lock()?;
        let collection = state.collections.entry(name.to_string()).or_insert_with(|| Collection {
            id: uuid::Uuid::new_v4().to_string(),
            records: Vec::new(),
        });
        Ok(CollectionHandle { id: collection.id.clone(), name: name.to_string() })
    }

    async fn add(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
    ) -> Result<(), BackendError> {
        self.enter(BackendOp::Add)?;
        if ids.is_empty() {
            return Err(BackendError::status(422, "ids cannot be empty"));
        }
        if ids.len() != documents.len() {
            return Err(BackendError::status(
                422,
                format!("got {} ids for {} documents", ids.len(), documents.len()),
            ));
        }
        let mut seen: HashSet<&String> = HashSet::new();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(*id)) {
            return Err(BackendError::status(422, format!("duplicate id in batch: {dup}")));
        }

        let embeddings = self.embed(documents, InputType::Document).await?;

        let mut state = self.lock()?;
        let coll = state
            .collections
            .get_mut(&collection.name)
            .ok_or_else(|| unknown_collection(collection))?;
        for ((id, document), embedding) in ids.iter().zip(documents).zip(embeddings) {
            if coll.records.iter().any(|r| &r.id == id) {
                continue;
            }
            coll.records.push(Record { id: id.clone(), document: document.clone(), embedding });
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionHandle,
        texts: &[String],
        n_results: usize,
    ) -> Result<Vec<Vec<QueryHit>>, BackendError> {
        self.enter(BackendOp::Query)?;
        let vectors = self.embed(texts, InputType::Query).await?;

        let state = self.lock()?;
        let coll = state
            .collections
            .get(&collection.name)
            .ok_or_else(|| unknown_collection(collection))?;
        let batches = vectors
            .iter()
            .map(|query| {
                let mut hits: Vec<QueryHit> = coll
                    .records
                    .iter()
                    .map(|r| QueryHit {
                        id: r.id.clone(),
                        document: r.document.clone(),
                        distance: squared_l2(query, &r.embedding),
                    })
                    .collect();
                hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
                hits.truncate(n_results);
                hits
            })
            .collect();
        Ok(batches)
    }

    async fn get_all(&self, collection: &CollectionHandle) -> Result<Vec<StoredDocument>, BackendError> {
        self.enter(BackendOp::GetAll)?;
        let state = self.lock()?;
        let coll = state
            .collections
            .get(&collection.name)
            .ok_or_else(|| unknown_collection(collection))?;
        Ok(coll
            .records
            .iter()
            .map(|r| StoredDocument { id: r.id.clone(), document: r.document.clone() })
            .collect())
    }

    async fn delete(&self, collection: &CollectionHandle, ids: &[String]) -> Result<(), BackendError> {
        self.enter(BackendOp::Delete)?;
        let mut state = self.lock()?;
        let coll = state
            .collections
            .get_mut(&collection.name)
            .ok_or_else(|| unknown_collection(collection))?;
        coll.records.retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}
