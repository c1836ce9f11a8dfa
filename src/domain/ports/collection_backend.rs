use crate::domain::entities::document::{QueryHit, StoredDocument};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Server-side identity of a collection, as returned by get-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionHandle {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Request never produced a response (refused, DNS, timeout).
    Transport,
    /// Server answered with a non-success status.
    Status(u16),
    /// Response body did not have the expected shape.
    Decode,
    /// Request rejected before it was sent.
    Rejected,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErrorKind::Transport => write!(f, "transport"),
            BackendErrorKind::Status(code) => write!(f, "HTTP {code}"),
            BackendErrorKind::Decode => write!(f, "decode"),
            BackendErrorKind::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transport, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Decode, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Rejected, message)
    }

    pub fn is_transient(&self) -> bool {
        match self.kind {
            BackendErrorKind::Transport => true,
            BackendErrorKind::Status(code) => code == 429 || code >= 500,
            BackendErrorKind::Decode | BackendErrorKind::Rejected => false,
        }
    }
}

/// The remote collection RPC boundary. One implementation talks to a Chroma
/// server over HTTP; another keeps everything in process.
#[async_trait::async_trait]
pub trait CollectionBackend: Send + Sync {
    async fn heartbeat(&self) -> Result<i64, BackendError>;

    async fn get_or_create_collection(&self, name: &str) -> Result<CollectionHandle, BackendError>;

    async fn add(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
    ) -> Result<(), BackendError>;

    /// One ranked hit list per query text, in the order the texts were given.
    async fn query(
        &self,
        collection: &CollectionHandle,
        texts: &[String],
        n_results: usize,
    ) -> Result<Vec<Vec<QueryHit>>, BackendError>;

    async fn get_all(&self, collection: &CollectionHandle) -> Result<Vec<StoredDocument>, BackendError>;

    async fn delete(&self, collection: &CollectionHandle, ids: &[String]) -> Result<(), BackendError>;
}
