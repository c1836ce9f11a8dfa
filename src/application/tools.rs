//! Tool surface for an LLM agent.
//!
//! Both tools answer with a tri-state status so the agent can tell "found
//! nothing" apart from "failed". The collection is injected at construction;
//! the tools hold no global state.

use crate::application::collection::DocumentCollection;
use crate::domain::values::query_limit::QueryLimit;
use crate::domain::values::tool_status::ToolStatus;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub const STORE_DOCUMENTS: &str = "store_documents";
pub const QUERY_DOCUMENTS: &str = "query_documents";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ToolResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            message: Some(message.into()),
            error_message: None,
            documents: None,
            count: None,
        }
    }

    pub fn found(documents: Vec<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            message: None,
            error_message: None,
            count: Some(documents.len()),
            documents: Some(documents),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Empty,
            ..Self::success(message)
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            message: None,
            error_message: Some(error_message.into()),
            documents: None,
            count: None,
        }
    }
}

#[derive(Deserialize)]
struct StoreArgs {
    documents: Vec<String>,
}

fn default_n_results() -> usize {
    QueryLimit::TOOL_DEFAULT.value()
}

#[derive(Deserialize)]
struct QueryArgs {
    query: String,
    #[serde(default = "default_n_results")]
    n_results: usize,
}

#[derive(Clone)]
pub struct DocumentTools {
    collection: Arc<DocumentCollection>,
}

impl DocumentTools {
    pub fn new(collection: Arc<DocumentCollection>) -> Self {
        Self { collection }
    }

    pub async fn store_documents(&self, documents: Vec<String>) -> ToolResponse {
        let count = documents.len();
        match self.collection.store(documents).await {
            Ok(_) => ToolResponse::success(format!("Successfully stored {count} documents.")),
            Err(e) => {
                warn!(error = %e, "store_documents failed");
                ToolResponse::error(format!("Error storing documents: {e}"))
            }
        }
    }

    pub async fn query_documents(&self, query: &str, n_results: usize) -> ToolResponse {
        let limit = match QueryLimit::new(n_results) {
            Ok(limit) => limit,
            Err(e) => return ToolResponse::error(format!("Error querying documents: {e}")),
        };
        match self.collection.query_one(query, limit).await {
            Ok(hits) if hits.is_empty() => {
                ToolResponse::empty(format!("No documents found matching: '{query}'"))
            }
            Ok(hits) => ToolResponse::found(hits.into_iter().map(|h| h.document).collect()),
            Err(e) => {
                warn!(error = %e, "query_documents failed");
                ToolResponse::error(format!("Error querying documents: {e}"))
            }
        }
    }

    /// Invoke a tool by name with JSON arguments, as an agent loop would.
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolResponse {
        debug!(tool = name, "Dispatching tool call");
        match name {
            STORE_DOCUMENTS => match serde_json::from_value::<StoreArgs>(args) {
                Ok(a) => self.store_documents(a.documents).await,
                Err(e) => ToolResponse::error(format!("Invalid arguments for {STORE_DOCUMENTS}: {e}")),
            },
            QUERY_DOCUMENTS => match serde_json::from_value::<QueryArgs>(args) {
                Ok(a) => self.query_documents(&a.query, a.n_results).await,
                Err(e) => ToolResponse::error(format!("Invalid arguments for {QUERY_DOCUMENTS}: {e}")),
            },
            other => ToolResponse::error(format!("Unknown tool: {other}")),
        }
    }

    /// Function declarations in the JSON-schema shape agent frameworks accept.
    pub fn declarations() -> Value {
        json!([
            {
                "name": STORE_DOCUMENTS,
                "description": "Store documents in the document collection.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "documents": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Document strings to store."
                        }
                    },
                    "required": ["documents"]
                }
            },
            {
                "name": QUERY_DOCUMENTS,
                "description": "Search the document collection for documents relevant to a query.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query."
                        },
                        "n_results": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Maximum number of documents to return (default 5)."
                        }
                    },
                    "required": ["query"]
                }
            }
        ])
    }
}
