//! Chroma REST request and response bodies.

use crate::domain::entities::document::{QueryHit, StoredDocument};
use crate::domain::ports::collection_backend::{BackendError, CollectionHandle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct CreateCollectionRequest<'a> {
    pub name: &'a str,
    pub get_or_create: bool,
}

#[derive(Debug, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl From<CollectionInfo> for CollectionHandle {
    fn from(info: CollectionInfo) -> Self {
        CollectionHandle { id: info.id, name: info.name }
    }
}

#[derive(Debug, Serialize)]
pub struct AddRequest<'a> {
    pub ids: &'a [String],
    pub documents: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub n_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_texts: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_embeddings: Option<Vec<Vec<f32>>>,
    pub include: &'static [&'static str],
}

pub const QUERY_INCLUDE: &[&str] = &["documents", "distances"];

impl<'a> QueryRequest<'a> {
    /// Sends vectors when the caller embedded the texts, the raw texts otherwise.
    pub fn new(texts: &'a [String], query_embeddings: Option<Vec<Vec<f32>>>, n_results: usize) -> Self {
        Self {
            n_results,
            query_texts: if query_embeddings.is_some() { None } else { Some(texts) },
            query_embeddings,
            include: QUERY_INCLUDE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetRequest {
    pub include: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
    pub ids: &'a [String],
}

/// Query results are arrays of arrays, one inner array per query text.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl QueryResponse {
    pub fn into_hits(self) -> Result<Vec<Vec<QueryHit>>, BackendError> {
        let documents = self.documents.unwrap_or_default();
        let distances = self
            .distances
            .ok_or_else(|| BackendError::decode("query response has no distances"))?;

        let mut batches = Vec::with_capacity(self.ids.len());
        for (q, ids) in self.ids.into_iter().enumerate() {
            let docs = documents.get(q);
            let dists = distances.get(q);
            let mut hits = Vec::with_capacity(ids.len());
            for (i, id) in ids.into_iter().enumerate() {
                let document = docs
                    .and_then(|d| d.get(i))
                    .cloned()
                    .flatten()
                    .unwrap_or_default();
                let distance = dists
                    .and_then(|d| d.get(i))
                    .copied()
                    .flatten()
                    .ok_or_else(|| BackendError::decode(format!("missing distance for id {id}")))?;
                hits.push(QueryHit { id, document, distance });
            }
            batches.push(hits);
        }
        Ok(batches)
    }
}

#[derive(Debug, Deserialize)]
pub struct GetResponse {
    pub ids: Vec<String>,
    #[serde(default)]
    pub documents: Option<Vec<Option<String>>>,
}

impl GetResponse {
    pub fn into_documents(self) -> Vec<StoredDocument> {
        let documents = self.documents.unwrap_or_default();
        self.ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| StoredDocument {
                id,
                document: documents.get(i).cloned().flatten().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_prefers_embeddings() {
        let texts = vec!["hello".to_string()];
        let body = serde_json::to_value(QueryRequest::new(&texts, Some(vec![vec![0.5, 0.5]]), 3)).unwrap();
        assert_eq!(body["query_embeddings"], json!([[0.5, 0.5]]));
        assert!(body.get("query_texts").is_none());
        assert_eq!(body["n_results"], 3);
        assert_eq!(body["include"], json!(["documents", "distances"]));
    }

    #[test]
    fn test_query_request_text_only() {
        let texts = vec!["hello".to_string()];
        let body = serde_json::to_value(QueryRequest::new(&texts, None, 3)).unwrap();
        assert_eq!(body["query_texts"], json!(["hello"]));
        assert!(body.get("query_embeddings").is_none());
    }

    #[test]
    fn test_add_request_carries_embeddings() {
        let ids = vec!["1".to_string()];
        let docs = vec!["doc".to_string()];
        let body = serde_json::to_value(AddRequest {
            ids: &ids,
            documents: &docs,
            embeddings: Some(vec![vec![1.0]]),
        })
        .unwrap();
        assert_eq!(body["embeddings"], json!([[1.0]]));
        assert_eq!(body["documents"], json!(["doc"]));
    }

    #[test]
    fn test_query_response_into_hits() {
        let body = json!({
            "ids": [["a", "b"], []],
            "documents": [["alpha", null], []],
            "distances": [[0.1, 0.7], []],
            "metadatas": null
        });
        let resp: QueryResponse = serde_json::from_value(body).unwrap();
        let hits = resp.into_hits().unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0][0].document, "alpha");
        assert_eq!(hits[0][1].document, "");
        assert!((hits[0][1].distance - 0.7).abs() < 1e-9);
        assert!(hits[1].is_empty());
    }

    #[test]
    fn test_query_response_without_distances_is_decode_error() {
        let resp: QueryResponse = serde_json::from_value(json!({ "ids": [["a"]] })).unwrap();
        assert!(resp.into_hits().is_err());
    }

    #[test]
    fn test_get_response_into_documents() {
        let resp: GetResponse = serde_json::from_value(json!({
            "ids": ["x", "y"],
            "documents": ["first", "second"],
            "embeddings": null
        }))
        .unwrap();
        let docs = resp.into_documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1], StoredDocument { id: "y".into(), document: "second".into() });
    }

    #[test]
    fn test_add_request_omits_missing_embeddings() {
        let ids = vec!["1".to_string()];
        let documents = vec!["doc".to_string()];
        let body = serde_json::to_value(AddRequest { ids: &ids, documents: &documents, embeddings: None }).unwrap();
        assert!(body.get("embeddings").is_none());
        assert_eq!(body["documents"][0], "doc");
    }
}
