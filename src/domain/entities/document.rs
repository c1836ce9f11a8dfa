use serde::{Deserialize, Serialize};

/// A document as held by the remote collection, with its generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub document: String,
}

/// One ranked similarity match. Smaller distance means more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    pub id: String,
    pub document: String,
    pub distance: f64,
}

/// Owned batch of texts for a single store or query call.
///
/// Lets callers pass one text or many without wrapping a single string in
/// a vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBatch(Vec<String>);

impl TextBatch {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TextBatch {
    fn from(s: &str) -> Self {
        TextBatch(vec![s.to_string()])
    }
}

impl From<String> for TextBatch {
    fn from(s: String) -> Self {
        TextBatch(vec![s])
    }
}

impl From<Vec<String>> for TextBatch {
    fn from(v: Vec<String>) -> Self {
        TextBatch(v)
    }
}

impl From<Vec<&str>> for TextBatch {
    fn from(v: Vec<&str>) -> Self {
        TextBatch(v.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for TextBatch {
    fn from(v: &[&str]) -> Self {
        TextBatch(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TextBatch {
    fn from(v: [&str; N]) -> Self {
        TextBatch(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for TextBatch {
    fn from(v: &[String]) -> Self {
        TextBatch(v.to_vec())
    }
}

impl From<&String> for TextBatch {
    fn from(s: &String) -> Self {
        TextBatch(vec![s.clone()])
    }
}
