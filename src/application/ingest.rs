use crate::application::collection::DocumentCollection;
use crate::domain::error::DomainError;
use crate::domain::values::upload_format::UploadFormat;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// One document per non-blank line, trimmed.
pub fn parse_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// A JSON upload must be an array. Strings are taken verbatim, any other
/// element is stored as its JSON text; blank entries are dropped.
pub fn parse_json_array(body: &str) -> Result<Vec<String>, DomainError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(DomainError::InvalidInput("JSON upload must be an array of strings".into()));
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .filter(|doc| !doc.trim().is_empty())
        .collect())
}

pub fn parse_upload(body: &str, format: UploadFormat) -> Result<Vec<String>, DomainError> {
    match format {
        UploadFormat::Text => Ok(parse_lines(body)),
        UploadFormat::Json => parse_json_array(body),
    }
}

pub struct IngestUseCase;

impl IngestUseCase {
    /// Parse an upload body and store the result as one batch. Nothing is
    /// sent to the collection if parsing fails or yields no documents.
    pub async fn ingest(
        collection: &DocumentCollection,
        body: &str,
        format: UploadFormat,
    ) -> Result<usize, DomainError> {
        let documents = parse_upload(body, format)?;
        if documents.is_empty() {
            return Err(DomainError::InvalidInput("no documents found in upload".into()));
        }
        let count = documents.len();
        collection.store(documents).await?;
        info!(count, format = %format, "Ingested upload");
        Ok(count)
    }

    /// Read a file and ingest it, detecting the format from the extension
    /// unless one is given.
    pub async fn ingest_file(
        collection: &DocumentCollection,
        path: &Path,
        format: Option<UploadFormat>,
    ) -> Result<usize, DomainError> {
        let format = format
            .or_else(|| UploadFormat::from_path(path))
            .ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "Unsupported file type: {} (expected .txt or .json)",
                    path.display()
                ))
            })?;
        let body = std::fs::read_to_string(path)
            .map_err(|e| DomainError::InvalidInput(format!("Cannot read {}: {e}", path.display())))?;
        Self::ingest(collection, &body, format).await
    }
}
