use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_MODEL: &str = "voyage-3-lite";

pub struct VoyageProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'static str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl VoyageProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| "https://api.voyageai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for VoyageProvider {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        let input_type = match input_type {
            InputType::Document => "document",
            InputType::Query => "query",
        };
        debug!(count = texts.len(), model = %self.model, input_type, "Voyage embedding request");

        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest { input: texts, model: &self.model, input_type })
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("Voyage API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("Voyage API {status}: {body}")));
        }

        let mut result: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Voyage response: {e}")))?;
        if result.data.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "Voyage returned {} embeddings for {} inputs",
                result.data.len(),
                texts.len()
            )));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimension(&self) -> usize {
        match self.model.as_str() {
            "voyage-3" | "voyage-code-3" => 1024,
            "voyage-3-large" | "voyage-large-2" => 1536,
            _ => 512,
        }
    }
}
