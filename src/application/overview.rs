use crate::application::collection::DocumentCollection;
use crate::domain::entities::document::StoredDocument;
use crate::domain::error::DomainError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CollectionOverview {
    pub collection: String,
    pub total_documents: usize,
    pub documents: Vec<StoredDocument>,
}

pub struct OverviewUseCase;

impl OverviewUseCase {
    pub async fn overview(collection: &DocumentCollection) -> Result<CollectionOverview, DomainError> {
        let documents = collection.list_all().await?;
        Ok(CollectionOverview {
            collection: collection.endpoint().collection.clone(),
            total_documents: documents.len(),
            documents,
        })
    }
}
