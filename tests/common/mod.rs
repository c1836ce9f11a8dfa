//! Shared test helpers.

use chromadesk::domain::values::endpoint::Endpoint;
use chromadesk::infrastructure::memory::InMemoryBackend;
use chromadesk::ChromaDesk;
use std::sync::Arc;

pub fn endpoint() -> Endpoint {
    Endpoint::new("localhost", 8000, "documents").with_client_name("test_client")
}

pub fn setup() -> (ChromaDesk, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let desk = ChromaDesk::with_backend(endpoint(), backend.clone());
    (desk, backend)
}

pub async fn connected() -> (ChromaDesk, Arc<InMemoryBackend>) {
    let (desk, backend) = setup();
    desk.connect().await.unwrap();
    (desk, backend)
}
