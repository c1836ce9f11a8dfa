pub mod collection_backend;
pub mod embedding_port;
