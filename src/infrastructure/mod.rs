pub mod chroma;
pub mod embeddings;
pub mod memory;
