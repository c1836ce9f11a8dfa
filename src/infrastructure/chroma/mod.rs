//! Chroma vector database over its REST API.

pub mod config;
pub mod http;
pub mod wire;
