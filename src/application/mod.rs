pub mod collection;
pub mod ingest;
pub mod overview;
pub mod tools;
