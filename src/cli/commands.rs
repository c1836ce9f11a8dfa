use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chromadesk", about = "Admin console and agent tools for a Chroma document collection")]
pub struct Cli {
    /// Server host (overrides CHROMADESK_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,
    /// Server port (overrides CHROMADESK_PORT)
    #[arg(long, global = true)]
    pub port: Option<u16>,
    /// Collection name (overrides CHROMADESK_COLLECTION)
    #[arg(long, global = true)]
    pub collection: Option<String>,
    /// Backend: chroma or memory (overrides CHROMADESK_BACKEND)
    #[arg(long, global = true)]
    pub backend: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the server is reachable
    Ping,
    /// Store one or more documents
    Add {
        /// Document texts; each argument is one document
        #[arg(required = true)]
        documents: Vec<String>,
    },
    /// Store documents from a .txt (one per line) or .json (array) file
    Import {
        file: PathBuf,
        /// Force the format (text, json, or a MIME type) instead of detecting it from the extension
        #[arg(long)]
        format: Option<String>,
    },
    /// Similarity search
    Query {
        text: String,
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// List every document in the collection
    List,
    /// Invoke an agent tool (store_documents, query_documents) with JSON arguments
    Tool {
        name: String,
        json: String,
    },
    /// Print the agent tool declarations
    Tools,
    /// Interactive admin session
    Shell,
}
