//! Interactive admin session.
//!
//! All session state lives in [`AdminSession`]; each input line is handled
//! by [`AdminSession::execute`], which mutates that state and returns the
//! text to show. A failed command prints its error and leaves the rest of
//! the session untouched.

use crate::application::ingest::parse_lines;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_backend::CollectionBackend;
use crate::domain::values::endpoint::Endpoint;
use crate::domain::values::query_limit::QueryLimit;
use crate::domain::values::upload_format::UploadFormat;
use crate::ChromaDesk;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
Commands:
  connect [collection]   connect (or switch) to a collection
  disconnect             drop the current connection
  status                 show connection and session counters
  add <text>             store one document
  batch                  store several documents, one per line, ending with '.'
  import <file> [format] store documents from a .txt or .json file
  query <text>           similarity search
  limit <n>              set the number of query results
  list                   show every stored document
  tool <name> <json>     invoke an agent tool
  help                   show this text
  quit                   leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellReply {
    Output(String),
    Quit,
}

pub struct AdminSession {
    endpoint: Endpoint,
    backend: Arc<dyn CollectionBackend>,
    desk: ChromaDesk,
    documents_added: usize,
    query_limit: QueryLimit,
    batch: Option<Vec<String>>,
}

impl AdminSession {
    pub fn new(endpoint: Endpoint, backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            desk: ChromaDesk::with_backend(endpoint.clone(), backend.clone()),
            endpoint,
            backend,
            documents_added: 0,
            query_limit: QueryLimit::TOOL_DEFAULT,
            batch: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn documents_added(&self) -> usize {
        self.documents_added
    }

    pub fn query_limit(&self) -> QueryLimit {
        self.query_limit
    }

    pub async fn is_connected(&self) -> bool {
        self.desk.collection().is_connected().await
    }

    pub fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    /// Swap in a fresh, unconnected wrapper for the current endpoint.
    fn reset_wrapper(&mut self) {
        self.desk = ChromaDesk::with_backend(self.endpoint.clone(), self.backend.clone());
    }

    pub async fn execute(&mut self, line: &str) -> ShellReply {
        if let Some(lines) = self.batch.as_mut() {
            if line.trim() != "." {
                lines.push(line.to_string());
                return ShellReply::Output(String::new());
            }
            let body = self.batch.take().unwrap_or_default().join("\n");
            return ShellReply::Output(render(self.store_batch(&body).await));
        }

        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let result = match cmd {
            "" => Ok(String::new()),
            "quit" | "exit" => return ShellReply::Quit,
            "help" => Ok(HELP.to_string()),
            "connect" => self.connect(rest).await,
            "disconnect" => Ok(self.disconnect()),
            "status" => Ok(self.status().await),
            "add" => self.add(rest).await,
            "batch" => {
                self.batch = Some(Vec::new());
                Ok("Enter one document per line; finish with a single '.'".to_string())
            }
            "import" => self.import(rest).await,
            "query" => self.query(rest).await,
            "limit" => self.set_limit(rest),
            "list" => self.list().await,
            "tool" => self.tool(rest).await,
            other => Err(DomainError::InvalidInput(format!("Unknown command: {other} (try 'help')"))),
        };
        ShellReply::Output(render(result))
    }

    /// Connect to `collection` (or the current one). The session only
    /// switches once the new connection has succeeded.
    async fn connect(&mut self, collection: &str) -> Result<String, DomainError> {
        if collection.is_empty() || collection == self.endpoint.collection {
            self.desk.connect().await?;
            return Ok(format!("Connected to {}", self.endpoint));
        }

        let mut endpoint = self.endpoint.clone();
        endpoint.collection = collection.to_string();
        let desk = ChromaDesk::with_backend(endpoint.clone(), self.backend.clone());
        desk.connect().await?;

        self.endpoint = endpoint;
        self.desk = desk;
        Ok(format!("Connected to {}", self.endpoint))
    }

    fn disconnect(&mut self) -> String {
        self.reset_wrapper();
        "Disconnected.".to_string()
    }

    async fn status(&self) -> String {
        let state = if self.is_connected().await { "connected" } else { "not connected" };
        format!(
            "Endpoint: {}\nClient: {}\nState: {state}\nDocuments added (session): {}\nResult limit: {}",
            self.endpoint, self.endpoint.client_name, self.documents_added, self.query_limit
        )
    }

    async fn add(&mut self, text: &str) -> Result<String, DomainError> {
        if text.is_empty() {
            return Err(DomainError::InvalidInput("Please enter document content.".into()));
        }
        self.desk.store(text).await?;
        self.documents_added += 1;
        Ok("Document added.".to_string())
    }

    async fn store_batch(&mut self, body: &str) -> Result<String, DomainError> {
        let documents = parse_lines(body);
        if documents.is_empty() {
            return Err(DomainError::InvalidInput("No valid documents found.".into()));
        }
        let count = documents.len();
        self.desk.store(documents).await?;
        self.documents_added += count;
        Ok(format!("{count} documents added."))
    }

    async fn import(&mut self, args: &str) -> Result<String, DomainError> {
        let mut parts = args.split_whitespace();
        let path = parts
            .next()
            .ok_or_else(|| DomainError::InvalidInput("usage: import <file> [text|json]".into()))?;
        let format = parts
            .next()
            .map(|f| f.parse::<UploadFormat>())
            .transpose()
            .map_err(DomainError::InvalidInput)?;
        let count = self.desk.ingest_file(Path::new(path), format).await?;
        self.documents_added += count;
        Ok(format!("{count} documents added from {path}."))
    }

    async fn query(&self, text: &str) -> Result<String, DomainError> {
        if text.is_empty() {
            return Err(DomainError::InvalidInput("Please enter a search query.".into()));
        }
        let hits = self.desk.query(text, self.query_limit).await?;
        if hits.is_empty() {
            return Ok("No results found.".to_string());
        }
        Ok(hits
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}. [distance {:.4}] {}", i + 1, h.distance, h.document))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn set_limit(&mut self, value: &str) -> Result<String, DomainError> {
        let n: usize = value
            .parse()
            .map_err(|_| DomainError::InvalidInput(format!("Not a number: {value}")))?;
        self.query_limit = QueryLimit::new(n).map_err(DomainError::InvalidInput)?;
        Ok(format!("Result limit set to {n}."))
    }

    async fn list(&self) -> Result<String, DomainError> {
        let overview = self.desk.overview().await?;
        if overview.documents.is_empty() {
            return Ok("Total documents: 0\nNo documents in the collection.".to_string());
        }
        let mut out = format!("Total documents: {}", overview.total_documents);
        for (i, doc) in overview.documents.iter().enumerate() {
            out.push_str(&format!("\n{}. (id {}) {}", i + 1, doc.id, doc.document));
        }
        Ok(out)
    }

    async fn tool(&self, args: &str) -> Result<String, DomainError> {
        let (name, json) = args.split_once(char::is_whitespace).unwrap_or((args, "{}"));
        if name.is_empty() {
            return Err(DomainError::InvalidInput("usage: tool <name> <json>".into()));
        }
        let value: serde_json::Value = serde_json::from_str(json.trim())?;
        let response = self.desk.tools().dispatch(name, value).await;
        Ok(serde_json::to_string_pretty(&response)?)
    }
}

fn render(result: Result<String, DomainError>) -> String {
    match result {
        Ok(out) => out,
        Err(e) => format!("Error: {e}"),
    }
}

/// Drive a session from a line source until EOF or `quit`.
pub async fn run<R, W>(session: &mut AdminSession, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(b"chromadesk shell - type 'help' for commands\n").await?;
    loop {
        let prompt: &[u8] = if session.in_batch() { b"... " } else { b"> " };
        output.write_all(prompt).await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match session.execute(&line).await {
            ShellReply::Quit => break,
            ShellReply::Output(text) if text.is_empty() => {}
            ShellReply::Output(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
        }
    }
    output.flush().await
}
