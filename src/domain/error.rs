use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not connected to collection '{0}'. Call connect() first.")]
    NotConnected(String),

    #[error("Connection failed: {message}")]
    ConnectionFailure { message: String, transient: bool },

    #[error("Store failed: {message}")]
    StoreFailure { message: String, transient: bool },

    #[error("Query failed: {message}")]
    QueryFailure { message: String, transient: bool },

    #[error("List failed: {message}")]
    ListFailure { message: String, transient: bool },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// True when the remote side may succeed on a later attempt
    /// (transport errors, timeouts, 429 and 5xx responses).
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::ConnectionFailure { transient, .. }
            | DomainError::StoreFailure { transient, .. }
            | DomainError::QueryFailure { transient, .. }
            | DomainError::ListFailure { transient, .. } => *transient,
            _ => false,
        }
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, DomainError::NotConnected(_))
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_flag_only_on_remote_failures() {
        let e = DomainError::QueryFailure { message: "503".into(), transient: true };
        assert!(e.is_transient());
        let e = DomainError::StoreFailure { message: "bad ids".into(), transient: false };
        assert!(!e.is_transient());
        assert!(!DomainError::NotConnected("documents".into()).is_transient());
    }

    #[test]
    fn test_not_connected_message_names_collection() {
        let e = DomainError::NotConnected("documents".into());
        assert!(e.to_string().contains("'documents'"));
        assert!(e.is_not_connected());
    }
}
