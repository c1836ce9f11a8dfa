use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_COLLECTION: &str = "documents";
pub const DEFAULT_CLIENT_NAME: &str = "admin_client";

/// Identity of one collection on one remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub collection: String,
    /// Display label for logs; has no effect on the remote side.
    pub client_name: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, collection: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            collection: collection.into(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// `http://host:port`, unless the host already carries a scheme.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{}", self.port)
        } else {
            format!("http://{host}:{}", self.port)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_COLLECTION)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_url(), self.collection)
    }
}
