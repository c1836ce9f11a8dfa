use crate::domain::values::endpoint::Endpoint;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TENANT: &str = "default_tenant";
pub const DEFAULT_DATABASE: &str = "default_database";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// REST API generation spoken by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V1 => write!(f, "v1"),
            ApiVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            _ => Err(format!("Unknown Chroma API version: {s}")),
        }
    }
}

/// Connection settings for a Chroma server.
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    /// Server URL without trailing slash (default: `http://localhost:8000`).
    pub url: String,
    pub tenant: String,
    pub database: String,
    pub api_version: ApiVersion,
    /// Whole-request timeout, applied to every call.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ChromaConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            api_version: ApiVersion::default(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        ChromaConfig::new(endpoint.base_url())
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn heartbeat_url(&self) -> String {
        format!("{}/api/{}/heartbeat", self.url, self.api_version)
    }

    pub fn collections_url(&self) -> String {
        format!(
            "{}/api/{}/tenants/{}/databases/{}/collections",
            self.url, self.api_version, self.tenant, self.database
        )
    }

    /// URL for a record operation (`add`, `query`, `get`, `delete`) on one collection.
    pub fn record_url(&self, collection_id: &str, op: &str) -> String {
        match self.api_version {
            ApiVersion::V1 => format!("{}/api/v1/collections/{collection_id}/{op}", self.url),
            ApiVersion::V2 => format!("{}/{collection_id}/{op}", self.collections_url()),
        }
    }
}

impl Default for ChromaConfig {
    fn default() -> Self {
        ChromaConfig::for_endpoint(&Endpoint::default())
    }
}
