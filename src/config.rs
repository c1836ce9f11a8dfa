use crate::domain::error::DomainError;
use crate::domain::values::endpoint::{
    Endpoint, DEFAULT_CLIENT_NAME, DEFAULT_COLLECTION, DEFAULT_HOST, DEFAULT_PORT,
};
use crate::infrastructure::chroma::config::{ApiVersion, DEFAULT_DATABASE, DEFAULT_TENANT, DEFAULT_TIMEOUT};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const ENV_PREFIX: &str = "CHROMADESK_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Remote Chroma server over HTTP.
    Chroma,
    /// In-process store; contents last as long as the process.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Chroma => write!(f, "chroma"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chroma" | "http" => Ok(BackendKind::Chroma),
            "memory" | "mem" => Ok(BackendKind::Memory),
            _ => Err(format!("Unknown backend: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingChoice {
    /// Send raw text and let the server embed it. Stock Chroma servers
    /// reject this; opt in only for servers that embed on their side.
    Server,
    /// Offline feature hashing; the default.
    Hash,
    OpenAi,
    Voyage,
}

impl FromStr for EmbeddingChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "none" => Ok(EmbeddingChoice::Server),
            "hash" | "hashing" => Ok(EmbeddingChoice::Hash),
            "openai" => Ok(EmbeddingChoice::OpenAi),
            "voyage" => Ok(EmbeddingChoice::Voyage),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Endpoint,
    pub backend: BackendKind,
    pub api_version: ApiVersion,
    pub tenant: String,
    pub database: String,
    pub timeout: Duration,
    pub embedding: EmbeddingChoice,
    pub embedding_api_key: String,
    pub embedding_model: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            backend: BackendKind::Chroma,
            api_version: ApiVersion::default(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            embedding: EmbeddingChoice::Hash,
            embedding_api_key: String::new(),
            embedding_model: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; keys are the `CHROMADESK_*` names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| DomainError::Config(format!("{ENV_PREFIX}PORT={p}: {e}")))?,
            None => DEFAULT_PORT,
        };
        let timeout = match get("TIMEOUT_SECS") {
            Some(t) => Duration::from_secs(
                t.trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::Config(format!("{ENV_PREFIX}TIMEOUT_SECS={t}: {e}")))?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        let endpoint = Endpoint::new(
            get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            get("COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
        )
        .with_client_name(get("CLIENT_NAME").unwrap_or_else(|| DEFAULT_CLIENT_NAME.into()));

        Ok(Self {
            endpoint,
            backend: parse_or(get("BACKEND"), BackendKind::Chroma)?,
            api_version: parse_or(get("API"), ApiVersion::default())?,
            tenant: get("TENANT").unwrap_or_else(|| DEFAULT_TENANT.into()),
            database: get("DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            timeout,
            embedding: parse_or(get("EMBEDDING_PROVIDER"), EmbeddingChoice::Hash)?,
            embedding_api_key: get("EMBEDDING_API_KEY").unwrap_or_default(),
            embedding_model: get("EMBEDDING_MODEL"),
        })
    }
}

fn parse_or<T: FromStr<Err = String>>(value: Option<String>, default: T) -> Result<T, DomainError> {
    match value {
        Some(v) => v.parse().map_err(DomainError::Config),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let s = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(s.endpoint, Endpoint::default());
        assert_eq!(s.backend, BackendKind::Chroma);
        assert_eq!(s.embedding, EmbeddingChoice::Hash);
        assert_eq!(s.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let s = Settings::from_lookup(lookup(&[
            ("CHROMADESK_HOST", "chroma.local"),
            ("CHROMADESK_PORT", "9000"),
            ("CHROMADESK_COLLECTION", "notes"),
            ("CHROMADESK_BACKEND", "memory"),
            ("CHROMADESK_API", "v1"),
            ("CHROMADESK_TIMEOUT_SECS", "3"),
            ("CHROMADESK_EMBEDDING_PROVIDER", "server"),
        ]))
        .unwrap();
        assert_eq!(s.endpoint.base_url(), "http://chroma.local:9000");
        assert_eq!(s.endpoint.collection, "notes");
        assert_eq!(s.backend, BackendKind::Memory);
        assert_eq!(s.api_version, ApiVersion::V1);
        assert_eq!(s.timeout, Duration::from_secs(3));
        assert_eq!(s.embedding, EmbeddingChoice::Server);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("CHROMADESK_PORT", "99999")])).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("CHROMADESK_BACKEND", "sqlite")])).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }
}
