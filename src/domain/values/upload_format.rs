use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    /// One document per line.
    Text,
    /// A JSON array; each element becomes one document.
    Json,
}

impl UploadFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(UploadFormat::Text),
            "json" => Some(UploadFormat::Json),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "text/plain" => Some(UploadFormat::Text),
            "application/json" => Some(UploadFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFormat::Text => write!(f, "text"),
            UploadFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for UploadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(UploadFormat::Text),
            "json" => Ok(UploadFormat::Json),
            _ => UploadFormat::from_mime(s).ok_or_else(|| format!("Unknown upload format: {s}")),
        }
    }
}
