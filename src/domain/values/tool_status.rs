use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an agent tool call. `Empty` means the call worked but found
/// nothing, which is distinct from `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Empty,
    Error,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Success => write!(f, "success"),
            ToolStatus::Empty => write!(f, "empty"),
            ToolStatus::Error => write!(f, "error"),
        }
    }
}
