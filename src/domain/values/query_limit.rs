use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the number of hits a similarity query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryLimit(usize);

impl QueryLimit {
    pub const DEFAULT: QueryLimit = QueryLimit(10);
    /// Default used by the agent-facing `query_documents` tool.
    pub const TOOL_DEFAULT: QueryLimit = QueryLimit(5);

    pub fn new(value: usize) -> Result<Self, String> {
        if value == 0 {
            return Err("Result limit must be a positive integer, got 0".to_string());
        }
        Ok(QueryLimit(value))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for QueryLimit {
    fn default() -> Self {
        QueryLimit::DEFAULT
    }
}

impl fmt::Display for QueryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for QueryLimit {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        QueryLimit::new(value)
    }
}
