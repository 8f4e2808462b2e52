//! Shared error type and query options.
//! No presentation or page state dependencies.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Queries shorter than this (after trimming) never scan the catalog.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Hard cap on the number of global search results.
pub const DEFAULT_RESULT_CAP: usize = 20;

/// Number of memoized result sets kept per query kind.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum Esp32RefError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid data directory: {0}")]
    InvalidDirectory(String),
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("Unrecognized route: {0}")]
    UnknownRoute(String),
}

impl Esp32RefError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Esp32RefError::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

/// How the global search result cap is shared between entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CapPolicy {
    /// Results fill in scan order (variants, pins, circuits, boards) until the cap is hit.
    Global,
    /// Each entity type contributes at most `limit` results before the global cap applies.
    PerType { limit: usize },
}

impl CapPolicy {
    pub(crate) fn per_type_limit(&self) -> usize {
        match self {
            CapPolicy::Global => usize::MAX,
            CapPolicy::PerType { limit } => *limit,
        }
    }
}

impl Default for CapPolicy {
    fn default() -> Self {
        CapPolicy::Global
    }
}

/// Tunables for the query engine.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "result_cap": 30, "cap_policy": { "mode": "per_type", "limit": 8 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub min_query_len: usize,
    pub result_cap: usize,
    pub cap_policy: CapPolicy,
    pub cache_capacity: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            result_cap: DEFAULT_RESULT_CAP,
            cap_policy: CapPolicy::Global,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl QueryOptions {
    /// Load options from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, Esp32RefError> {
        let content = std::fs::read_to_string(path)?;
        let options: QueryOptions = serde_json::from_str(&content)?;
        tracing::debug!("Loaded query options from {:?}: {:?}", path, options);
        Ok(options)
    }
}
