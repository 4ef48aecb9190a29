use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DuckDuckGoError;

/// A DuckDuckGo search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the search result.
    pub title: String,
    /// The URL of the search result.
    pub href: String,
    /// The body of the search result.
    pub body: String,
}

/// Check every raw backend record against the [`SearchResult`] shape.
///
/// The first record with a missing or mistyped field fails the whole batch.
/// Unknown extra fields are ignored.
pub fn validate_results(records: Vec<Value>) -> Result<Vec<SearchResult>, DuckDuckGoError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|e| DuckDuckGoError::Validation {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
