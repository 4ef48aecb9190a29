use synaptic_core::SynapticError;
use thiserror::Error;

use crate::BackendError;

/// Failure of a single DuckDuckGo search or of tool setup.
#[derive(Debug, Error)]
pub enum DuckDuckGoError {
    /// The backend answered with zero records.
    #[error("No search results found.")]
    NoResults,
    /// A backend record did not have string `title`, `href` and `body` fields.
    #[error("search result {index} does not match the expected schema: {message}")]
    Validation { index: usize, message: String },
    /// Error raised by the backend, passed through as is.
    #[error(transparent)]
    Backend(BackendError),
    /// The blocking worker panicked or was cancelled.
    #[error("search worker failed: {0}")]
    Worker(String),
    #[error("{0}")]
    Config(String),
}

impl From<DuckDuckGoError> for SynapticError {
    fn from(err: DuckDuckGoError) -> Self {
        match err {
            DuckDuckGoError::Validation { .. } => SynapticError::Validation(err.to_string()),
            DuckDuckGoError::Config(msg) => SynapticError::Config(msg),
            DuckDuckGoError::NoResults
            | DuckDuckGoError::Backend(_)
            | DuckDuckGoError::Worker(_) => SynapticError::Tool(err.to_string()),
        }
    }
}
