use thiserror::Error;

/// Error type shared across the Synaptic crates.
#[derive(Debug, Error)]
pub enum SynapticError {
    #[error("tool error: {0}")]
    Tool(String),
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SynapticError {
    fn from(err: serde_json::Error) -> Self {
        SynapticError::Serialization(err.to_string())
    }
}
