//! Error types for the model crate.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while decoding or encoding model types.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The input was not valid JSON for the requested type.
    #[error("json decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The input decoded, but was not the expected shape.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },
}

impl ModelError {
    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
