//! Request validation errors.

use thiserror::Error;

/// Result type for request validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Client-caused problems detected before any transform is started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required file field '{0}'")]
    MissingFile(String),

    #[error("Field '{field}' requires exactly {expected} files, got {actual}")]
    FileCount {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Parameter '{0}' is present but empty")]
    EmptyParameter(String),

    #[error("Parameter '{name}' is not a valid number: '{value}'")]
    InvalidParameter { name: String, value: String },

    #[error("Malformed multipart request: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub fn missing_file(field: impl Into<String>) -> Self {
        Self::MissingFile(field.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
