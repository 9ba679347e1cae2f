use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Network request failed: {0}")]
    NetworkFailure(String),

    #[error("API returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FinderError {
    /// True for failures caused by the remote API rather than local input or storage.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FinderError::NetworkFailure(_)
                | FinderError::ApiError { .. }
                | FinderError::MalformedResponse(_)
                | FinderError::SerializationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
