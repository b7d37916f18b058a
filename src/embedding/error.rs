use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed embedding response: {reason}")]
    MalformedResponse { reason: String },

    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<EmbeddingError> for ServiceError {
    fn from(err: EmbeddingError) -> Self {
        match &err {
            EmbeddingError::Request(e) if e.is_timeout() => ServiceError::timeout(err.to_string()),
            EmbeddingError::Request(e) if e.is_decode() => {
                ServiceError::malformed(err.to_string())
            }
            EmbeddingError::Request(_) => ServiceError::transport(err.to_string()),
            EmbeddingError::MalformedResponse { .. } | EmbeddingError::CountMismatch { .. } => {
                ServiceError::malformed(err.to_string())
            }
            EmbeddingError::InvalidConfig { .. } | EmbeddingError::Unavailable { .. } => {
                ServiceError::unavailable(err.to_string())
            }
        }
    }
}
