use thiserror::Error;

use crate::llm::LlmError;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum RelevanceError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("malformed relevance verdict: {reason}")]
    MalformedVerdict { reason: String },

    #[error("relevance service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<RelevanceError> for ServiceError {
    fn from(err: RelevanceError) -> Self {
        match err {
            RelevanceError::Llm(inner) => inner.into(),
            RelevanceError::MalformedVerdict { .. } => ServiceError::malformed(err.to_string()),
            RelevanceError::Unavailable { .. } => ServiceError::unavailable(err.to_string()),
        }
    }
}
