use thiserror::Error;

use crate::llm::LlmError;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("context expansion unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<ExpansionError> for ServiceError {
    fn from(err: ExpansionError) -> Self {
        match err {
            ExpansionError::Llm(inner) => inner.into(),
            ExpansionError::Unavailable { .. } => ServiceError::unavailable(err.to_string()),
        }
    }
}
