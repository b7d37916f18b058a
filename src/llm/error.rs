use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat provider error: {0}")]
    Provider(#[from] genai::Error),

    #[error("chat reply was empty")]
    EmptyReply,

    #[error("no JSON object in chat reply")]
    NoJsonObject,

    #[error("chat reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Provider(_) => ServiceError::transport(err.to_string()),
            LlmError::EmptyReply | LlmError::NoJsonObject | LlmError::InvalidJson(_) => {
                ServiceError::malformed(err.to_string())
            }
        }
    }
}
