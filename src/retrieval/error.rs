use thiserror::Error;

use crate::catalog::CatalogError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The catalog or category index cannot be used; no item was processed.
    #[error("catalog data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("invalid retrieval configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    InvalidLimits(#[from] ScoringError),
}

impl From<CatalogError> for RetrievalError {
    fn from(err: CatalogError) -> Self {
        RetrievalError::DataUnavailable {
            reason: err.to_string(),
        }
    }
}
