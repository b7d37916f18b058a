use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("invalid threshold policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("invalid result limits: min_results={min_results}, max_results={max_results}")]
    InvalidLimits {
        min_results: usize,
        max_results: usize,
    },
}
