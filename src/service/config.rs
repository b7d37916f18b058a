use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_TIMEOUT_MS, DEFAULT_EXPANSION_TIMEOUT_MS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_RELEVANCE_TIMEOUT_MS,
};

/// Bounds applied to every external call made during one retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLimits {
    /// Max external calls in flight at once.
    pub max_concurrency: usize,
    /// Deadline for one batched embedding call.
    pub embedding_timeout: Duration,
    /// Deadline for one context-expansion call.
    pub expansion_timeout: Duration,
    /// Deadline for one relevance-filter call.
    pub relevance_timeout: Duration,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            embedding_timeout: Duration::from_millis(DEFAULT_EMBEDDING_TIMEOUT_MS),
            expansion_timeout: Duration::from_millis(DEFAULT_EXPANSION_TIMEOUT_MS),
            relevance_timeout: Duration::from_millis(DEFAULT_RELEVANCE_TIMEOUT_MS),
        }
    }
}

impl ServiceLimits {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Applies the same deadline to all three services.
    pub fn with_uniform_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = timeout;
        self.expansion_timeout = timeout;
        self.relevance_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }

        for (name, timeout) in [
            ("embedding_timeout", self.embedding_timeout),
            ("expansion_timeout", self.expansion_timeout),
            ("relevance_timeout", self.relevance_timeout),
        ] {
            if timeout.is_zero() {
                return Err(format!("{name} must be greater than zero"));
            }
        }

        Ok(())
    }
}
