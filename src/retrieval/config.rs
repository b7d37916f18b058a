use crate::category::CategoryMatcherConfig;
use crate::scoring::RankerConfig;
use crate::service::ServiceLimits;

use super::error::RetrievalError;

/// Tunables for one [`RetrievalEngine`](super::RetrievalEngine).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalConfig {
    pub category: CategoryMatcherConfig,
    pub ranker: RankerConfig,
    pub limits: ServiceLimits,
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), RetrievalError> {
        self.category
            .validate()
            .map_err(|reason| RetrievalError::InvalidConfig { reason })?;
        self.ranker.validate()?;
        self.limits
            .validate()
            .map_err(|reason| RetrievalError::InvalidConfig { reason })
    }
}
