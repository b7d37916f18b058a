use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::config::ServiceLimits;
use super::error::ServiceError;
use super::outcome::ServiceOutcome;

/// Which external collaborator a call goes to (selects the deadline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Embedding,
    ContextExpansion,
    RelevanceFilter,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Embedding => "embedding",
            ServiceKind::ContextExpansion => "context_expansion",
            ServiceKind::RelevanceFilter => "relevance_filter",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission control for external calls: a concurrency cap plus per-service deadlines.
///
/// Cloning shares the same permit pool.
#[derive(Debug, Clone)]
pub struct ServiceGate {
    permits: Arc<Semaphore>,
    limits: ServiceLimits,
}

impl ServiceGate {
    pub fn new(limits: ServiceLimits) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limits.max_concurrency.max(1))),
            limits,
        }
    }

    pub fn limits(&self) -> &ServiceLimits {
        &self.limits
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn deadline(&self, service: ServiceKind) -> Duration {
        match service {
            ServiceKind::Embedding => self.limits.embedding_timeout,
            ServiceKind::ContextExpansion => self.limits.expansion_timeout,
            ServiceKind::RelevanceFilter => self.limits.relevance_timeout,
        }
    }

    /// Runs `call` once a permit is free, bounded by the service deadline.
    ///
    /// `call` must be lazy (an un-polled future); no work happens before the permit
    /// is held. Expiry is reported as [`ServiceErrorKind::Timeout`](super::ServiceErrorKind::Timeout)
    /// and the in-flight future is dropped.
    pub async fn call<T, E, F>(&self, service: ServiceKind, call: F) -> ServiceOutcome<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ServiceError>,
    {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return ServiceError::unavailable(format!("{service} gate is closed")).into();
            }
        };

        let deadline = self.deadline(service);
        debug!(service = %service, deadline_ms = deadline.as_millis() as u64, "Issuing external call");

        match tokio::time::timeout(deadline, call).await {
            Ok(Ok(value)) => ServiceOutcome::Success(value),
            Ok(Err(err)) => {
                let err: ServiceError = err.into();
                warn!(
                    service = %service,
                    kind = %err.kind,
                    detail = %err.detail,
                    "External call failed"
                );
                err.into()
            }
            Err(_) => {
                warn!(
                    service = %service,
                    deadline_ms = deadline.as_millis() as u64,
                    "External call timed out"
                );
                ServiceError::timeout(format!("{service} call exceeded {deadline:?}")).into()
            }
        }
    }

    /// Closes the gate; pending and future calls resolve as `Unavailable`.
    pub fn close(&self) {
        self.permits.close();
    }
}
