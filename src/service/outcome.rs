use super::error::{ServiceError, ServiceErrorKind};

/// Result of one external call as seen by the pipeline.
///
/// Consumers match on this instead of probing payloads: either the call produced a
/// well-formed payload, or it failed with a classified error and the caller applies
/// its own degrade policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceOutcome<T> {
    Success(T),
    ServiceError {
        kind: ServiceErrorKind,
        detail: String,
    },
}

impl<T> ServiceOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ServiceOutcome::Success(_))
    }

    /// Returns the error kind, if the call failed.
    pub fn error_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            ServiceOutcome::Success(_) => None,
            ServiceOutcome::ServiceError { kind, .. } => Some(*kind),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ServiceOutcome::Success(value) => Some(value),
            ServiceOutcome::ServiceError { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<T, ServiceError> {
        match self {
            ServiceOutcome::Success(value) => Ok(value),
            ServiceOutcome::ServiceError { kind, detail } => Err(ServiceError { kind, detail }),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceOutcome<U> {
        match self {
            ServiceOutcome::Success(value) => ServiceOutcome::Success(f(value)),
            ServiceOutcome::ServiceError { kind, detail } => {
                ServiceOutcome::ServiceError { kind, detail }
            }
        }
    }
}

impl<T> From<ServiceError> for ServiceOutcome<T> {
    fn from(err: ServiceError) -> Self {
        ServiceOutcome::ServiceError {
            kind: err.kind,
            detail: err.detail,
        }
    }
}

impl<T> From<Result<T, ServiceError>> for ServiceOutcome<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(value) => ServiceOutcome::Success(value),
            Err(err) => err.into(),
        }
    }
}
