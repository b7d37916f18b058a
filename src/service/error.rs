use std::fmt;

use thiserror::Error;

/// Classification of an external-call failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    /// Network, HTTP status or provider failure.
    Transport,
    /// The call did not finish before its deadline.
    Timeout,
    /// The service answered with a payload that does not match the expected shape.
    MalformedResponse,
    /// The call could not be issued at all (gate closed, client not configured).
    Unavailable,
}

impl ServiceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceErrorKind::Transport => "transport",
            ServiceErrorKind::Timeout => "timeout",
            ServiceErrorKind::MalformedResponse => "malformed_response",
            ServiceErrorKind::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one external call, after classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {detail}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub detail: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Transport, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::MalformedResponse, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Timeout, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unavailable, detail)
    }
}
