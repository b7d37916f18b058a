//! Plumbing shared by all external collaborators.
//!
//! Every call to the embedding, context-expansion and relevance services goes through
//! [`ServiceGate::call`], which caps concurrency with a semaphore, enforces a deadline
//! and folds the result into a [`ServiceOutcome`].

pub mod config;
pub mod error;
pub mod gate;
pub mod outcome;


pub use config::ServiceLimits;
pub use error::{ServiceError, ServiceErrorKind};
pub use gate::{ServiceGate, ServiceKind};
pub use outcome::ServiceOutcome;
