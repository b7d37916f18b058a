//! Per-item context expansion (synonyms, candidate categories, description).

mod error;
mod llm;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod types;


use std::future::Future;
use std::sync::Arc;

pub use error::ExpansionError;
pub use llm::LlmContextExpander;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockContextExpander;
pub use types::{ExpandedContext, ItemContext};

/// Produces an [`ExpandedContext`] for one shopping-list item name.
pub trait ContextExpander: Send + Sync {
    fn expand(
        &self,
        item_name: &str,
    ) -> impl Future<Output = Result<ExpandedContext, ExpansionError>> + Send;
}

impl<X: ContextExpander> ContextExpander for Arc<X> {
    fn expand(
        &self,
        item_name: &str,
    ) -> impl Future<Output = Result<ExpandedContext, ExpansionError>> + Send {
        (**self).expand(item_name)
    }
}
