use std::collections::{HashMap, HashSet};
use std::time::Duration;

use parking_lot::RwLock;

use super::ContextExpander;
use super::error::ExpansionError;
use super::types::ExpandedContext;

/// Scripted expander for tests.
///
/// Unscripted items expand to an empty context with no description.
#[derive(Default)]
pub struct MockContextExpander {
    scripted: RwLock<HashMap<String, ExpandedContext>>,
    failing: RwLock<HashSet<String>>,
    panicking: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
}

impl MockContextExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(
        self,
        item: impl Into<String>,
        synonyms: &[&str],
        categories: &[&str],
        description: Option<&str>,
    ) -> Self {
        self.scripted.write().insert(
            item.into(),
            ExpandedContext {
                synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
                categories: categories.iter().map(|s| s.to_string()).collect(),
                description: description.map(str::to_string),
            },
        );
        self
    }

    pub fn fail_on(&self, item: impl Into<String>) {
        self.failing.write().insert(item.into());
    }

    /// The expansion future for `item` panics when polled.
    pub fn panic_on(&self, item: impl Into<String>) {
        self.panicking.write().insert(item.into());
    }

    pub fn delay_for(&self, item: impl Into<String>, delay: Duration) {
        self.delays.write().insert(item.into(), delay);
    }
}

impl ContextExpander for MockContextExpander {
    async fn expand(&self, item_name: &str) -> Result<ExpandedContext, ExpansionError> {
        let delay = self.delays.read().get(item_name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.panicking.read().contains(item_name) {
            panic!("mock expander panic for '{item_name}'");
        }
        if self.failing.read().contains(item_name) {
            return Err(ExpansionError::Unavailable {
                reason: format!("mock expander refuses '{item_name}'"),
            });
        }

        Ok(self
            .scripted
            .read()
            .get(item_name)
            .cloned()
            .unwrap_or_default())
    }
}
