use tracing::debug;

use crate::llm::ChatModel;

use super::ContextExpander;
use super::error::ExpansionError;
use super::types::ExpandedContext;

const SYSTEM_PROMPT: &str = "You are a supermarket product specialist for Brazilian grocery stores. \
Given one shopping-list item, reply with a single JSON object of the form \
{\"synonyms\": [...], \"categories\": [...], \"description\": \"...\"}. \
`synonyms` lists other names shoppers use for the same product, \
`categories` lists supermarket sections where it is likely shelved (in Portuguese), \
and `description` is one short sentence describing the product and its common use. \
Reply with JSON only.";

/// [`ContextExpander`] backed by a chat model.
#[derive(Debug, Clone)]
pub struct LlmContextExpander {
    chat: ChatModel,
}

impl LlmContextExpander {
    pub fn new(chat: ChatModel) -> Self {
        Self { chat }
    }
}

impl ContextExpander for LlmContextExpander {
    async fn expand(&self, item_name: &str) -> Result<ExpandedContext, ExpansionError> {
        let user = format!("Shopping-list item: {item_name}");
        let expanded: ExpandedContext = self.chat.complete_json(SYSTEM_PROMPT, &user).await?;

        debug!(
            item = %item_name,
            synonyms = expanded.synonyms.len(),
            categories = expanded.categories.len(),
            "Expanded item context"
        );
        Ok(expanded)
    }
}
