use tracing::debug;

use crate::llm::ChatModel;

use super::RelevanceJudge;
use super::error::RelevanceError;
use super::types::{RelevanceRequest, RelevanceVerdict};

const SYSTEM_PROMPT: &str = "You review supermarket search results for one shopping-list item. \
You receive JSON {\"query_item\", \"candidates\": [{\"product_id\", \"name\", \"description\", \"category\"}], \"context\"} \
where context holds synonyms, likely categories and a description of the item. \
Keep only candidates that are the item itself; brand, size and flavour variations are fine, \
products merely made from or related to the item are not (for \"leite\", keep milk, \
drop condensed milk, cream and fermented milk). \
Reply with a single JSON object {\"matches\": [{\"product_id\", \"name\", \"description\", \"category\"}, ...]} \
copying each kept candidate exactly as received. \
An empty list means none of the candidates is relevant.";

/// [`RelevanceJudge`] backed by a chat model.
#[derive(Debug, Clone)]
pub struct LlmRelevanceJudge {
    chat: ChatModel,
}

impl LlmRelevanceJudge {
    pub fn new(chat: ChatModel) -> Self {
        Self { chat }
    }
}

impl RelevanceJudge for LlmRelevanceJudge {
    async fn judge(&self, request: &RelevanceRequest) -> Result<RelevanceVerdict, RelevanceError> {
        let payload =
            serde_json::to_string(request).map_err(|e| RelevanceError::MalformedVerdict {
                reason: format!("request encoding failed: {e}"),
            })?;

        let reply = self.chat.complete(SYSTEM_PROMPT, &payload).await?;
        let verdict = RelevanceVerdict::from_reply(&reply)?;

        debug!(
            item = %request.query_item,
            candidates = request.candidates.len(),
            accepted = verdict.matches.len(),
            "Relevance verdict received"
        );
        Ok(verdict)
    }
}
