use serde::{Deserialize, Serialize};

use crate::catalog::LabelSet;
use crate::expansion::ItemContext;
use crate::llm::extract_json_object;
use crate::scoring::ProductMatch;

use super::error::RelevanceError;

/// The fields of a ranked match that the judge gets to see.
///
/// Also the shape of every entry the judge returns; all four fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub category: LabelSet,
}

impl From<&ProductMatch> for CandidateSummary {
    fn from(m: &ProductMatch) -> Self {
        Self {
            product_id: m.product_id.clone(),
            name: m.name.clone(),
            description: m.description.clone(),
            category: m.category.clone(),
        }
    }
}

/// Item context as sent to the judge. `description` falls back to the item name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeContext {
    pub name: String,
    pub synonyms: Vec<String>,
    pub categories: Vec<String>,
    pub description: String,
}

impl From<&ItemContext> for JudgeContext {
    fn from(context: &ItemContext) -> Self {
        Self {
            name: context.name.clone(),
            synonyms: context.synonyms.clone(),
            categories: context.categories.clone(),
            description: context.embedding_text().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceRequest {
    pub query_item: String,
    pub candidates: Vec<CandidateSummary>,
    pub context: JudgeContext,
}

impl RelevanceRequest {
    pub fn new(context: &ItemContext, matches: &[ProductMatch]) -> Self {
        Self {
            query_item: context.name.clone(),
            candidates: matches.iter().map(CandidateSummary::from).collect(),
            context: JudgeContext::from(context),
        }
    }
}

/// Candidates the judge kept. An empty list means nothing was relevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    pub matches: Vec<CandidateSummary>,
}

impl RelevanceVerdict {
    pub fn new(matches: Vec<CandidateSummary>) -> Self {
        Self { matches }
    }

    /// Parses a judge reply; anything but `{"matches": [CandidateSummary, ..]}` is
    /// a [`RelevanceError::MalformedVerdict`].
    pub fn from_reply(reply: &str) -> Result<Self, RelevanceError> {
        let json = extract_json_object(reply).ok_or_else(|| RelevanceError::MalformedVerdict {
            reason: "reply contains no JSON object".to_string(),
        })?;
        serde_json::from_str(json).map_err(|e| RelevanceError::MalformedVerdict {
            reason: e.to_string(),
        })
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.product_id.as_str())
    }
}
