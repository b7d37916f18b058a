use serde::{Deserialize, Serialize};

/// Raw payload returned by a context-expansion service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedContext {
    #[serde(default, alias = "possible_synonyms")]
    pub synonyms: Vec<String>,
    #[serde(default, alias = "possible_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// What the ranking phase knows about one shopping-list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContext {
    pub name: String,
    pub synonyms: Vec<String>,
    pub categories: Vec<String>,
    pub description: Option<String>,
    /// Set when expansion failed and this context was synthesized from the name.
    #[serde(skip)]
    pub degraded: bool,
}

impl ItemContext {
    /// Stand-in context used when expansion fails: no synonyms, no categories,
    /// and the name doubles as the description.
    pub fn degraded(name: &str) -> Self {
        Self {
            name: name.to_string(),
            synonyms: Vec::new(),
            categories: Vec::new(),
            description: Some(name.to_string()),
            degraded: true,
        }
    }

    /// Builds a context from an expansion payload, dropping blank and repeated entries.
    pub fn from_expansion(name: &str, expanded: ExpandedContext) -> Self {
        Self {
            name: name.to_string(),
            synonyms: clean_labels(expanded.synonyms),
            categories: clean_labels(expanded.categories),
            description: expanded
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            degraded: false,
        }
    }

    /// Text embedded for similarity ranking: the description, else the name.
    pub fn embedding_text(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }

    /// The item name followed by its synonyms.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}
