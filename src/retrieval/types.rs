use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::scoring::ProductMatches;

/// One shopping-list entry; the name is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
}

impl GroceryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryList {
    pub items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn new(items: Vec<GroceryItem>) -> Self {
        Self { items }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: names.into_iter().map(GroceryItem::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item names in list order, each once.
    pub fn unique_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Which fallbacks fired while processing one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDiagnostics {
    /// Context expansion failed; a name-only context was used.
    pub context_degraded: bool,
    /// Category embedding failed; the whole catalog was searched.
    pub categories_fallback: bool,
    /// No category cleared the primary threshold; the fallback threshold was used.
    pub category_threshold_fallback: bool,
    /// No product name contained a keyword; the category pool was kept whole.
    pub keyword_fallback: bool,
    /// The top of the pool was taken because too few matches cleared the threshold.
    pub min_results_floor: bool,
    /// The item embedding could not be computed; no matches were ranked.
    pub ranking_failed: bool,
    /// The relevance judge failed; the ranked matches were kept.
    pub relevance_fallback: bool,
    /// Adaptive similarity threshold applied, if any candidates were scored.
    pub threshold: Option<f32>,
}

impl ItemDiagnostics {
    pub fn any_fallback(&self) -> bool {
        self.context_degraded
            || self.categories_fallback
            || self.category_threshold_fallback
            || self.keyword_fallback
            || self.min_results_floor
            || self.ranking_failed
            || self.relevance_fallback
    }
}

/// Output of one retrieval request.
///
/// `product_matches` has exactly one entry per distinct name in `corrected_list`; an
/// item is "not found" when its match list is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub corrected_list: GroceryList,
    pub product_matches: BTreeMap<String, ProductMatches>,
    #[serde(default)]
    pub diagnostics: BTreeMap<String, ItemDiagnostics>,
}

impl RetrievalResult {
    pub fn matches_for(&self, item: &str) -> Option<&ProductMatches> {
        self.product_matches.get(item)
    }
}
