use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::CategoryIndex;
use crate::constants::{
    CATEGORY_LABEL_PREFIX, DEFAULT_CATEGORY_FALLBACK_THRESHOLD, DEFAULT_CATEGORY_THRESHOLD,
};
use crate::embedding::{Embedder, cosine_similarity};
use crate::service::{ServiceError, ServiceGate, ServiceKind, ServiceOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatcherConfig {
    pub primary_threshold: f32,
    /// Used only when no category clears `primary_threshold`.
    pub fallback_threshold: f32,
    /// Prepended to each label before embedding.
    pub label_prefix: String,
}

impl Default for CategoryMatcherConfig {
    fn default() -> Self {
        Self {
            primary_threshold: DEFAULT_CATEGORY_THRESHOLD,
            fallback_threshold: DEFAULT_CATEGORY_FALLBACK_THRESHOLD,
            label_prefix: CATEGORY_LABEL_PREFIX.to_string(),
        }
    }
}

impl CategoryMatcherConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("primary_threshold", self.primary_threshold),
            ("fallback_threshold", self.fallback_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("category {name} must be within [0, 1], got {value}"));
            }
        }
        if self.fallback_threshold > self.primary_threshold {
            return Err(format!(
                "category fallback_threshold ({}) exceeds primary_threshold ({})",
                self.fallback_threshold, self.primary_threshold
            ));
        }
        Ok(())
    }
}

/// Catalog categories selected for one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMatch {
    pub categories: BTreeSet<String>,
    /// Nothing cleared the primary threshold and the fallback threshold was applied.
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryMatcher {
    config: CategoryMatcherConfig,
}

impl CategoryMatcher {
    pub fn new(config: CategoryMatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CategoryMatcherConfig {
        &self.config
    }

    /// Embeds `labels` in one batch and selects matching catalog categories.
    ///
    /// No labels means no embedding call and an empty match.
    pub async fn match_labels<E: Embedder>(
        &self,
        embedder: &E,
        gate: &ServiceGate,
        labels: &[String],
        index: &CategoryIndex,
    ) -> ServiceOutcome<CategoryMatch> {
        if labels.is_empty() {
            return ServiceOutcome::Success(CategoryMatch::default());
        }

        let texts: Vec<String> = labels
            .iter()
            .map(|label| format!("{}{label}", self.config.label_prefix))
            .collect();

        let vectors = match gate
            .call(ServiceKind::Embedding, embedder.embed(&texts))
            .await
        {
            ServiceOutcome::Success(vectors) => vectors,
            ServiceOutcome::ServiceError { kind, detail } => {
                return ServiceOutcome::ServiceError { kind, detail };
            }
        };

        if vectors.len() != labels.len() {
            return ServiceError::malformed(format!(
                "expected {} label embeddings, got {}",
                labels.len(),
                vectors.len()
            ))
            .into();
        }

        if vectors.iter().flatten().any(|v| !v.is_finite()) {
            return ServiceError::malformed("label embedding has non-finite values").into();
        }

        ServiceOutcome::Success(self.select(&vectors, index))
    }

    /// Categories whose embedding is close enough to any label vector.
    pub fn select(&self, label_vectors: &[Vec<f32>], index: &CategoryIndex) -> CategoryMatch {
        let best: Vec<(&str, f32)> = index
            .iter()
            .map(|(name, embedding)| {
                let score = label_vectors
                    .iter()
                    .map(|v| cosine_similarity(v, embedding))
                    .fold(f32::NEG_INFINITY, f32::max);
                (name, score)
            })
            .collect();

        let above = |threshold: f32| -> BTreeSet<String> {
            best.iter()
                .filter(|(_, score)| *score >= threshold)
                .map(|(name, _)| name.to_string())
                .collect()
        };

        let primary = above(self.config.primary_threshold);
        if !primary.is_empty() || label_vectors.is_empty() {
            debug!(matched = primary.len(), "Matched categories");
            return CategoryMatch {
                categories: primary,
                used_fallback: false,
            };
        }

        let fallback = above(self.config.fallback_threshold);
        debug!(
            matched = fallback.len(),
            threshold = self.config.fallback_threshold,
            "Matched categories with fallback threshold"
        );
        CategoryMatch {
            categories: fallback,
            used_fallback: true,
        }
    }
}
