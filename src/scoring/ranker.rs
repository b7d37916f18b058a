use tracing::{debug, warn};

use crate::catalog::CatalogProduct;
use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_RESULTS};
use crate::embedding::cosine_similarity;

use super::error::ScoringError;
use super::threshold::ThresholdPolicy;
use super::types::ProductMatch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerConfig {
    pub min_results: usize,
    pub max_results: usize,
    pub policy: ThresholdPolicy,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            min_results: DEFAULT_MIN_RESULTS,
            max_results: DEFAULT_MAX_RESULTS,
            policy: ThresholdPolicy::default(),
        }
    }
}

impl RankerConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        validate_limits(self.min_results, self.max_results)?;
        self.policy.validate()
    }
}

pub(crate) fn validate_limits(min_results: usize, max_results: usize) -> Result<(), ScoringError> {
    if max_results == 0 || min_results > max_results {
        return Err(ScoringError::InvalidLimits {
            min_results,
            max_results,
        });
    }
    Ok(())
}

/// Output of one ranking pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ranking {
    pub matches: Vec<ProductMatch>,
    /// Threshold applied; `None` when the pool was empty.
    pub threshold: Option<f32>,
    /// Fewer than `min_results` cleared the threshold and the top of the pool was taken instead.
    pub used_min_results_floor: bool,
    /// Candidates skipped because their embedding dimension differs from the query's.
    pub skipped_candidates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityRanker {
    config: RankerConfig,
}

impl SimilarityRanker {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn rank(&self, query: &[f32], candidates: &[&CatalogProduct]) -> Ranking {
        self.rank_with_limits(
            query,
            candidates,
            self.config.min_results,
            self.config.max_results,
        )
    }

    pub fn rank_with_limits(
        &self,
        query: &[f32],
        candidates: &[&CatalogProduct],
        min_results: usize,
        max_results: usize,
    ) -> Ranking {
        let mut skipped = 0usize;
        let mut scored: Vec<(&CatalogProduct, f32)> = Vec::with_capacity(candidates.len());
        for &product in candidates {
            if product.embedding.len() != query.len() {
                skipped += 1;
                continue;
            }
            scored.push((product, cosine_similarity(query, &product.embedding)));
        }

        if skipped > 0 {
            warn!(
                skipped,
                query_dim = query.len(),
                "Skipped candidates with mismatched embedding dimension"
            );
        }

        if scored.is_empty() {
            return Ranking {
                skipped_candidates: skipped,
                ..Ranking::default()
            };
        }

        let similarities: Vec<f32> = scored.iter().map(|(_, s)| *s).collect();
        let threshold = self.config.policy.threshold(&similarities);

        scored.sort_by(|(pa, sa), (pb, sb)| {
            sb.total_cmp(sa)
                .then_with(|| pa.product_id.cmp(&pb.product_id))
        });

        let pool = scored.len();
        let mut keep = scored.iter().take_while(|(_, s)| *s >= threshold).count();
        let used_floor = keep < min_results && pool >= min_results;
        if used_floor {
            keep = min_results;
        }
        keep = keep.min(max_results);

        debug!(
            pool,
            threshold,
            kept = keep,
            used_floor,
            "Ranked candidate pool"
        );

        Ranking {
            matches: scored
                .into_iter()
                .take(keep)
                .map(|(product, similarity)| ProductMatch::from_product(product, similarity))
                .collect(),
            threshold: Some(threshold),
            used_min_results_floor: used_floor,
            skipped_candidates: skipped,
        }
    }
}
