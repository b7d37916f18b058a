use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::join_all;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::category::CategoryMatcher;
use crate::embedding::Embedder;
use crate::expansion::{ContextExpander, ItemContext};
use crate::prefilter::KeywordPrefilter;
use crate::relevance::{FilterOutcome, RelevanceFilter, RelevanceJudge};
use crate::scoring::{ProductMatch, ProductMatches, SimilarityRanker, ranker::validate_limits};
use crate::service::{ServiceError, ServiceGate, ServiceKind, ServiceLimits, ServiceOutcome};

use super::config::RetrievalConfig;
use super::error::RetrievalError;
use super::types::{GroceryList, ItemDiagnostics, RetrievalResult};

/// Phase-2 output for one item.
#[derive(Debug, Default)]
struct RankedItem {
    matches: Vec<ProductMatch>,
    matched_categories: Vec<String>,
    diagnostics: ItemDiagnostics,
}

/// Matches shopping-list items against a shared catalog.
///
/// Built once per process; every [`retrieve`](Self::retrieve) call gets its own
/// [`ServiceGate`], so the concurrency cap applies per request.
pub struct RetrievalEngine<E, X, J> {
    catalog: Arc<Catalog>,
    embedder: E,
    expander: X,
    relevance: RelevanceFilter<J>,
    categories: CategoryMatcher,
    prefilter: KeywordPrefilter,
    ranker: SimilarityRanker,
    limits: ServiceLimits,
}

impl<E, X, J> std::fmt::Debug for RetrievalEngine<E, X, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("products", &self.catalog.len())
            .field("categories", &self.catalog.categories().len())
            .field("ranker", &self.ranker)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl<E, X, J> RetrievalEngine<E, X, J>
where
    E: Embedder,
    X: ContextExpander,
    J: RelevanceJudge,
{
    pub fn new(
        catalog: Arc<Catalog>,
        embedder: E,
        expander: X,
        judge: J,
        config: RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;

        Ok(Self {
            catalog,
            embedder,
            expander,
            relevance: RelevanceFilter::new(judge),
            categories: CategoryMatcher::new(config.category),
            prefilter: KeywordPrefilter::new(),
            ranker: SimilarityRanker::new(config.ranker),
            limits: config.limits,
        })
    }

    /// Loads the catalog snapshot and builds the engine over it.
    ///
    /// A missing, unreadable or invalid snapshot is [`RetrievalError::DataUnavailable`].
    pub fn from_snapshot(
        products_path: impl AsRef<Path>,
        categories_path: impl AsRef<Path>,
        embedder: E,
        expander: X,
        judge: J,
        config: RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;
        let catalog = Catalog::load(products_path, categories_path)?;
        Self::new(Arc::new(catalog), embedder, expander, judge, config)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn expander(&self) -> &X {
        &self.expander
    }

    pub fn judge(&self) -> &J {
        self.relevance.judge()
    }

    /// Retrieves matches with the configured result limits.
    pub async fn retrieve(&self, list: &GroceryList) -> Result<RetrievalResult, RetrievalError> {
        let config = self.ranker.config();
        self.retrieve_with_limits(list, config.min_results, config.max_results)
            .await
    }

    pub async fn retrieve_with_limits(
        &self,
        list: &GroceryList,
        min_results: usize,
        max_results: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        validate_limits(min_results, max_results)?;

        let request_id = Uuid::new_v4();
        let span = info_span!("retrieve", %request_id, items = list.len());

        self.run(list, min_results, max_results)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        list: &GroceryList,
        min_results: usize,
        max_results: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        let names = list.unique_names();
        let gate = ServiceGate::new(self.limits.clone());

        let contexts: HashMap<&str, ItemContext> =
            join_all(names.iter().map(|&name| self.expand_item(&gate, name)))
                .await
                .into_iter()
                .collect();
        info!(items = contexts.len(), "Context expansion complete");

        let mut ranked: HashMap<&str, RankedItem> = join_all(
            contexts
                .iter()
                .map(|(&name, ctx)| self.rank_item(&gate, name, ctx, min_results, max_results)),
        )
        .await
        .into_iter()
        .collect();
        info!(items = ranked.len(), "Ranking complete");

        let filtered: HashMap<&str, FilterOutcome> = join_all(ranked.iter().map(|(&name, item)| {
            let ctx = &contexts[name];
            self.filter_item(&gate, name, ctx, item.matches.clone())
        }))
        .await
        .into_iter()
        .collect();
        info!(items = filtered.len(), "Relevance filtering complete");

        let mut product_matches = BTreeMap::new();
        let mut diagnostics = BTreeMap::new();
        for (name, outcome) in filtered {
            let item = ranked.remove(name).unwrap_or_default();
            let mut diag = item.diagnostics;
            diag.context_degraded = contexts.get(name).is_some_and(|ctx| ctx.degraded);
            diag.relevance_fallback = outcome.used_fallback;

            if diag.any_fallback() {
                debug!(item = %name, ?diag, "Item used fallbacks");
            }

            product_matches.insert(
                name.to_string(),
                ProductMatches {
                    query_item: name.to_string(),
                    matches: outcome.matches,
                    matched_categories: item.matched_categories,
                },
            );
            diagnostics.insert(name.to_string(), diag);
        }

        let not_found = product_matches.values().filter(|m| m.is_empty()).count();
        info!(
            items = product_matches.len(),
            not_found, "Retrieval complete"
        );

        Ok(RetrievalResult {
            corrected_list: list.clone(),
            product_matches,
            diagnostics,
        })
    }

    /// Phase 1. Never fails: errors, timeouts and panics degrade the context.
    async fn expand_item<'n>(&self, gate: &ServiceGate, name: &'n str) -> (&'n str, ItemContext) {
        let call = gate.call(ServiceKind::ContextExpansion, self.expander.expand(name));

        let context = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(ServiceOutcome::Success(expanded)) => ItemContext::from_expansion(name, expanded),
            Ok(ServiceOutcome::ServiceError { kind, .. }) => {
                warn!(item = %name, kind = %kind, "Context expansion failed; using name only");
                ItemContext::degraded(name)
            }
            Err(_) => {
                warn!(item = %name, "Context expansion panicked; using name only");
                ItemContext::degraded(name)
            }
        };

        (name, context)
    }

    /// Phase 2. A panic yields an empty, `ranking_failed` item.
    async fn rank_item<'n>(
        &self,
        gate: &ServiceGate,
        name: &'n str,
        context: &ItemContext,
        min_results: usize,
        max_results: usize,
    ) -> (&'n str, RankedItem) {
        let ranked = AssertUnwindSafe(self.rank_candidates(gate, context, min_results, max_results))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                warn!(item = %name, "Ranking panicked; item has no matches");
                RankedItem {
                    diagnostics: ItemDiagnostics {
                        ranking_failed: true,
                        ..Default::default()
                    },
                    ..Default::default()
                }
            });

        (name, ranked)
    }

    async fn rank_candidates(
        &self,
        gate: &ServiceGate,
        context: &ItemContext,
        min_results: usize,
        max_results: usize,
    ) -> RankedItem {
        let mut diagnostics = ItemDiagnostics::default();

        let matched = match self
            .categories
            .match_labels(
                &self.embedder,
                gate,
                &context.categories,
                self.catalog.categories(),
            )
            .await
        {
            ServiceOutcome::Success(matched) => matched,
            ServiceOutcome::ServiceError { kind, .. } => {
                warn!(item = %context.name, kind = %kind, "Category matching failed; searching whole catalog");
                diagnostics.categories_fallback = true;
                Default::default()
            }
        };
        diagnostics.category_threshold_fallback = matched.used_fallback;

        let pool = self.catalog.in_categories(&matched.categories);
        let prefiltered = self.prefilter.apply(context.keywords(), pool);
        diagnostics.keyword_fallback = prefiltered.used_fallback;

        let matched_categories: Vec<String> = matched.categories.into_iter().collect();

        if prefiltered.candidates.is_empty() {
            debug!(item = %context.name, "Empty candidate pool");
            return RankedItem {
                matches: Vec::new(),
                matched_categories,
                diagnostics,
            };
        }

        let query_text = vec![context.embedding_text().to_string()];
        let outcome = gate
            .call(ServiceKind::Embedding, self.embedder.embed(&query_text))
            .await;
        let query = match single_vector(outcome) {
            ServiceOutcome::Success(query) => query,
            ServiceOutcome::ServiceError { kind, detail } => {
                warn!(item = %context.name, kind = %kind, detail = %detail, "Item embedding failed; item has no matches");
                diagnostics.ranking_failed = true;
                return RankedItem {
                    matches: Vec::new(),
                    matched_categories,
                    diagnostics,
                };
            }
        };

        let ranking =
            self.ranker
                .rank_with_limits(&query, &prefiltered.candidates, min_results, max_results);
        diagnostics.min_results_floor = ranking.used_min_results_floor;
        diagnostics.threshold = ranking.threshold;

        debug!(
            item = %context.name,
            candidates = prefiltered.candidates.len(),
            matches = ranking.matches.len(),
            "Ranked item"
        );

        RankedItem {
            matches: ranking.matches,
            matched_categories,
            diagnostics,
        }
    }

    /// Phase 3. A panic keeps the ranked matches, like any other judge failure.
    async fn filter_item<'n>(
        &self,
        gate: &ServiceGate,
        name: &'n str,
        context: &ItemContext,
        ranked: Vec<ProductMatch>,
    ) -> (&'n str, FilterOutcome) {
        let fallback = ranked.clone();
        let outcome = AssertUnwindSafe(self.relevance.filter(gate, context, ranked))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                warn!(item = %name, "Relevance filter panicked; keeping ranked matches");
                FilterOutcome {
                    matches: fallback,
                    used_fallback: true,
                    dropped_unknown: 0,
                }
            });

        (name, outcome)
    }
}

/// The one query vector of a single-text embedding call, which must be finite.
fn single_vector(outcome: ServiceOutcome<Vec<Vec<f32>>>) -> ServiceOutcome<Vec<f32>> {
    match outcome {
        ServiceOutcome::Success(mut vectors) if vectors.len() == 1 => {
            let vector = vectors.swap_remove(0);
            if vector.iter().all(|v| v.is_finite()) {
                ServiceOutcome::Success(vector)
            } else {
                ServiceError::malformed("query embedding has non-finite values").into()
            }
        }
        ServiceOutcome::Success(vectors) => ServiceError::malformed(format!(
            "expected 1 query embedding, got {}",
            vectors.len()
        ))
        .into(),
        ServiceOutcome::ServiceError { kind, detail } => ServiceOutcome::ServiceError { kind, detail },
    }
}
