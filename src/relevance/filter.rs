use std::collections::HashSet;

use tracing::{debug, warn};

use crate::expansion::ItemContext;
use crate::scoring::ProductMatch;
use crate::service::{ServiceGate, ServiceKind, ServiceOutcome};

use super::RelevanceJudge;
use super::types::RelevanceRequest;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome {
    /// Accepted matches in their original ranked order.
    pub matches: Vec<ProductMatch>,
    /// The judge failed and the ranked list was kept unchanged.
    pub used_fallback: bool,
    /// Accepted ids that were not among the candidates.
    pub dropped_unknown: usize,
}

/// Fail-open wrapper around a [`RelevanceJudge`].
#[derive(Debug, Clone)]
pub struct RelevanceFilter<J> {
    judge: J,
}

impl<J: RelevanceJudge> RelevanceFilter<J> {
    pub fn new(judge: J) -> Self {
        Self { judge }
    }

    pub fn judge(&self) -> &J {
        &self.judge
    }

    pub async fn filter(
        &self,
        gate: &ServiceGate,
        context: &ItemContext,
        ranked: Vec<ProductMatch>,
    ) -> FilterOutcome {
        if ranked.is_empty() {
            return FilterOutcome::default();
        }

        let request = RelevanceRequest::new(context, &ranked);
        let outcome = gate
            .call(ServiceKind::RelevanceFilter, self.judge.judge(&request))
            .await;

        match outcome {
            ServiceOutcome::Success(verdict) => {
                let (matches, dropped_unknown) = reconcile(ranked, verdict.product_ids());
                debug!(
                    item = %context.name,
                    kept = matches.len(),
                    dropped_unknown,
                    "Relevance filter applied"
                );
                FilterOutcome {
                    matches,
                    used_fallback: false,
                    dropped_unknown,
                }
            }
            ServiceOutcome::ServiceError { kind, detail } => {
                warn!(
                    item = %context.name,
                    kind = %kind,
                    detail = %detail,
                    "Relevance filter failed; keeping ranked matches"
                );
                FilterOutcome {
                    matches: ranked,
                    used_fallback: true,
                    dropped_unknown: 0,
                }
            }
        }
    }
}

/// Keeps ranked matches whose id was accepted, preserving ranked order.
///
/// Returns the kept matches and the number of distinct accepted ids that were not
/// among the candidates.
pub(crate) fn reconcile<'a>(
    ranked: Vec<ProductMatch>,
    accepted: impl IntoIterator<Item = &'a str>,
) -> (Vec<ProductMatch>, usize) {
    let accepted: HashSet<&str> = accepted.into_iter().collect();
    let known: HashSet<&str> = ranked.iter().map(|m| m.product_id.as_str()).collect();
    let unknown = accepted.iter().filter(|id| !known.contains(*id)).count();

    let mut seen: HashSet<String> = HashSet::new();
    let kept = ranked
        .into_iter()
        .filter(|m| accepted.contains(m.product_id.as_str()) && seen.insert(m.product_id.clone()))
        .collect();

    (kept, unknown)
}
