//! Relevance judging of ranked matches.
//!
//! A [`RelevanceJudge`] decides which ranked candidates really are the item the
//! shopper asked for. [`RelevanceFilter`] wraps a judge with the fail-open policy:
//! if the judge cannot answer, the ranked list stands.

mod error;
mod filter;
mod llm;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod types;


use std::future::Future;
use std::sync::Arc;

pub use error::RelevanceError;
pub use filter::{FilterOutcome, RelevanceFilter};
pub use llm::LlmRelevanceJudge;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRelevanceJudge;
pub use types::{CandidateSummary, JudgeContext, RelevanceRequest, RelevanceVerdict};

pub trait RelevanceJudge: Send + Sync {
    fn judge(
        &self,
        request: &RelevanceRequest,
    ) -> impl Future<Output = Result<RelevanceVerdict, RelevanceError>> + Send;
}

impl<J: RelevanceJudge> RelevanceJudge for Arc<J> {
    fn judge(
        &self,
        request: &RelevanceRequest,
    ) -> impl Future<Output = Result<RelevanceVerdict, RelevanceError>> + Send {
        (**self).judge(request)
    }
}
