//! shelfmatch library crate (used by the CLI and integration tests).
//!
//! Matches free-form shopping-list items to products of a multi-vendor catalog.
//! Each item goes through context expansion, category matching, keyword
//! pre-filtering, embedding similarity ranking with an adaptive threshold and a
//! final relevance pass. External services sit behind traits.
//!
//! ## Core Types
//! - [`RetrievalEngine`], [`RetrievalConfig`], [`RetrievalResult`] - Orchestration
//! - [`Catalog`], [`CatalogProduct`], [`CategoryIndex`] - Read-only snapshot
//! - [`Config`], [`ConfigError`] - Environment configuration
//!
//! ## Pipeline Stages
//! - [`CategoryMatcher`] - Label to catalog category matching
//! - [`KeywordPrefilter`] - Lexical narrowing
//! - [`SimilarityRanker`], [`ThresholdPolicy`] - Ranking and adaptive cut-off
//! - [`RelevanceFilter`] - Fail-open relevance judging
//!
//! ## External Services
//! - [`Embedder`]: [`HttpEmbedder`], [`CachedEmbedder`]
//! - [`ContextExpander`]: [`LlmContextExpander`]
//! - [`RelevanceJudge`]: [`LlmRelevanceJudge`]
//! - [`ServiceGate`], [`ServiceOutcome`] - Concurrency cap, deadlines, tagged results
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod category;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod expansion;
pub mod hashing;
pub mod llm;
pub mod prefilter;
pub mod relevance;
pub mod retrieval;
pub mod scoring;
pub mod service;

pub use catalog::{Catalog, CatalogError, CatalogProduct, CategoryIndex, LabelSet};
pub use category::{CategoryMatch, CategoryMatcher, CategoryMatcherConfig};
pub use config::{Config, ConfigError};
pub use embedding::{
    CachedEmbedder, Embedder, EmbeddingConfig, EmbeddingError, HttpEmbedder, cosine_similarity,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbedder, stub_vector};
pub use expansion::{ContextExpander, ExpandedContext, ExpansionError, ItemContext, LlmContextExpander};
#[cfg(any(test, feature = "mock"))]
pub use expansion::MockContextExpander;
pub use hashing::{hash_embedding_input, hash_to_u64};
pub use llm::{ChatConfig, ChatModel, LlmError};
pub use prefilter::{KeywordPrefilter, Prefiltered};
pub use relevance::{
    CandidateSummary, FilterOutcome, JudgeContext, LlmRelevanceJudge, RelevanceError, RelevanceFilter,
    RelevanceJudge, RelevanceRequest, RelevanceVerdict,
};
#[cfg(any(test, feature = "mock"))]
pub use relevance::MockRelevanceJudge;
pub use retrieval::{
    GroceryItem, GroceryList, ItemDiagnostics, RetrievalConfig, RetrievalEngine, RetrievalError,
    RetrievalResult,
};
pub use scoring::{
    ProductMatch, ProductMatches, RankerConfig, Ranking, ScoringError, SimilarityRanker,
    ThresholdPolicy,
};
pub use service::{ServiceError, ServiceErrorKind, ServiceGate, ServiceKind, ServiceLimits, ServiceOutcome};
