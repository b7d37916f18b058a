//! Similarity ranking with an adaptive cut-off.
//!
//! [`SimilarityRanker`] scores a candidate pool against an item embedding, keeps the
//! candidates above the threshold chosen by [`ThresholdPolicy`] and applies the
//! min/max result limits.

pub mod error;
pub mod ranker;
pub mod threshold;
pub mod types;


pub use error::ScoringError;
pub use ranker::{RankerConfig, Ranking, SimilarityRanker};
pub use threshold::{SimilarityStats, ThresholdPolicy};
pub use types::{ProductMatch, ProductMatches};
