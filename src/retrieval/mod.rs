//! Shopping-list retrieval: expansion, ranking and relevance filtering for every item.
//!
//! [`RetrievalEngine::retrieve`] runs three phases, each concurrent across items and
//! separated by a barrier:
//!
//! 1. context expansion (a failed expansion degrades to a name-only context);
//! 2. category matching, keyword pre-filtering and similarity ranking;
//! 3. relevance filtering (fails open to the ranked list).
//!
//! Per-item failures never abort the request; they are recorded in
//! [`ItemDiagnostics`]. [`aggregate`] holds presentation views over the result.

pub mod aggregate;
pub mod config;
mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregate::{ItemGroup, MarketGroup, group_by_item, group_by_market, not_found};
pub use config::RetrievalConfig;
pub use engine::RetrievalEngine;
pub use error::RetrievalError;
pub use types::{GroceryItem, GroceryList, ItemDiagnostics, RetrievalResult};
