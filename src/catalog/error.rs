//! Catalog loading and validation errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the catalog snapshot.
///
/// All of these mean the catalog is unusable; they convert into
/// [`RetrievalError::DataUnavailable`](crate::retrieval::RetrievalError::DataUnavailable).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Snapshot file could not be opened or read.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON for the expected layout.
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No products, or no categories.
    #[error("catalog has no {what}")]
    Empty { what: &'static str },

    #[error("duplicate product id in catalog: {product_id}")]
    DuplicateProduct { product_id: String },

    /// Embedding vectors disagree on dimension.
    #[error("embedding dimension mismatch for {owner}: expected {expected}, got {actual}")]
    DimensionMismatch {
        owner: String,
        expected: usize,
        actual: usize,
    },

    #[error("embedding for {owner} is empty")]
    ZeroDimension { owner: String },

    /// An embedding holds NaN or infinity (e.g. a value beyond `f32` range).
    #[error("embedding for {owner} has a non-finite value at index {index}")]
    NonFiniteEmbedding { owner: String, index: usize },
}
