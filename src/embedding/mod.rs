//! Text embedding.
//!
//! - [`HttpEmbedder`] calls an OpenAI-compatible `/embeddings` endpoint.
//! - [`CachedEmbedder`] memoizes any [`Embedder`] by `(model, text)`.
//! - [`cosine_similarity`] is the scoring primitive shared by category matching and ranking.

mod cached;
mod client;
pub mod config;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod similarity;


use std::future::Future;
use std::sync::Arc;

pub use cached::CachedEmbedder;
pub use client::HttpEmbedder;
pub use config::EmbeddingConfig;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbedder, stub_vector};
pub use similarity::cosine_similarity;

/// Turns texts into vectors, one per input, in input order.
pub trait Embedder: Send + Sync {
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;
}

impl<E: Embedder> Embedder for Arc<E> {
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send {
        (**self).embed(texts)
    }
}
