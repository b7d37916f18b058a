use std::collections::HashMap;
use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::hashing::hash_embedding_input;

use super::Embedder;
use super::error::EmbeddingError;

/// Memoizing wrapper: only texts not seen before reach the inner embedder.
///
/// Category labels repeat across items and requests, so most category-matching
/// calls are served from memory.
pub struct CachedEmbedder<E> {
    inner: E,
    model: String,
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<E> std::fmt::Debug for CachedEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("model", &self.model)
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

impl<E: Embedder> CachedEmbedder<E> {
    /// `model` namespaces the cache keys; pass the inner embedder's model name.
    pub fn new(inner: E, model: impl Into<String>, capacity: u64) -> Self {
        Self {
            inner,
            model: model.into(),
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<[u8; 32]> = texts
            .iter()
            .map(|text| hash_embedding_input(&self.model, text))
            .collect();

        let mut resolved: Vec<Option<Arc<Vec<f32>>>> =
            keys.iter().map(|key| self.entries.get(key)).collect();

        // Unique misses, in first-seen order.
        let mut miss_slots: HashMap<[u8; 32], usize> = HashMap::new();
        let mut miss_texts: Vec<String> = Vec::new();
        for (i, slot) in resolved.iter().enumerate() {
            if slot.is_none() && !miss_slots.contains_key(&keys[i]) {
                miss_slots.insert(keys[i], miss_texts.len());
                miss_texts.push(texts[i].clone());
            }
        }

        debug!(
            requested = texts.len(),
            misses = miss_texts.len(),
            "Embedding cache lookup"
        );

        if !miss_texts.is_empty() {
            let vectors = self.inner.embed(&miss_texts).await?;
            if vectors.len() != miss_texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: miss_texts.len(),
                    actual: vectors.len(),
                });
            }

            let vectors: Vec<Arc<Vec<f32>>> = vectors.into_iter().map(Arc::new).collect();
            for (i, slot) in resolved.iter_mut().enumerate() {
                if slot.is_none()
                    && let Some(&miss_idx) = miss_slots.get(&keys[i])
                {
                    let vector = vectors[miss_idx].clone();
                    self.entries.insert(keys[i], vector.clone());
                    *slot = Some(vector);
                }
            }
        }

        resolved
            .into_iter()
            .map(|slot| {
                slot.map(|v| v.as_ref().clone())
                    .ok_or_else(|| EmbeddingError::MalformedResponse {
                        reason: "embedding missing after cache fill".to_string(),
                    })
            })
            .collect()
    }
}
