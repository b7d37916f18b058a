use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::hashing::hash_to_u64;

use super::Embedder;
use super::error::EmbeddingError;

/// Deterministic in-memory embedder for tests.
///
/// Scripted texts return their registered vector; anything else gets a
/// [`stub_vector`] derived from the text.
pub struct MockEmbedder {
    dimension: usize,
    scripted: RwLock<HashMap<String, Vec<f32>>>,
    failing: RwLock<HashSet<String>>,
    fail_all: RwLock<bool>,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    texts_seen: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            scripted: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            fail_all: RwLock::new(false),
            delay: RwLock::new(None),
            calls: AtomicUsize::new(0),
            texts_seen: AtomicUsize::new(0),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.set_vector(text, vector);
        self
    }

    pub fn set_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.scripted.write().insert(text.into(), vector);
    }

    /// Any batch containing `text` fails.
    pub fn fail_on(&self, text: impl Into<String>) {
        self.failing.write().insert(text.into());
    }

    pub fn fail_all(&self, fail: bool) {
        *self.fail_all.write() = fail;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Number of `embed` calls that reached this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total number of texts across all calls.
    pub fn texts_embedded(&self) -> usize {
        self.texts_seen.load(Ordering::SeqCst)
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_all.read() {
            return Err(EmbeddingError::Unavailable {
                reason: "mock embedder set to fail".to_string(),
            });
        }

        {
            let failing = self.failing.read();
            if let Some(text) = texts.iter().find(|t| failing.contains(t.as_str())) {
                return Err(EmbeddingError::Unavailable {
                    reason: format!("mock embedder refuses '{text}'"),
                });
            }
        }

        let scripted = self.scripted.read();
        Ok(texts
            .iter()
            .map(|text| {
                scripted
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| stub_vector(text, self.dimension))
            })
            .collect())
    }
}

/// Unit-length pseudo-random vector seeded by the text.
pub fn stub_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut state = hash_to_u64(text.as_bytes()) | 1;

    let mut vector: Vec<f32> = (0..dimension)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state % 2000) as f32 / 1000.0) - 1.0
        })
        .collect();

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}
