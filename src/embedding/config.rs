use std::time::Duration;

use crate::constants::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_TIMEOUT_MS, DEFAULT_EMBEDDING_URL};

/// Settings for [`HttpEmbedder`](super::HttpEmbedder).
#[derive(Clone)]
pub struct EmbeddingConfig {
    /// Full URL of an OpenAI-compatible `/embeddings` endpoint.
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Requested output dimension, for models that support shortening.
    pub dimensions: Option<usize>,
    /// Transport-level timeout; the service gate applies its own deadline on top.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("dimensions", &self.dimensions)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EMBEDDING_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            dimensions: None,
            request_timeout: Duration::from_millis(DEFAULT_EMBEDDING_TIMEOUT_MS),
        }
    }
}

impl EmbeddingConfig {
    const ENV_URL: &'static str = "SHELFMATCH_EMBEDDING_URL";
    const ENV_MODEL: &'static str = "SHELFMATCH_EMBEDDING_MODEL";
    const ENV_API_KEY: &'static str = "SHELFMATCH_EMBEDDING_API_KEY";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_DIMENSIONS: &'static str = "SHELFMATCH_EMBEDDING_DIMENSIONS";

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = non_empty_env(Self::ENV_URL).unwrap_or(defaults.api_url);
        let model = non_empty_env(Self::ENV_MODEL).unwrap_or(defaults.model);
        let api_key =
            non_empty_env(Self::ENV_API_KEY).or_else(|| non_empty_env(Self::ENV_OPENAI_API_KEY));
        let dimensions = non_empty_env(Self::ENV_DIMENSIONS).and_then(|v| v.parse().ok());

        Self {
            api_url,
            model,
            api_key,
            dimensions,
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("embedding api_url cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("embedding model cannot be empty".to_string());
        }
        if self.dimensions == Some(0) {
            return Err("embedding dimensions must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
