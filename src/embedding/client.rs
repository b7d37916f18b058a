use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::Embedder;
use super::config::EmbeddingConfig;
use super::error::EmbeddingError;

/// Embedder backed by an OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl HttpEmbedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        config
            .validate()
            .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut body = serde_json::json!({
            "model": self.config.model,
            "input": texts,
        });
        if let Some(dimensions) = self.config.dimensions {
            body["dimensions"] = dimensions.into();
        }

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        debug!(
            model = %self.config.model,
            inputs = texts.len(),
            "Requesting embeddings"
        );

        let bytes = request.send().await?.error_for_status()?.bytes().await?;

        parse_embedding_response(&bytes, texts.len())
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Parses an `/embeddings` response, restoring input order from `index`.
pub(crate) fn parse_embedding_response(
    bytes: &[u8],
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let response: EmbeddingResponse =
        serde_json::from_slice(bytes).map_err(|e| EmbeddingError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if response.data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: response.data.len(),
        });
    }

    let mut indexed: Vec<(usize, Vec<f32>)> = response
        .data
        .into_iter()
        .enumerate()
        .map(|(position, datum)| (datum.index.unwrap_or(position), datum.embedding))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);

    for (position, (index, _)) in indexed.iter().enumerate() {
        if *index != position {
            return Err(EmbeddingError::MalformedResponse {
                reason: format!("embedding indices are not a permutation of 0..{expected}"),
            });
        }
    }

    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
