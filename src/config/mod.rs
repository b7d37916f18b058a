//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SHELFMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::DEFAULT_EMBEDDING_CACHE_CAPACITY;
use crate::embedding::EmbeddingConfig;
use crate::llm::ChatConfig;
use crate::retrieval::RetrievalConfig;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SHELFMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Product snapshot (JSON array). Default: `./data/catalog.json`.
    pub catalog_path: PathBuf,

    /// Category embeddings (JSON object). Default: `./data/category_index.json`.
    pub category_index_path: PathBuf,

    pub retrieval: RetrievalConfig,

    pub embedding: EmbeddingConfig,

    pub chat: ChatConfig,

    /// Max memoized embeddings. Default: `10_000`.
    pub embedding_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./data/catalog.json"),
            category_index_path: PathBuf::from("./data/category_index.json"),
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
            embedding_cache_capacity: DEFAULT_EMBEDDING_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_CATALOG_PATH: &'static str = "SHELFMATCH_CATALOG_PATH";
    const ENV_CATEGORY_INDEX_PATH: &'static str = "SHELFMATCH_CATEGORY_INDEX_PATH";
    const ENV_MIN_RESULTS: &'static str = "SHELFMATCH_MIN_RESULTS";
    const ENV_MAX_RESULTS: &'static str = "SHELFMATCH_MAX_RESULTS";
    const ENV_CATEGORY_THRESHOLD: &'static str = "SHELFMATCH_CATEGORY_THRESHOLD";
    const ENV_CATEGORY_FALLBACK_THRESHOLD: &'static str = "SHELFMATCH_CATEGORY_FALLBACK_THRESHOLD";
    const ENV_MIN_SIMILARITY: &'static str = "SHELFMATCH_MIN_SIMILARITY";
    const ENV_MAX_SIMILARITY: &'static str = "SHELFMATCH_MAX_SIMILARITY";
    const ENV_MAX_CONCURRENCY: &'static str = "SHELFMATCH_MAX_CONCURRENCY";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "SHELFMATCH_EMBEDDING_TIMEOUT_MS";
    const ENV_EXPANSION_TIMEOUT_MS: &'static str = "SHELFMATCH_EXPANSION_TIMEOUT_MS";
    const ENV_RELEVANCE_TIMEOUT_MS: &'static str = "SHELFMATCH_RELEVANCE_TIMEOUT_MS";
    const ENV_EMBEDDING_CACHE_CAPACITY: &'static str = "SHELFMATCH_EMBEDDING_CACHE_CAPACITY";
    const ENV_EMBEDDING_DIMENSIONS: &'static str = "SHELFMATCH_EMBEDDING_DIMENSIONS";
    const ENV_CHAT_TEMPERATURE: &'static str = "SHELFMATCH_CHAT_TEMPERATURE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let category_index_path =
            Self::parse_path_from_env(Self::ENV_CATEGORY_INDEX_PATH, defaults.category_index_path);

        let mut retrieval = defaults.retrieval;
        let ranker = &mut retrieval.ranker;
        ranker.min_results = Self::parse_from_env(Self::ENV_MIN_RESULTS, ranker.min_results)?;
        ranker.max_results = Self::parse_from_env(Self::ENV_MAX_RESULTS, ranker.max_results)?;
        ranker.policy.min_threshold =
            Self::parse_from_env(Self::ENV_MIN_SIMILARITY, ranker.policy.min_threshold)?;
        ranker.policy.max_threshold =
            Self::parse_from_env(Self::ENV_MAX_SIMILARITY, ranker.policy.max_threshold)?;

        let category = &mut retrieval.category;
        category.primary_threshold =
            Self::parse_from_env(Self::ENV_CATEGORY_THRESHOLD, category.primary_threshold)?;
        category.fallback_threshold = Self::parse_from_env(
            Self::ENV_CATEGORY_FALLBACK_THRESHOLD,
            category.fallback_threshold,
        )?;

        let limits = &mut retrieval.limits;
        limits.max_concurrency =
            Self::parse_from_env(Self::ENV_MAX_CONCURRENCY, limits.max_concurrency)?;
        limits.embedding_timeout =
            Self::parse_millis_from_env(Self::ENV_EMBEDDING_TIMEOUT_MS, limits.embedding_timeout)?;
        limits.expansion_timeout =
            Self::parse_millis_from_env(Self::ENV_EXPANSION_TIMEOUT_MS, limits.expansion_timeout)?;
        limits.relevance_timeout =
            Self::parse_millis_from_env(Self::ENV_RELEVANCE_TIMEOUT_MS, limits.relevance_timeout)?;

        let mut embedding = EmbeddingConfig::from_env();
        // Transport timeout tracks the gate deadline.
        embedding.request_timeout = limits.embedding_timeout;
        embedding.dimensions = Self::parse_optional_from_env(Self::ENV_EMBEDDING_DIMENSIONS)?;

        let mut chat = ChatConfig::from_env();
        chat.temperature = Self::parse_from_env(Self::ENV_CHAT_TEMPERATURE, chat.temperature)?;

        let embedding_cache_capacity = Self::parse_from_env(
            Self::ENV_EMBEDDING_CACHE_CAPACITY,
            defaults.embedding_cache_capacity,
        )?;

        Ok(Self {
            catalog_path,
            category_index_path,
            retrieval,
            embedding,
            chat,
            embedding_cache_capacity,
        })
    }

    /// Validates paths and cross-field invariants (does not read the files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_file(&self.catalog_path)?;
        Self::validate_file(&self.category_index_path)?;

        self.retrieval
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "retrieval",
                reason: e.to_string(),
            })?;
        self.embedding
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                section: "embedding",
                reason,
            })?;
        self.chat.validate().map_err(|reason| ConfigError::Invalid {
            section: "chat",
            reason,
        })?;

        if self.embedding_cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                section: "embedding cache",
                reason: "capacity must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn validate_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_from_env<T: FromStr>(var_name: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: var_name,
                        value,
                        expected: std::any::type_name::<T>(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn parse_optional_from_env<T: FromStr>(var_name: &'static str) -> Result<Option<T>, ConfigError> {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    expected: std::any::type_name::<T>(),
                }),
            _ => Ok(None),
        }
    }

    fn parse_millis_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        let millis = Self::parse_from_env(var_name, default.as_millis() as u64)?;
        Ok(Duration::from_millis(millis))
    }
}
