//! Cross-cutting, shared constants.
//!
//! The numeric thresholds below are empirical defaults. Every one of them is
//! overridable through [`crate::config::Config`]; nothing in the pipeline reads
//! these directly except `Default` impls.

/// Primary cosine threshold for mapping a candidate label onto a catalog category.
pub const DEFAULT_CATEGORY_THRESHOLD: f32 = 0.75;

/// Second-pass category threshold, used only when the primary pass matched nothing.
pub const DEFAULT_CATEGORY_FALLBACK_THRESHOLD: f32 = 0.6;

/// Prefix applied to category labels before embedding (matches the offline index).
pub const CATEGORY_LABEL_PREFIX: &str = "categoria: ";

/// Floor of the adaptive similarity threshold.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// Upper bound of the adaptive threshold band (validated against the floor, not applied).
pub const DEFAULT_MAX_SIMILARITY: f32 = 0.7;

/// Max similarity above which the threshold is taken relative to the best candidate.
pub const DEFAULT_HIGH_MAX_CUTOFF: f32 = 0.8;

/// Fraction of the best similarity used as threshold when the best is above the cutoff.
pub const DEFAULT_HIGH_MAX_FACTOR: f32 = 0.65;

/// Standard deviation above which the distribution counts as clearly separated.
pub const DEFAULT_SPREAD_CUTOFF: f32 = 0.1;

/// Weight of the standard deviation added to the mean for separated distributions.
pub const DEFAULT_SPREAD_WEIGHT: f32 = 0.5;

pub const DEFAULT_MIN_RESULTS: usize = 3;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Cap on simultaneous external calls within one retrieval.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_EXPANSION_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_RELEVANCE_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

/// Separator used by the catalog snapshot for multi-valued fields.
pub const LABEL_SEPARATOR: char = '|';
