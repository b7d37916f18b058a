use crate::constants::{
    DEFAULT_HIGH_MAX_CUTOFF, DEFAULT_HIGH_MAX_FACTOR, DEFAULT_MAX_SIMILARITY,
    DEFAULT_MIN_SIMILARITY, DEFAULT_SPREAD_CUTOFF, DEFAULT_SPREAD_WEIGHT,
};

use super::error::ScoringError;

/// Mean, population standard deviation and maximum of a similarity pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityStats {
    pub mean: f32,
    pub std_dev: f32,
    pub max: f32,
}

impl SimilarityStats {
    /// `None` for an empty pool.
    pub fn compute(similarities: &[f32]) -> Option<Self> {
        if similarities.is_empty() {
            return None;
        }

        let n = similarities.len() as f64;
        let mean = similarities.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = similarities
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let max = similarities
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        Some(Self {
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
            max,
        })
    }
}

/// Chooses the similarity cut-off for one candidate pool.
///
/// - a strong best match (`max > high_max_cutoff`) sets the bar relative to it:
///   `max(high_max_factor * max, min_threshold)`;
/// - otherwise a spread-out pool (`std_dev > spread_cutoff`) keeps what stands above
///   the crowd: `max(mean + spread_weight * std_dev, min_threshold)`;
/// - otherwise `min_threshold`.
///
/// `max_threshold` is validated against `min_threshold` but never applied as a ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    pub min_threshold: f32,
    pub max_threshold: f32,
    pub high_max_cutoff: f32,
    pub high_max_factor: f32,
    pub spread_cutoff: f32,
    pub spread_weight: f32,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            min_threshold: DEFAULT_MIN_SIMILARITY,
            max_threshold: DEFAULT_MAX_SIMILARITY,
            high_max_cutoff: DEFAULT_HIGH_MAX_CUTOFF,
            high_max_factor: DEFAULT_HIGH_MAX_FACTOR,
            spread_cutoff: DEFAULT_SPREAD_CUTOFF,
            spread_weight: DEFAULT_SPREAD_WEIGHT,
        }
    }
}

impl ThresholdPolicy {
    pub fn threshold(&self, similarities: &[f32]) -> f32 {
        match SimilarityStats::compute(similarities) {
            Some(stats) => self.threshold_for(&stats),
            None => self.min_threshold,
        }
    }

    pub fn threshold_for(&self, stats: &SimilarityStats) -> f32 {
        if stats.max > self.high_max_cutoff {
            (self.high_max_factor * stats.max).max(self.min_threshold)
        } else if stats.std_dev > self.spread_cutoff {
            (stats.mean + self.spread_weight * stats.std_dev).max(self.min_threshold)
        } else {
            self.min_threshold
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let invalid = |reason: String| Err(ScoringError::InvalidPolicy { reason });

        for (name, value) in [
            ("min_threshold", self.min_threshold),
            ("max_threshold", self.max_threshold),
            ("high_max_cutoff", self.high_max_cutoff),
            ("spread_cutoff", self.spread_cutoff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        if self.min_threshold > self.max_threshold {
            return invalid(format!(
                "min_threshold ({}) exceeds max_threshold ({})",
                self.min_threshold, self.max_threshold
            ));
        }
        if !(self.high_max_factor > 0.0 && self.high_max_factor <= 1.0) {
            return invalid(format!(
                "high_max_factor must be within (0, 1], got {}",
                self.high_max_factor
            ));
        }
        if !(self.spread_weight >= 0.0 && self.spread_weight.is_finite()) {
            return invalid(format!(
                "spread_weight must be non-negative, got {}",
                self.spread_weight
            ));
        }
        Ok(())
    }
}
