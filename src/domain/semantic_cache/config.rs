//! Semantic cache configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a lookup picks among records that clear the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Return the first record in insertion order that clears the threshold
    #[default]
    FirstMatch,
    /// Scan every record and return the most similar one that clears the threshold
    BestMatch,
}

/// Configuration for semantic caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path of the SQLite cache file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Similarity threshold for cache hits, inclusive
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Selection policy among qualifying records
    #[serde(default)]
    pub match_strategy: MatchStrategy,
}

fn default_enabled() -> bool {
    true
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cache/chat_cache.db")
}

fn default_similarity_threshold() -> f32 {
    0.85
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            db_path: default_db_path(),
            similarity_threshold: default_similarity_threshold(),
            match_strategy: MatchStrategy::default(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether caching is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the cache file path
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Set the similarity threshold, clamped to the cosine range
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Set the match strategy
    pub fn with_match_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.match_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemanticCacheConfig::default();

        assert!(config.enabled);
        assert_eq!(config.db_path, PathBuf::from("cache/chat_cache.db"));
        assert!((config.similarity_threshold - 0.85).abs() < 1e-6);
        assert_eq!(config.match_strategy, MatchStrategy::FirstMatch);
    }

    #[test]
    fn test_config_builder() {
        let config = SemanticCacheConfig::new()
            .with_enabled(false)
            .with_db_path("/tmp/other.db")
            .with_similarity_threshold(0.9)
            .with_match_strategy(MatchStrategy::BestMatch);

        assert!(!config.enabled);
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert!((config.similarity_threshold - 0.9).abs() < 1e-6);
        assert_eq!(config.match_strategy, MatchStrategy::BestMatch);
    }

    #[test]
    fn test_similarity_threshold_clamped() {
        let config = SemanticCacheConfig::new().with_similarity_threshold(1.5);
        assert_eq!(config.similarity_threshold, 1.0);

        let config = SemanticCacheConfig::new().with_similarity_threshold(-3.0);
        assert_eq!(config.similarity_threshold, -1.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SemanticCacheConfig =
            serde_json::from_str(r#"{"match_strategy": "best_match"}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.match_strategy, MatchStrategy::BestMatch);
        assert!((config.similarity_threshold - 0.85).abs() < 1e-6);
    }
}
