//! Semantic response caching service
//!
//! Sits in front of the response generator. A lookup embeds the prompt and
//! scans the store linearly, comparing by cosine similarity against every
//! stored embedding. The cache never fails a request: encoder and store
//! errors are logged and surface as a miss or a dropped write.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::embedding::{checked_cosine_similarity, EmbeddingProvider};
use crate::domain::semantic_cache::{
    CacheRecord, CacheStore, MatchStrategy, SemanticCacheConfig,
};
use crate::domain::DomainError;

/// A record selected by a lookup
#[derive(Debug, Clone)]
pub struct CacheHit {
    /// Id of the matching record
    pub record_id: i64,
    /// Prompt the record was stored for
    pub prompt: String,
    /// Stored response text
    pub response: String,
    /// Cosine similarity between the query and the record
    pub similarity: f32,
}

/// Semantic cache keyed by prompt similarity
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn CacheStore>,
    encoder: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
}

impl SemanticCacheService {
    /// Create a new service with the default config
    pub fn new(store: Arc<dyn CacheStore>, encoder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(store, encoder, SemanticCacheConfig::default())
    }

    /// Create a new service with a custom config
    pub fn with_config(
        store: Arc<dyn CacheStore>,
        encoder: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            encoder,
            config,
        }
    }

    /// Check if semantic caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Ensure the store is ready, logging any failure
    pub async fn initialize(&self) {
        if let Err(e) = self.try_initialize().await {
            error!("Error setting up cache store: {}", e);
        }
    }

    /// Ensure the store is ready
    pub async fn try_initialize(&self) -> Result<(), DomainError> {
        self.store.initialize().await
    }

    /// Look up a cached response for a similar prompt
    ///
    /// Any failure is logged and reported as a miss.
    pub async fn get(&self, prompt: &str) -> Option<String> {
        match self.try_get(prompt).await {
            Ok(hit) => hit.map(|h| h.response),
            Err(e) => {
                error!("Error retrieving from cache: {}", e);
                None
            }
        }
    }

    /// Look up a cached response, surfacing encoder and store errors
    pub async fn try_get(&self, prompt: &str) -> Result<Option<CacheHit>, DomainError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let query = self.encoder.embed(prompt).await?;
        let records = self.store.scan_all().await?;

        let hit = self.select(&query, records);

        match &hit {
            Some(hit) => info!(
                record_id = hit.record_id,
                "Cache hit with similarity {:.2}",
                hit.similarity
            ),
            None => debug!("Cache miss"),
        }

        Ok(hit)
    }

    /// Store a response for a prompt, logging any failure
    pub async fn add(&self, prompt: &str, response: &str) {
        if let Err(e) = self.try_add(prompt, response).await {
            error!("Error adding to cache: {}", e);
        }
    }

    /// Store a response for a prompt
    ///
    /// Returns the new record id, or `None` when caching is disabled. Every
    /// call creates a new record; duplicates are not detected.
    pub async fn try_add(&self, prompt: &str, response: &str) -> Result<Option<i64>, DomainError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let embedding = self.encoder.embed(prompt).await?;
        let id = self.store.insert(prompt, response, &embedding).await?;

        debug!(record_id = id, "Cached response");

        Ok(Some(id))
    }

    /// Remove every cached record, logging any failure
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            error!("Error clearing cache: {}", e);
        }
    }

    /// Remove every cached record
    pub async fn try_clear(&self) -> Result<(), DomainError> {
        self.store.clear_all().await?;
        info!("Cache cleared");
        Ok(())
    }

    /// Pick the record to answer with, per the configured match strategy
    fn select(&self, query: &[f32], records: Vec<CacheRecord>) -> Option<CacheHit> {
        let threshold = self.config.similarity_threshold;
        // Vectors that cannot be compared never match, whatever the threshold.
        let mut scored = records
            .into_iter()
            .filter_map(|record| {
                let similarity = checked_cosine_similarity(query, record.embedding())?;
                (similarity >= threshold).then_some((record, similarity))
            });

        let best = match self.config.match_strategy {
            MatchStrategy::FirstMatch => scored.next(),
            // Strictly greater keeps the earliest record on ties.
            MatchStrategy::BestMatch => scored.fold(None, |best, candidate| match best {
                Some((_, best_similarity)) if candidate.1 <= best_similarity => best,
                _ => Some(candidate),
            }),
        };

        best.map(|(record, similarity)| CacheHit {
            record_id: record.id(),
            prompt: record.prompt().to_string(),
            response: record.into_response(),
            similarity,
        })
    }
}
