//! In-memory cache store implementation

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::semantic_cache::{CacheRecord, CacheStore};
use crate::domain::DomainError;

/// In-memory cache store
///
/// Keeps records in insertion order for the lifetime of the process. Used
/// when the persistent cache is disabled and in tests.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<CacheRecord>,
    last_id: i64,
}

impl InMemoryCacheStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn initialize(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn insert(
        &self,
        prompt: &str,
        response: &str,
        embedding: &[f32],
    ) -> Result<i64, DomainError> {
        let mut state = self.state.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        // Ids are never reused, even across clear_all.
        state.last_id += 1;
        let id = state.last_id;

        state.records.push(CacheRecord::new(
            id,
            prompt,
            response,
            embedding.to_vec(),
            Utc::now().naive_utc(),
        ));

        Ok(id)
    }

    async fn scan_all(&self) -> Result<Vec<CacheRecord>, DomainError> {
        let state = self.state.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(state.records.clone())
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        state.records.clear();

        Ok(())
    }
}
