//! Persistent store trait for cache records

use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::CacheRecord;
use crate::domain::DomainError;

/// Append-only durable store of cache records
///
/// Supports only insert, full scan and full clear. Every mutation is durable
/// before the call returns.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Ensure the backing storage and schema exist. Safe to call repeatedly.
    async fn initialize(&self) -> Result<(), DomainError>;

    /// Append a new record and return its id
    async fn insert(
        &self,
        prompt: &str,
        response: &str,
        embedding: &[f32],
    ) -> Result<i64, DomainError>;

    /// Return every stored record in insertion order
    async fn scan_all(&self) -> Result<Vec<CacheRecord>, DomainError>;

    /// Delete every record
    async fn clear_all(&self) -> Result<(), DomainError>;
}
