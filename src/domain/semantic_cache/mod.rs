//! Semantic cache domain models and traits
//!
//! Matches semantically similar prompts rather than requiring exact key
//! matches.

mod config;
mod record;
mod repository;

pub use config::{MatchStrategy, SemanticCacheConfig};
pub use record::CacheRecord;
pub use repository::CacheStore;

#[cfg(test)]
pub use repository::MockCacheStore;
