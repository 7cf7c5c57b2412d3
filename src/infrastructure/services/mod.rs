//! Infrastructure services

mod chat_service;
mod semantic_cache_service;

pub use chat_service::{ChatReply, ChatService, RATE_LIMIT_MESSAGE};
pub use semantic_cache_service::{CacheHit, SemanticCacheService};
