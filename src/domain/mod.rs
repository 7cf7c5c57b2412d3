//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod llm;
pub mod semantic_cache;

pub use embedding::{checked_cosine_similarity, cosine_similarity, EmbeddingProvider};
pub use error::DomainError;
pub use llm::{FinishReason, GenerationOptions, LlmProvider, LlmRequest, LlmStream, StreamChunk};
pub use semantic_cache::{CacheRecord, CacheStore, MatchStrategy, SemanticCacheConfig};
