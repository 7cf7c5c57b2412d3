//! Embedding encoder trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding encoders that map text to a fixed-length vector
///
/// Implementations are deterministic for a fixed model: the same text always
/// produces the same vector. Stored cache records depend on this.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Encode a single text into its embedding vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model used for encoding
    fn model(&self) -> &str;

    /// Get the output dimension, when known ahead of time
    fn dimensions(&self) -> Option<usize>;
}
