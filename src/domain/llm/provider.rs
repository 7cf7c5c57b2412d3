use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use super::response::StreamChunk;
use super::LlmRequest;
use crate::domain::DomainError;

/// Stream type for generator responses
pub type LlmStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, DomainError>> + Send>>;

/// Trait for response generators (a locally hosted language model)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Start a streaming generation for the given prompt
    async fn generate_stream(&self, request: LlmRequest) -> Result<LlmStream, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model used for generation
    fn model(&self) -> &str;
}
