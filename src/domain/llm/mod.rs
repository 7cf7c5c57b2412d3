//! Response generator domain models and traits

mod provider;
mod request;
mod response;

pub use provider::{LlmProvider, LlmStream};
pub use request::{GenerationOptions, LlmRequest};
pub use response::{FinishReason, StreamChunk};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
