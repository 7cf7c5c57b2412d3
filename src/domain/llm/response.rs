use serde::{Deserialize, Serialize};

/// Reason why the generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    Error,
}

/// Streaming chunk from a response generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    pub model: String,
    pub delta: Option<String>,
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            delta: None,
            finish_reason: None,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// Whether this is the final chunk of the stream
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_builder() {
        let chunk = StreamChunk::new("phi3:mini").with_delta("Hel");

        assert_eq!(chunk.delta.as_deref(), Some("Hel"));
        assert!(!chunk.is_final());

        let chunk = chunk.with_finish_reason(FinishReason::Stop);
        assert!(chunk.is_final());
    }
}
