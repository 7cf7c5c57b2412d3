//! Ollama response generator
//!
//! Streams `/api/generate` responses, which arrive as newline-delimited JSON
//! objects. Lines may be split across HTTP chunks, so bytes are buffered until
//! a full line is available.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use serde::Deserialize;
use tracing::warn;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest, LlmStream, StreamChunk};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama generation provider
#[derive(Debug)]
pub struct OllamaProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OllamaProvider<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self::with_base_url(client, model, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn build_request(&self, request: &LlmRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": true,
            "options": {
                "temperature": request.options.temperature,
                "num_predict": request.options.max_tokens,
            },
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OllamaProvider<C> {
    async fn generate_stream(&self, request: LlmRequest) -> Result<LlmStream, DomainError> {
        let url = self.generate_url();
        let body = self.build_request(&request);

        let byte_stream = self.client.post_json_stream(&url, &body).await?;

        let model = self.model.clone();
        // `None` marks the end of the body so a final unterminated line is still parsed.
        let stream = byte_stream
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(
                Vec::new(),
                move |buffer: &mut Vec<u8>, item: Option<Result<Bytes, DomainError>>| {
                    let chunks = match item {
                        Some(Ok(bytes)) => {
                            buffer.extend_from_slice(&bytes);
                            drain_lines(buffer, &model)
                        }
                        Some(Err(e)) => vec![Err(e)],
                        None => flush_remaining(buffer, &model),
                    };
                    future::ready(Some(chunks))
                },
            )
            .flat_map(stream::iter);

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Parse every complete line in the buffer, leaving any partial line behind
fn drain_lines(buffer: &mut Vec<u8>, model: &str) -> Vec<Result<StreamChunk, DomainError>> {
    let mut chunks = Vec::new();

    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();

        if let Some(chunk) = parse_ndjson_line(&line, model) {
            chunks.push(chunk);
        }
    }

    chunks
}

/// Parse whatever is left in the buffer once the body has ended
fn flush_remaining(buffer: &mut Vec<u8>, model: &str) -> Vec<Result<StreamChunk, DomainError>> {
    let line = std::mem::take(buffer);
    parse_ndjson_line(&line, model).into_iter().collect()
}

fn parse_ndjson_line(line: &[u8], model: &str) -> Option<Result<StreamChunk, DomainError>> {
    let line = line.trim_ascii();

    if line.is_empty() {
        return None;
    }

    let parsed: OllamaGenerateChunk = match serde_json::from_slice(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Skipping malformed Ollama stream line: {}", e);
            return None;
        }
    };

    if let Some(error) = parsed.error {
        return Some(Err(DomainError::provider("ollama", error)));
    }

    let mut chunk = StreamChunk::new(parsed.model.unwrap_or_else(|| model.to_string()));

    if let Some(delta) = parsed.response.filter(|d| !d.is_empty()) {
        chunk = chunk.with_delta(delta);
    }

    if parsed.done {
        chunk = chunk.with_finish_reason(parse_done_reason(parsed.done_reason.as_deref()));
    }

    Some(Ok(chunk))
}

fn parse_done_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

// Ollama API types

#[derive(Debug, Deserialize)]
struct OllamaGenerateChunk {
    model: Option<String>,
    response: Option<String>,
    #[serde(default)]
    done: bool,
    done_reason: Option<String>,
    error: Option<String>,
}
