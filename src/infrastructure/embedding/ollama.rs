//! Ollama embedding encoder implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::llm::DEFAULT_OLLAMA_BASE_URL;

/// Known Ollama embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("all-minilm", 384),
    ("nomic-embed-text", 768),
    ("mxbai-embed-large", 1024),
];

/// Embedding encoder backed by a local Ollama server
#[derive(Debug)]
pub struct OllamaEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OllamaEmbeddingProvider<C> {
    /// Create a new encoder against the default local server
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self::with_base_url(client, model, DEFAULT_OLLAMA_BASE_URL)
    }

    /// Create a new encoder with a custom base URL
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

    fn embeddings_url(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OllamaEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        let json = self
            .client
            .post_json(&self.embeddings_url(), &body)
            .await
            .map_err(|e| DomainError::encoding(format!("Embedding request failed: {}", e)))?;

        let response: OllamaEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::encoding(format!("Failed to parse embedding response: {}", e))
        })?;

        if response.embedding.is_empty() {
            return Err(DomainError::encoding(format!(
                "Model '{}' returned an empty embedding",
                self.model
            )));
        }

        Ok(response.embedding)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        // Tags such as "all-minilm:l6-v2" share the base model's dimension.
        let base = self.model.split(':').next().unwrap_or(&self.model);

        EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| *name == base)
            .map(|(_, dims)| *dims)
    }
}

// Ollama API types for embeddings

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const TEST_URL: &str = "http://localhost:11434/api/embeddings";

    #[tokio::test]
    async fn test_embed_text() {
        let embedding: Vec<f32> = (0..384).map(|i| i as f32 * 0.001).collect();
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({ "embedding": embedding }));
        let provider = OllamaEmbeddingProvider::new(client, "all-minilm");

        let vector = provider.embed("Hello world").await.unwrap();

        assert_eq!(vector.len(), 384);
        assert_eq!(vector, embedding);

        let requests = provider.client.requests();
        assert_eq!(requests[0].1["model"], "all-minilm");
        assert_eq!(requests[0].1["prompt"], "Hello world");
    }

    #[tokio::test]
    async fn test_empty_embedding_is_encoding_error() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, serde_json::json!({ "embedding": [] }));
        let provider = OllamaEmbeddingProvider::new(client, "all-minilm");

        let result = provider.embed("Hello").await;

        assert!(matches!(result, Err(DomainError::Encoding { .. })));
    }

    #[tokio::test]
    async fn test_http_error_is_encoding_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "connection refused");
        let provider = OllamaEmbeddingProvider::new(client, "all-minilm");

        let result = provider.embed("Hello").await;

        assert!(result.unwrap_err().is_encoding());
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let client = MockHttpClient::new().with_response(
            "http://gpu-box:11434/api/embeddings",
            serde_json::json!({ "embedding": [0.5, 0.5] }),
        );
        let provider =
            OllamaEmbeddingProvider::with_base_url(client, "nomic-embed-text", "http://gpu-box:11434/");

        assert_eq!(provider.embed("x").await.unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_known_dimensions() {
        let provider = OllamaEmbeddingProvider::new(MockHttpClient::new(), "all-minilm:l6-v2");
        assert_eq!(provider.dimensions(), Some(384));

        let provider = OllamaEmbeddingProvider::new(MockHttpClient::new(), "nomic-embed-text");
        assert_eq!(provider.dimensions(), Some(768));

        let provider = OllamaEmbeddingProvider::new(MockHttpClient::new(), "custom");
        assert_eq!(provider.dimensions(), None);
    }
}
