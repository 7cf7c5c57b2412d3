//! Chat service
//!
//! Answers prompts from the semantic cache when possible and streams fresh
//! answers from the generator otherwise.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::SemanticCacheService;
use crate::domain::{DomainError, GenerationOptions, LlmProvider, LlmRequest};
use crate::infrastructure::rate_limiter::RateLimiter;

/// Message shown to users when the limiter rejects a request
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait.";

/// Reply produced for a single prompt
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub from_cache: bool,
}

/// Front door for prompts: rate limit, cache, then generator
#[derive(Debug)]
pub struct ChatService {
    cache: Arc<SemanticCacheService>,
    generator: Arc<dyn LlmProvider>,
    rate_limiter: RateLimiter,
    options: RwLock<GenerationOptions>,
}

impl ChatService {
    pub fn new(
        cache: Arc<SemanticCacheService>,
        generator: Arc<dyn LlmProvider>,
        rate_limiter: RateLimiter,
        options: GenerationOptions,
    ) -> Self {
        Self {
            cache,
            generator,
            rate_limiter,
            options: RwLock::new(options),
        }
    }

    /// Current generation options
    pub async fn options(&self) -> GenerationOptions {
        *self.options.read().await
    }

    /// Change the sampling temperature; returns the value actually applied
    pub async fn set_temperature(&self, temperature: f32) -> f32 {
        let mut options = self.options.write().await;
        options.set_temperature(temperature);
        info!(temperature = options.temperature, "Temperature updated");
        options.temperature
    }

    /// Remove every cached answer
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Answer a prompt, passing text to `sink` as it becomes available.
    ///
    /// A cached answer is passed to `sink` in one piece. A generated answer is
    /// passed delta by delta and cached once the stream completes.
    #[instrument(skip(self, prompt, sink), fields(prompt_len = prompt.len()))]
    pub async fn send<F>(&self, prompt: &str, mut sink: F) -> Result<ChatReply, DomainError>
    where
        F: FnMut(&str) + Send,
    {
        let limit = self.rate_limiter.check_and_record().await;
        if !limit.allowed {
            warn!(
                limit = limit.limit,
                reset_in_secs = limit.reset_in.as_secs(),
                "Chat request rejected by rate limiter"
            );
            return Err(DomainError::rate_limited(RATE_LIMIT_MESSAGE));
        }

        if let Some(cached) = self.cache.get(prompt).await {
            sink(&cached);
            return Ok(ChatReply {
                text: cached,
                from_cache: true,
            });
        }

        let request = LlmRequest::new(prompt, self.options().await);
        let mut stream = self.generator.generate_stream(request).await?;
        let mut text = String::new();
        let mut completed = false;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            if let Some(delta) = chunk.delta.as_deref() {
                sink(delta);
                text.push_str(delta);
            }

            if chunk.is_final() {
                completed = true;
                break;
            }
        }

        if !completed {
            warn!("Generator stream ended without a final chunk; not caching");
        } else if text.is_empty() {
            debug!("Generator returned an empty answer; not caching");
        } else {
            self.cache.add(prompt, &text).await;
        }

        Ok(ChatReply {
            text,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::semantic_cache::CacheStore;
    use crate::infrastructure::semantic_cache::InMemoryCacheStore;

    struct Fixture {
        store: Arc<InMemoryCacheStore>,
        generator: Arc<MockLlmProvider>,
        service: ChatService,
    }

    fn fixture(generator: MockLlmProvider, max_requests: u32) -> Fixture {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = Arc::new(SemanticCacheService::new(
            store.clone(),
            Arc::new(MockEmbeddingProvider::new(32)),
        ));
        let generator = Arc::new(generator);
        let service = ChatService::new(
            cache,
            generator.clone(),
            RateLimiter::new(max_requests, Duration::from_secs(60)),
            GenerationOptions::default(),
        );

        Fixture {
            store,
            generator,
            service,
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let f = fixture(MockLlmProvider::new("Paris is the capital."), 10);

        let mut streamed = Vec::new();
        let first = f
            .service
            .send("What is the capital of France?", |d| streamed.push(d.to_string()))
            .await
            .unwrap();

        assert!(!first.from_cache);
        assert_eq!(first.text, "Paris is the capital.");
        assert_eq!(streamed, vec!["Paris ", "is ", "the ", "capital."]);

        let mut replayed = Vec::new();
        let second = f
            .service
            .send("What is the capital of France?", |d| replayed.push(d.to_string()))
            .await
            .unwrap();

        assert!(second.from_cache);
        assert_eq!(second.text, "Paris is the capital.");
        assert_eq!(replayed, vec!["Paris is the capital."]);
        assert_eq!(f.generator.calls(), 1);
        assert_eq!(f.store.scan_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_error_is_not_cached() {
        let f = fixture(MockLlmProvider::new("one two three").with_stream_error_after(1), 10);

        let mut streamed = String::new();
        let result = f.service.send("Count", |d| streamed.push_str(d)).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert_eq!(streamed, "one ");
        assert!(f.store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_without_final_chunk_is_not_cached() {
        let f = fixture(MockLlmProvider::new("Paris is").without_final_chunk(), 10);

        let reply = f.service.send("Capital of France?", |_| {}).await.unwrap();

        assert_eq!(reply.text, "Paris is");
        assert!(!reply.from_cache);
        assert!(f.store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let f = fixture(MockLlmProvider::new("unused").with_error("connection refused"), 10);

        let result = f.service.send("Hello", |_| {}).await;

        assert!(result.is_err());
        assert!(f.store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_answer_is_not_cached() {
        let f = fixture(MockLlmProvider::new(""), 10);

        let reply = f.service.send("Say nothing", |_| {}).await.unwrap();

        assert_eq!(reply.text, "");
        assert!(!reply.from_cache);
        assert!(f.store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let f = fixture(MockLlmProvider::new("ok"), 2);

        f.service.send("a", |_| {}).await.unwrap();
        f.service.send("b", |_| {}).await.unwrap();
        let result = f.service.send("c", |_| {}).await;

        match result {
            Err(DomainError::RateLimited { message }) => assert_eq!(message, RATE_LIMIT_MESSAGE),
            other => panic!("expected rate limit error, got {:?}", other),
        }
        assert_eq!(f.generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_hits_count_against_rate_limit() {
        let f = fixture(MockLlmProvider::new("ok"), 2);

        f.service.send("same", |_| {}).await.unwrap();
        assert!(f.service.send("same", |_| {}).await.unwrap().from_cache);

        assert!(f.service.send("same", |_| {}).await.is_err());
    }

    #[tokio::test]
    async fn test_set_temperature_clamps() {
        let f = fixture(MockLlmProvider::new("ok"), 10);

        assert_eq!(f.service.set_temperature(5.0).await, 1.0);
        assert_eq!(f.service.set_temperature(0.0).await, 0.1);
        assert_eq!(f.service.set_temperature(0.5).await, 0.5);
        assert_eq!(f.service.options().await.temperature, 0.5);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let f = fixture(MockLlmProvider::new("Paris"), 10);

        f.service.send("capital", |_| {}).await.unwrap();
        f.service.clear_cache().await;

        assert!(f.store.scan_all().await.unwrap().is_empty());
        let reply = f.service.send("capital", |_| {}).await.unwrap();
        assert!(!reply.from_cache);
        assert_eq!(f.generator.calls(), 2);
    }
}
