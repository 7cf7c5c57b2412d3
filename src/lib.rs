//! Local Chat
//!
//! A chat client for a local Ollama server with a semantic response cache:
//! - Prompts are embedded and compared against previously answered prompts
//! - Sufficiently similar prompts are answered from a SQLite-backed cache
//! - Fresh answers are streamed from the generator and cached afterwards

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{CacheStore, DomainError};
use infrastructure::{
    embedding::OllamaEmbeddingProvider,
    llm::{HttpClient, OllamaProvider},
    rate_limiter::RateLimiter,
    semantic_cache::{InMemoryCacheStore, SqliteCacheStore},
    services::{ChatService, SemanticCacheService},
};
use tracing::info;

/// Build the chat service described by `config` and initialize its cache
pub async fn create_chat_service(config: &AppConfig) -> Result<ChatService, DomainError> {
    let http = HttpClient::with_timeout(config.ollama.timeout())?;

    let encoder = Arc::new(OllamaEmbeddingProvider::with_base_url(
        http.clone(),
        &config.ollama.embedding_model,
        &config.ollama.base_url,
    ));
    let generator = Arc::new(OllamaProvider::with_base_url(
        http,
        &config.ollama.model,
        &config.ollama.base_url,
    ));

    let store = create_cache_store(config)?;
    let cache = Arc::new(SemanticCacheService::with_config(
        store,
        encoder,
        config.cache.clone(),
    ));
    cache.initialize().await;

    info!(
        model = %config.ollama.model,
        embedding_model = %config.ollama.embedding_model,
        cache_enabled = cache.is_enabled(),
        "Chat service ready"
    );

    Ok(ChatService::new(
        cache,
        generator,
        RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window()),
        config.ollama.generation_options(),
    ))
}

/// `db_path` value selecting a cache that lives only for this process
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// The persistent store is built even when lookups are disabled, so that
/// `clear` still empties the records kept on disk.
fn create_cache_store(config: &AppConfig) -> Result<Arc<dyn CacheStore>, DomainError> {
    let path = &config.cache.db_path;

    if path.as_os_str() == IN_MEMORY_DB_PATH {
        info!("Using in-memory semantic cache");
        return Ok(Arc::new(InMemoryCacheStore::new()));
    }

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to create cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let store = SqliteCacheStore::new(path);
    info!("Using semantic cache at {}", store.path().display());
    Ok(Arc::new(store))
}
