use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{GenerationOptions, SemanticCacheConfig};
use crate::infrastructure::llm::DEFAULT_OLLAMA_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub ollama: OllamaConfig,
    pub cache: SemanticCacheConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Directory for the error-only log file; `None` disables it
    pub error_log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Local Ollama server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            error_log_dir: Some(PathBuf::from("logs")),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: "phi3:mini".to_string(),
            embedding_model: "all-minilm".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::new(self.temperature, self.max_tokens)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        let threshold = app_config.cache.similarity_threshold;
        app_config.cache = app_config.cache.with_similarity_threshold(threshold);

        Ok(app_config)
    }
}
