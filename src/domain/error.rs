use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },
}

impl DomainError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Whether this error came from the embedding encoder
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Whether this error came from the persistent store
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
