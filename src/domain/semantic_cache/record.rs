//! Cache record type

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An immutable stored (prompt, response, embedding) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    id: i64,
    prompt: String,
    response: String,
    embedding: Vec<f32>,
    created_at: NaiveDateTime,
}

impl CacheRecord {
    pub fn new(
        id: i64,
        prompt: impl Into<String>,
        response: impl Into<String>,
        embedding: Vec<f32>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            response: response.into(),
            embedding,
            created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Consume the record, keeping only the response text
    pub fn into_response(self) -> String {
        self.response
    }
}
