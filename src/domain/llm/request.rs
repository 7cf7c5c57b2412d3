use serde::{Deserialize, Serialize};

const MIN_TEMPERATURE: f32 = 0.1;
const MAX_TEMPERATURE: f32 = 1.0;

/// Sampling options sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl GenerationOptions {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature: clamp_temperature(temperature),
            max_tokens,
        }
    }

    /// Set the temperature, clamped to the supported range
    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = clamp_temperature(temperature);
    }
}

fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        return GenerationOptions::default().temperature;
    }
    temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}

/// A single-prompt generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    pub options: GenerationOptions,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}
