/// LLM service port trait
///
/// Defines the interface for text-generation services.
/// Implementations: KoboldCpp, OpenAI-compatible servers (llama.cpp, vLLM, OpenAI)
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for generation requests
///
/// Sampling values are passed through to the server untouched; `None` leaves
/// the server default in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name (ignored by single-model local servers)
    pub model: String,

    /// Context window the server should assume
    pub max_context_length: Option<u32>,

    /// Maximum tokens in response
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    pub top_p: Option<f32>,

    pub min_p: Option<f32>,

    pub top_k: Option<u32>,

    pub repetition_penalty: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "local-model".to_string(),
            max_context_length: Some(32768),
            max_tokens: Some(8192),
            temperature: Some(0.7),
            top_p: None,
            min_p: None,
            top_k: None,
            repetition_penalty: None,
        }
    }
}

/// Port trait for LLM services
#[async_trait]
pub trait LlmServicePort: Send + Sync {
    /// Generate a completion for a fully built prompt
    async fn generate(&self, prompt: &str, config: &LlmConfig) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
