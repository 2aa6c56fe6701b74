//! KoboldCpp service adapter
//!
//! Implements both the LlmServicePort (`/api/v1/generate`) and the
//! TokenCounterPort (`/api/extra/tokencount`) against a KoboldCpp server, so
//! chunk sizing uses the same tokenizer as generation.

use crate::error::{AppError, Result};
use crate::ports::llm::{LlmConfig, LlmServicePort};
use crate::ports::tokenizer::TokenCounterPort;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// KoboldCpp service implementation
pub struct KoboldCppService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_context_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rep_pen: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    results: Vec<GenerateResult>,
}

#[derive(Debug, Deserialize)]
struct GenerateResult {
    text: String,
}

#[derive(Debug, Serialize)]
struct TokenCountRequest<'a> {
    prompt: &'a str,
}

impl KoboldCppService {
    /// Create a new service talking to `base_url` (e.g. `http://host:5001`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmServicePort for KoboldCppService {
    async fn generate(&self, prompt: &str, config: &LlmConfig) -> Result<String> {
        let request_body = GenerateRequest {
            prompt,
            max_context_length: config.max_context_length,
            max_length: config.max_tokens,
            rep_pen: config.repetition_penalty,
            temperature: config.temperature,
            top_p: config.top_p,
            min_p: config.min_p,
            top_k: config.top_k,
        };

        log::info!("Calling KoboldCpp generate at {}", self.base_url);

        let response = self
            .client
            .post(format!("{}/api/v1/generate", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Generate request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Generate failed ({}): {}",
                status, error_text
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse generate response: {}", e)))?;

        let text = generate_response
            .results
            .into_iter()
            .next()
            .map(|result| result.text)
            .ok_or_else(|| AppError::Llm("No generation results returned".to_string()))?;

        log::info!(
            "KoboldCpp generation successful, generated {} characters",
            text.len()
        );

        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "koboldcpp"
    }
}

#[async_trait]
impl TokenCounterPort for KoboldCppService {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        let response = self
            .client
            .post(format!("{}/api/extra/tokencount", self.base_url))
            .json(&TokenCountRequest { prompt: text })
            .send()
            .await
            .map_err(|e| AppError::TokenCount(format!("Token count request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::TokenCount(format!(
                "Token count failed ({}): {}",
                status, error_text
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::TokenCount(format!("Failed to parse token count response: {}", e))
        })?;

        let count = body
            .get("value")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                AppError::TokenCount(format!("Response has no `value` field: {}", body))
            })?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> KoboldCppService {
        KoboldCppService::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_maps_config_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generate"))
            .and(body_partial_json(json!({
                "prompt": "[INST] hi [/INST]",
                "max_context_length": 32768,
                "max_length": 8192,
                "rep_pen": 1.1,
                "top_k": 40
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "results": [{ "text": "Generated." }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            repetition_penalty: Some(1.1),
            top_k: Some(40),
            ..LlmConfig::default()
        };
        let text = service(&server)
            .generate("[INST] hi [/INST]", &config)
            .await
            .unwrap();
        assert_eq!(text, "Generated.");
    }

    #[tokio::test]
    async fn test_generate_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/generate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let err = service(&server)
            .generate("p", &LlmConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("busy")));
    }

    #[tokio::test]
    async fn test_token_count_reads_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/extra/tokencount"))
            .and(body_json(json!({ "prompt": "[A]: hello there" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": 42, "ids": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let count = service(&server).count_tokens("[A]: hello there").await.unwrap();
        assert_eq!(count, 42);
    }

    #[tokio::test]
    async fn test_token_count_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/extra/tokencount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 42 })))
            .mount(&server)
            .await;

        let err = service(&server).count_tokens("text").await.unwrap_err();
        assert!(matches!(err, AppError::TokenCount(ref msg) if msg.contains("value")));
    }

    #[tokio::test]
    async fn test_token_count_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/extra/tokencount"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = service(&server).count_tokens("text").await.unwrap_err();
        assert!(matches!(err, AppError::TokenCount(_)));
    }
}
