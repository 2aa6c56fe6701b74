//! Mock implementations for testing

use crate::error::{AppError, Result};
use crate::ports::llm::{LlmConfig, LlmServicePort};
use crate::ports::tokenizer::TokenCounterPort;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock LLM that records every prompt and answers with a numbered summary
#[derive(Clone, Default)]
pub struct MockLlmService {
    prompts: Arc<Mutex<Vec<String>>>,
    fail_on_call: Option<usize>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `call`-th request (1-based)
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmServicePort for MockLlmService {
    async fn generate(&self, prompt: &str, _config: &LlmConfig) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        let call = prompts.len();

        if self.fail_on_call == Some(call) {
            return Err(AppError::Llm(format!("mock failure on call {}", call)));
        }
        Ok(format!("Summary {}", call))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// Token counter that always reports the same total
#[derive(Clone, Copy)]
pub struct FixedTokenCounter(pub usize);

#[async_trait]
impl TokenCounterPort for FixedTokenCounter {
    async fn count_tokens(&self, _text: &str) -> Result<usize> {
        Ok(self.0)
    }
}
