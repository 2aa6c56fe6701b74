//! Offline token estimate
//!
//! Approximates one token per whitespace-separated word. Good enough to size
//! chunks when no tokenizer endpoint is available.

use crate::error::Result;
use crate::ports::tokenizer::TokenCounterPort;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountTokenizer;

impl WordCountTokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[async_trait]
impl TokenCounterPort for WordCountTokenizer {
    async fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(Self::estimate(text))
    }
}
