/// Token counting port trait
///
/// Estimates how many model tokens a text occupies, used to size chunks.
/// Implementations: whitespace word count, KoboldCpp tokencount endpoint
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for token counting services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenCounterPort: Send + Sync {
    /// Count (or estimate) the tokens in `text`
    async fn count_tokens(&self, text: &str) -> Result<usize>;
}
