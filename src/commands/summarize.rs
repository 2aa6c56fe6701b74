//! Transcript summarization pipeline
//!
//! Condenses a transcript, sizes it with the token counter, splits it into
//! chunks and summarizes each chunk in turn. The first failing collaborator
//! call aborts the run; there is no partial result.

use crate::domain::models::{Chunk, ChunkingConfig, CondensedTranscript};
use crate::domain::prompts::{InstructFormat, PromptTemplates};
use crate::domain::{chunk_transcript, condense};
use crate::error::{AppError, Result};
use crate::ports::llm::{LlmConfig, LlmServicePort};
use crate::ports::tokenizer::TokenCounterPort;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Separator placed after every chunk summary
const SUMMARY_SEPARATOR: &str = "\n\n";

/// Everything the pipeline needs besides its collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeSettings {
    pub chunking: ChunkingConfig,
    pub llm: LlmConfig,
    /// Instruction placed before each chunk
    pub preamble: String,
    pub instruct_format: InstructFormat,
}

impl Default for SummarizeSettings {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            llm: LlmConfig::default(),
            preamble: PromptTemplates::summary().to_string(),
            instruct_format: InstructFormat::default(),
        }
    }
}

/// Sequential condense → count → chunk → summarize pipeline
pub struct SummaryPipeline {
    tokenizer: Arc<dyn TokenCounterPort>,
    llm: Arc<dyn LlmServicePort>,
    settings: SummarizeSettings,
}

impl SummaryPipeline {
    pub fn new(
        tokenizer: Arc<dyn TokenCounterPort>,
        llm: Arc<dyn LlmServicePort>,
        settings: SummarizeSettings,
    ) -> Result<Self> {
        settings.chunking.validate()?;
        Ok(Self {
            tokenizer,
            llm,
            settings,
        })
    }

    pub fn settings(&self) -> &SummarizeSettings {
        &self.settings
    }

    /// Summarize raw transcript lines
    pub async fn summarize_lines<S: AsRef<str>>(&self, raw_lines: &[S]) -> Result<String> {
        let transcript = condense(raw_lines);
        self.summarize_transcript(&transcript).await
    }

    /// Split an already condensed transcript into budgeted chunks
    pub async fn plan_chunks(&self, transcript: &CondensedTranscript) -> Result<Vec<Chunk>> {
        // Nothing to summarize; a preamble-only request would just waste a call
        if transcript.is_empty() {
            return Err(AppError::InvalidInput(
                "Transcript contains no speech".to_string(),
            ));
        }

        let text = transcript.to_text();
        let total_tokens = self.tokenizer.count_tokens(&text).await?;
        log::info!("Approximate token length: {}", total_tokens);

        let chunks = chunk_transcript(&text, total_tokens, &self.settings.chunking);
        for chunk in &chunks {
            match transcript.span(chunk.line_range()) {
                Some(span) => log::info!(
                    "Chunk {}: lines {}..{} ({})",
                    chunk.index,
                    chunk.start_line,
                    chunk.end_line,
                    span
                ),
                None => log::info!(
                    "Chunk {}: lines {}..{}",
                    chunk.index,
                    chunk.start_line,
                    chunk.end_line
                ),
            }
        }

        Ok(chunks)
    }

    /// Summarize a condensed transcript, one generation request per chunk
    pub async fn summarize_transcript(&self, transcript: &CondensedTranscript) -> Result<String> {
        let chunks = self.plan_chunks(transcript).await?;
        let chunk_count = chunks.len();

        let mut final_summary = String::new();
        for chunk in &chunks {
            let prompt = PromptTemplates::chunk_prompt(
                &self.settings.preamble,
                &chunk.text,
                self.settings.instruct_format,
            );

            log::info!(
                "Summarizing chunk {}/{} with {}",
                chunk.index,
                chunk_count,
                self.llm.provider_name()
            );
            let chunk_summary = self.llm.generate(&prompt, &self.settings.llm).await?;

            final_summary.push_str(&chunk_summary);
            final_summary.push_str(SUMMARY_SEPARATOR);
        }

        Ok(final_summary)
    }
}
