//! Command-line and environment configuration
//!
//! Every tunable has a flag and a `VTT_SUMMARIZER_*` environment variable.
//! Defaults reproduce the behaviour of a stock local setup: a llama.cpp
//! server on port 8000, 22k-token chunks and the built-in summary prompt.

use crate::adapters::services::llm::{koboldcpp, openai};
use crate::adapters::{KoboldCppService, OpenAICompatService, WordCountTokenizer};
use crate::commands::SummarizeSettings;
use crate::domain::models::ChunkingConfig;
use crate::domain::prompts::{InstructFormat, PromptTemplates};
use crate::error::{AppError, Result};
use crate::ports::llm::{LlmConfig, LlmServicePort};
use crate::ports::tokenizer::TokenCounterPort;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Text-generation server flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// OpenAI-compatible `/chat/completions` (llama.cpp server, vLLM, OpenAI)
    Openai,
    /// KoboldCpp native API
    Koboldcpp,
}

/// Source of the transcript token estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizerKind {
    /// One token per whitespace-separated word
    Words,
    /// Ask the KoboldCpp server to tokenize the transcript
    Remote,
}

/// Summarize a meeting transcript with a local LLM
///
/// Condenses the transcript into speaker turns, splits it into chunks that fit
/// the model context and prints the concatenated chunk summaries.
#[derive(Parser, Debug, Clone)]
#[command(name = "vtt-summarizer")]
#[command(version)]
#[command(about = "Summarize a .vtt meeting transcript with a local LLM", long_about = None)]
pub struct CliArgs {
    /// Transcript file (.vtt)
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,

    /// Maximum estimated tokens per chunk
    #[arg(long, env = "VTT_SUMMARIZER_MAX_TOKENS_PER_CHUNK", default_value_t = 22_000)]
    pub max_tokens_per_chunk: usize,

    /// Minimum characters for a line to anchor a chunk boundary
    #[arg(long, env = "VTT_SUMMARIZER_BIG_SPEECH_LEN", default_value_t = 100)]
    pub big_speech_len: usize,

    /// Generation server API flavour
    #[arg(long, value_enum, env = "VTT_SUMMARIZER_BACKEND", default_value_t = Backend::Openai)]
    pub backend: Backend,

    /// Server base URL (defaults depend on the backend)
    #[arg(long, env = "VTT_SUMMARIZER_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for OpenAI-compatible servers
    #[arg(long, env = "VTT_SUMMARIZER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name sent with chat completion requests
    #[arg(long, env = "VTT_SUMMARIZER_MODEL", default_value = "local-model")]
    pub model: String,

    /// Token estimate source
    #[arg(long, value_enum, env = "VTT_SUMMARIZER_TOKENIZER", default_value_t = TokenizerKind::Words)]
    pub tokenizer: TokenizerKind,

    /// Context window passed to the server
    #[arg(long, env = "VTT_SUMMARIZER_MAX_CONTEXT_LENGTH", default_value_t = 32_768)]
    pub max_context_length: u32,

    /// Maximum tokens generated per chunk
    #[arg(long, env = "VTT_SUMMARIZER_MAX_LENGTH", default_value_t = 8_192)]
    pub max_length: u32,

    #[arg(long, env = "VTT_SUMMARIZER_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f32,

    #[arg(long, env = "VTT_SUMMARIZER_TOP_P")]
    pub top_p: Option<f32>,

    #[arg(long, env = "VTT_SUMMARIZER_MIN_P")]
    pub min_p: Option<f32>,

    #[arg(long, env = "VTT_SUMMARIZER_TOP_K")]
    pub top_k: Option<u32>,

    /// Repetition penalty
    #[arg(long, env = "VTT_SUMMARIZER_REP_PEN")]
    pub rep_pen: Option<f32>,

    /// Instruction wrapper: none, alpaca, chatml, llama3, mistral
    #[arg(long, env = "VTT_SUMMARIZER_INSTRUCT_FORMAT", default_value = "none")]
    pub instruct_format: InstructFormat,

    /// File whose content replaces the built-in summary instruction
    #[arg(long, env = "VTT_SUMMARIZER_PROMPT_FILE", value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// HTTP timeout for each server request, in seconds
    #[arg(long, env = "VTT_SUMMARIZER_TIMEOUT_SECS", default_value_t = 600)]
    pub timeout_secs: u64,

    /// Log debug diagnostics
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Default log filter, overridden by `RUST_LOG`
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.backend) {
            (Some(url), _) => url.as_str(),
            (None, Backend::Openai) => openai::DEFAULT_BASE_URL,
            (None, Backend::Koboldcpp) => koboldcpp::DEFAULT_BASE_URL,
        }
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 || self.max_context_length == 0 {
            return Err(AppError::Config(
                "max_length and max_context_length must be positive".to_string(),
            ));
        }
        if self.max_length >= self.max_context_length {
            return Err(AppError::Config(format!(
                "max_length ({}) must be smaller than max_context_length ({})",
                self.max_length, self.max_context_length
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be positive".to_string()));
        }
        if self.tokenizer == TokenizerKind::Remote && self.backend != Backend::Koboldcpp {
            return Err(AppError::Config(
                "the remote tokenizer requires --backend koboldcpp".to_string(),
            ));
        }
        self.chunking().validate()
    }

    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig {
            max_tokens_per_chunk: self.max_tokens_per_chunk,
            big_speech_len: self.big_speech_len,
        }
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.model.clone(),
            max_context_length: Some(self.max_context_length),
            max_tokens: Some(self.max_length),
            temperature: Some(self.temperature),
            top_p: self.top_p,
            min_p: self.min_p,
            top_k: self.top_k,
            repetition_penalty: self.rep_pen,
        }
    }

    /// Build pipeline settings, loading the prompt file if one was given
    pub fn settings(&self) -> Result<SummarizeSettings> {
        let preamble = match &self.prompt_file {
            Some(path) => {
                let preamble = std::fs::read_to_string(path)?;
                if preamble.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "Prompt file {} is empty",
                        path.display()
                    )));
                }
                preamble
            }
            None => PromptTemplates::summary().to_string(),
        };

        Ok(SummarizeSettings {
            chunking: self.chunking(),
            llm: self.llm_config(),
            preamble,
            instruct_format: self.instruct_format,
        })
    }

    /// Construct the token counter and generation service handles
    pub fn build_services(&self) -> Result<(Arc<dyn TokenCounterPort>, Arc<dyn LlmServicePort>)> {
        let timeout = Duration::from_secs(self.timeout_secs);

        match self.backend {
            Backend::Openai => {
                let tokenizer: Arc<dyn TokenCounterPort> = Arc::new(WordCountTokenizer::new());
                let llm: Arc<dyn LlmServicePort> = Arc::new(OpenAICompatService::new(
                    self.base_url(),
                    self.api_key.clone(),
                    timeout,
                )?);
                Ok((tokenizer, llm))
            }
            Backend::Koboldcpp => {
                let kobold = Arc::new(KoboldCppService::new(self.base_url(), timeout)?);
                let tokenizer: Arc<dyn TokenCounterPort> = match self.tokenizer {
                    TokenizerKind::Words => Arc::new(WordCountTokenizer::new()),
                    TokenizerKind::Remote => kobold.clone(),
                };
                let llm: Arc<dyn LlmServicePort> = kobold;
                Ok((tokenizer, llm))
            }
        }
    }
}
