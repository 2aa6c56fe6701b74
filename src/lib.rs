//! Meeting transcript summarizer
//!
//! Condenses VTT transcripts into speaker turns, splits them into chunks that
//! fit an LLM context window and stitches the per-chunk summaries together.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

pub use commands::{SummarizeSettings, SummaryPipeline};
pub use error::{AppError, Result};
