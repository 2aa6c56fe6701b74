//! Utility modules
//!
//! File handling helpers shared by the CLI and the pipeline.

pub mod transcript_file;

pub use transcript_file::{read_transcript_lines, validate_transcript_path};
