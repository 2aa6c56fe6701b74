//! Transcript file utilities
//!
//! Validates and loads `.vtt` transcript files from disk.

use crate::error::{AppError, Result};
use std::path::Path;

/// Required transcript file extension
pub const TRANSCRIPT_EXTENSION: &str = "vtt";

/// Check that `path` names an existing `.vtt` file
pub fn validate_transcript_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.extension().and_then(|ext| ext.to_str()) != Some(TRANSCRIPT_EXTENSION) {
        return Err(AppError::InvalidInput(format!(
            "The provided file is not a .{} file: {}",
            TRANSCRIPT_EXTENSION,
            path.display()
        )));
    }

    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "The file {} does not exist",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(AppError::InvalidInput(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read a transcript into its raw lines
pub fn read_transcript_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    validate_transcript_path(path)?;

    let content = std::fs::read_to_string(path)?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();

    log::debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}
