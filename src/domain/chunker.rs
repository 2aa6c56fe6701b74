//! Token-budgeted chunking of condensed transcripts
//!
//! Splits newline-joined condensed text into contiguous chunks. Boundaries are
//! first spread evenly over the lines, then nudged forward onto the start of a
//! "big" line so a chunk tends to open with a substantial turn instead of a
//! short interjection.

use crate::domain::models::{Chunk, ChunkingConfig};

/// Number of chunks needed to keep each under the budget
pub fn target_chunk_count(total_tokens: usize, max_tokens_per_chunk: usize) -> usize {
    total_tokens.div_ceil(max_tokens_per_chunk)
}

/// Length of the content after the first colon, in characters
///
/// Strips a leading `label:` such as a speaker tag. Lines without a colon are
/// measured whole.
pub fn speech_len(line: &str) -> usize {
    match line.split_once(':') {
        Some((_, speech)) => speech.chars().count(),
        None => line.chars().count(),
    }
}

/// Evenly spaced starting line for each of `chunk_count` chunks
pub fn initial_boundaries(line_count: usize, chunk_count: usize) -> Vec<usize> {
    (0..chunk_count)
        .map(|i| i * line_count / chunk_count)
        .collect()
}

/// Moves a boundary forward onto the next big line
///
/// Walks from `start` while the current line is shorter than `big_speech_len`
/// and is not the last line. When the walk reaches `next_boundary` the result
/// is clamped to `next_boundary - 1`. `None` leaves the walk bounded only by
/// the end of the transcript.
pub fn adjust_boundary(
    lines: &[&str],
    start: usize,
    next_boundary: Option<usize>,
    big_speech_len: usize,
) -> usize {
    let mut index = start;
    while index + 1 < lines.len() && speech_len(lines[index]) < big_speech_len {
        index += 1;
        if let Some(next) = next_boundary {
            if index >= next {
                return next.saturating_sub(1).max(start);
            }
        }
    }
    index
}

/// Adjusts every boundary but the first, from last to first
///
/// Each boundary is limited by the next boundary's original position.
pub fn adjust_boundaries(
    lines: &[&str],
    boundaries: &[usize],
    big_speech_len: usize,
) -> Vec<usize> {
    let mut adjusted = boundaries.to_vec();
    for i in (1..boundaries.len()).rev() {
        let next = boundaries.get(i + 1).copied();
        adjusted[i] = adjust_boundary(lines, boundaries[i], next, big_speech_len);
    }
    adjusted
}

/// Splits `text` into chunks that roughly respect the token budget
///
/// `total_tokens` is the externally estimated size of the whole text. Empty
/// chunks produced by collapsed boundaries are dropped; the rest still cover
/// every line exactly once and in order.
pub fn chunk_transcript(text: &str, total_tokens: usize, config: &ChunkingConfig) -> Vec<Chunk> {
    if total_tokens <= config.max_tokens_per_chunk {
        let line_count = text.split('\n').count();
        log::info!("Transcript fits in one chunk ({} lines)", line_count);
        return vec![Chunk {
            index: 1,
            start_line: 0,
            end_line: line_count,
            text: text.to_string(),
        }];
    }

    let chunk_count = target_chunk_count(total_tokens, config.max_tokens_per_chunk);
    let lines: Vec<&str> = text.split('\n').collect();

    let boundaries = initial_boundaries(lines.len(), chunk_count);
    let boundaries = adjust_boundaries(&lines, &boundaries, config.big_speech_len);

    let mut chunks = Vec::with_capacity(boundaries.len());
    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(lines.len());
        if start >= end {
            log::debug!("Dropping empty chunk at line {}", start);
            continue;
        }
        chunks.push(Chunk {
            index: chunks.len() + 1,
            start_line: start,
            end_line: end,
            text: lines[start..end].join("\n"),
        });
    }

    log::info!(
        "Total number of lines in transcript: {}, chunks: {}",
        lines.len(),
        chunks.len()
    );
    log::info!("Line separators: {:?}", boundaries);

    chunks
}
