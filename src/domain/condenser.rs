//! Transcript condensing
//!
//! Collapses a raw VTT-like transcript into one line per speaker turn
//! (diarized input) or one line per timed block (plain input).

use crate::domain::models::{CondensedTranscript, TimeRange, TranscriptLine};

const SPEAKER_TAG_OPEN: char = '[';
const SPEAKER_TAG_CLOSE: &str = "]: ";
const HEADER: &str = "WEBVTT";

/// Condenses raw transcript lines, picking the mode from the content
pub fn condense<S: AsRef<str>>(raw_lines: &[S]) -> CondensedTranscript {
    let diarized = is_diarized(raw_lines);
    let lines = if diarized {
        condense_diarized(raw_lines)
    } else {
        condense_plain(raw_lines)
    };

    log::debug!(
        "Condensed {} raw lines into {} lines (diarized: {})",
        raw_lines.len(),
        lines.len(),
        diarized
    );

    CondensedTranscript::new(lines, diarized)
}

/// Condenses a whole transcript held in memory
pub fn condense_text(raw: &str) -> CondensedTranscript {
    let lines: Vec<&str> = raw.lines().collect();
    condense(&lines)
}

/// A transcript is diarized when any line opens a speaker tag
pub fn is_diarized<S: AsRef<str>>(raw_lines: &[S]) -> bool {
    raw_lines
        .iter()
        .any(|line| line.as_ref().starts_with(SPEAKER_TAG_OPEN))
}

/// Splits `[SPEAKER]: speech` into `("SPEAKER", "speech")`
fn split_speaker(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(SPEAKER_TAG_OPEN)?;
    rest.split_once(SPEAKER_TAG_CLOSE)
}

/// Turn being accumulated while scanning diarized input
struct OpenTurn {
    speaker: String,
    time_range: TimeRange,
    segments: Vec<String>,
}

impl OpenTurn {
    fn close(self) -> TranscriptLine {
        TranscriptLine::turn(self.speaker, self.time_range, self.segments.join(" "))
    }
}

fn condense_diarized<S: AsRef<str>>(raw_lines: &[S]) -> Vec<TranscriptLine> {
    let mut condensed = Vec::new();
    let mut current: Option<OpenTurn> = None;

    for (i, line) in raw_lines.iter().enumerate() {
        let line = line.as_ref();
        let Some((speaker, speech)) = split_speaker(line) else {
            continue;
        };

        // The cue timing sits on the line right above the speech
        let time_range = match i.checked_sub(1).map(|prev| raw_lines[prev].as_ref()) {
            Some(prev) => TimeRange::find_in(prev),
            None => None,
        };
        let Some(time_range) = time_range else {
            log::debug!("Skipping line {}: no time range before speaker tag", i + 1);
            continue;
        };

        let speech = speech.trim().to_string();
        match current.as_mut() {
            Some(turn) if turn.speaker == speaker => {
                turn.segments.push(speech);
                turn.time_range.extend_to(&time_range);
            }
            _ => {
                if let Some(finished) = current.take() {
                    condensed.push(finished.close());
                }
                current = Some(OpenTurn {
                    speaker: speaker.to_string(),
                    time_range,
                    segments: vec![speech],
                });
            }
        }
    }

    if let Some(last) = current {
        condensed.push(last.close());
    }

    condensed
}

fn condense_plain<S: AsRef<str>>(raw_lines: &[S]) -> Vec<TranscriptLine> {
    let mut condensed = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in raw_lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.eq_ignore_ascii_case(HEADER) {
            continue;
        }

        if TimeRange::find_in(line).is_some() {
            if !block.is_empty() {
                condensed.push(TranscriptLine::block(block.join(" ")));
                block.clear();
            }
        } else {
            block.push(line);
        }
    }

    if !block.is_empty() {
        condensed.push(TranscriptLine::block(block.join(" ")));
    }

    condensed
}
