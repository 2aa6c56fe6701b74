/// Domain models for the transcript summarizer
///
/// These models are transport-agnostic and live only for one summarization run.
use crate::error::{AppError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;

/// Matches `START --> END` anywhere in a line, with optional hour fields.
const TIME_RANGE_PATTERN: &str =
    r"((?:\d{2,}:)?\d{2}:\d{2}\.\d{3}) --> ((?:\d{2,}:)?\d{2}:\d{2}\.\d{3})";

/// Minutes-only form, tried when the hour field does not parse
const SHORT_TIME_RANGE_PATTERN: &str = r"(\d{2}:\d{2}\.\d{3}) --> (\d{2}:\d{2}\.\d{3})";

fn time_range_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(TIME_RANGE_PATTERN).expect("valid time range pattern"))
}

fn short_time_range_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(SHORT_TIME_RANGE_PATTERN).expect("valid short time range pattern")
    })
}

/// Offset into the recording, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = AppError;

    /// Parses `MM:SS.mmm` or `HH:MM:SS.mmm`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::InvalidInput(format!("Invalid timestamp: {}", s));

        let (clock, millis) = s.split_once('.').ok_or_else(invalid)?;
        if millis.len() != 3 {
            return Err(invalid());
        }
        let millis: u64 = millis.parse().map_err(|_| invalid())?;

        let fields = clock
            .split(':')
            .map(|field| field.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let (hours, minutes, seconds) = match fields.as_slice() {
            [minutes, seconds] => (0, *minutes, *seconds),
            [hours, minutes, seconds] => (*hours, *minutes, *seconds),
            _ => return Err(invalid()),
        };

        hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .and_then(|total| total.checked_mul(60))
            .and_then(|total| total.checked_add(seconds))
            .and_then(|total| total.checked_mul(1000))
            .and_then(|total| total.checked_add(millis))
            .map(Self)
            .ok_or_else(|| AppError::InvalidInput(format!("Timestamp out of range: {}", s)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let millis = self.0 % 1000;
        let total_secs = self.0 / 1000;
        let (hours, minutes, seconds) = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);
        if hours > 0 {
            write!(f, "{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
        } else {
            write!(f, "{:02}:{:02}.{:03}", minutes, seconds, millis)
        }
    }
}

/// A `START --> END` cue timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Finds the first time range anywhere in `line`
    ///
    /// An hour field too large to represent is ignored and the range is read
    /// from the trailing `MM:SS.mmm` fields instead.
    pub fn find_in(line: &str) -> Option<Self> {
        Self::capture(time_range_regex(), line)
            .or_else(|| Self::capture(short_time_range_regex(), line))
    }

    fn capture(regex: &Regex, line: &str) -> Option<Self> {
        let captures = regex.captures(line)?;
        let start = captures.get(1)?.as_str().parse().ok()?;
        let end = captures.get(2)?.as_str().parse().ok()?;
        Some(Self { start, end })
    }

    /// Widens this range so that it ends where `later` ends
    pub fn extend_to(&mut self, later: &TimeRange) {
        self.end = later.end;
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --> {}", self.start, self.end)
    }
}

/// One condensed unit of a transcript: a speaker turn or a timed text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub time_range: Option<TimeRange>,
    pub speaker: Option<String>,
    pub text: String,
}

impl TranscriptLine {
    /// Creates a speaker turn
    pub fn turn(speaker: String, time_range: TimeRange, text: String) -> Self {
        Self {
            time_range: Some(time_range),
            speaker: Some(speaker),
            text,
        }
    }

    /// Creates an untimed, unattributed text block
    pub fn block(text: String) -> Self {
        Self {
            time_range: None,
            speaker: None,
            text,
        }
    }
}

impl std::fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.speaker {
            Some(speaker) => write!(f, "[{}]: {}", speaker, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Ordered output of the condenser
///
/// Every line renders to exactly one physical line of text, so line indices
/// in the joined text map one-to-one onto `lines`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedTranscript {
    pub lines: Vec<TranscriptLine>,
    pub diarized: bool,
}

impl CondensedTranscript {
    pub fn new(lines: Vec<TranscriptLine>, diarized: bool) -> Self {
        Self { lines, diarized }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-joined text fed to the token counter and the chunker
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Time covered by the timed lines in `range`, if any
    pub fn span(&self, range: Range<usize>) -> Option<TimeRange> {
        let lines = self.lines.get(range)?;
        let mut timed = lines.iter().filter_map(|line| line.time_range);
        let first = timed.next()?;
        let end = timed.last().map_or(first.end, |last| last.end);
        Some(TimeRange::new(first.start, end))
    }
}

/// A contiguous run of condensed lines sent as one generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position in the chunk sequence
    pub index: usize,
    /// First line (inclusive) in the condensed text
    pub start_line: usize,
    /// Last line (exclusive) in the condensed text
    pub end_line: usize,
    pub text: String,
}

impl Chunk {
    pub fn line_range(&self) -> Range<usize> {
        self.start_line..self.end_line
    }

    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line
    }
}

/// Budget and boundary settings for the chunker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum estimated tokens carried by one chunk
    pub max_tokens_per_chunk: usize,

    /// Minimum characters (after the first colon) for a line to anchor a chunk start
    pub big_speech_len: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: 22_000,
            big_speech_len: 100,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens_per_chunk == 0 {
            return Err(AppError::Config(
                "max_tokens_per_chunk must be positive".to_string(),
            ));
        }
        if self.big_speech_len == 0 {
            return Err(AppError::Config(
                "big_speech_len must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_timestamp_parsing() {
        assert_eq!(ts("00:28.203").as_millis(), 28_203);
        assert_eq!(ts("01:02.003").as_millis(), 62_003);
        assert_eq!(ts("01:00:00.500").as_millis(), 3_600_500);
        assert!("00:28".parse::<Timestamp>().is_err());
        assert!("aa:28.203".parse::<Timestamp>().is_err());
        assert!("00:28.20".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_timestamp_overflow_is_rejected() {
        let err = "99999999999999999:00:00.000".parse::<Timestamp>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!("123456789012345678901234:00:00.000".parse::<Timestamp>().is_err());
        assert_eq!(ts("99:59:59.999").as_millis(), 359_999_999);
    }

    #[test]
    fn test_time_range_with_oversized_hours_falls_back_to_minutes() {
        let range = TimeRange::find_in("99999999999999999:00:00.000 --> 00:01.000").unwrap();
        assert_eq!(range.to_string(), "00:00.000 --> 00:01.000");
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(ts("00:00.651").to_string(), "00:00.651");
        assert_eq!(ts("59:59.999").to_string(), "59:59.999");
        assert_eq!(ts("01:02:03.004").to_string(), "01:02:03.004");
    }

    #[test]
    fn test_time_range_found_anywhere_in_line() {
        let range = TimeRange::find_in("cue 3: 00:00.651 --> 00:28.203 align:start").unwrap();
        assert_eq!(range.start, ts("00:00.651"));
        assert_eq!(range.end, ts("00:28.203"));
        assert_eq!(range.to_string(), "00:00.651 --> 00:28.203");

        assert!(TimeRange::find_in("[SPEAKER_0]: hello").is_none());
        assert!(TimeRange::find_in("00:00.651 -> 00:28.203").is_none());
    }

    #[test]
    fn test_transcript_line_rendering() {
        let range = TimeRange::new(ts("00:00.000"), ts("00:01.000"));
        let turn = TranscriptLine::turn("SPEAKER_0".to_string(), range, "Hello".to_string());
        assert_eq!(turn.to_string(), "[SPEAKER_0]: Hello");

        let block = TranscriptLine::block("Plain text".to_string());
        assert_eq!(block.to_string(), "Plain text");
    }

    #[test]
    fn test_span_covers_timed_lines() {
        let transcript = CondensedTranscript::new(
            vec![
                TranscriptLine::turn(
                    "A".to_string(),
                    TimeRange::new(ts("00:01.000"), ts("00:05.000")),
                    "one".to_string(),
                ),
                TranscriptLine::turn(
                    "B".to_string(),
                    TimeRange::new(ts("00:05.000"), ts("00:09.000")),
                    "two".to_string(),
                ),
                TranscriptLine::turn(
                    "A".to_string(),
                    TimeRange::new(ts("00:09.000"), ts("00:12.500")),
                    "three".to_string(),
                ),
            ],
            true,
        );

        assert_eq!(
            transcript.span(0..2),
            Some(TimeRange::new(ts("00:01.000"), ts("00:09.000")))
        );
        assert_eq!(
            transcript.span(2..3),
            Some(TimeRange::new(ts("00:09.000"), ts("00:12.500")))
        );
        assert_eq!(transcript.span(1..9), None);
        assert_eq!(transcript.to_text(), "[A]: one\n[B]: two\n[A]: three");
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::default().validate().is_ok());

        let config = ChunkingConfig {
            max_tokens_per_chunk: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = ChunkingConfig {
            big_speech_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
