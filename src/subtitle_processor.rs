use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SubtitleError;

// @module: SRT subtitle parsing and timestamp handling

// @const: SRT time-range regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @const: Formatting markup: HTML-style tags and ASS override codes
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>|\{\\[^}]*\}").unwrap());

// @struct: Single subtitle entry
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Sequence number as authored (1-based)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Dialogue text, markup stripped, inner newlines joined
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    #[allow(dead_code)]
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
    ) -> Result<Self> {
        if end_time_ms <= start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_time_ms,
                start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds - used by tests
    #[allow(dead_code)]
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split([':', ',', '.']).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!(
                "Invalid time components in timestamp: {}",
                timestamp
            ));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Entry duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms - self.start_time_ms
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Result of parsing one SRT file: the valid entries plus the number
/// of malformed blocks that were skipped.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,
    /// Blocks skipped because of a missing/unparsable time-range line
    pub skipped_blocks: usize,
}

/// Collection of subtitle entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Parse already-read SRT content into a collection.
    ///
    /// Fails only when the whole file yields no valid entry; individual
    /// malformed blocks are skipped with a warning and counted in the
    /// returned outcome.
    pub fn from_srt_content(path: &Path, content: &str) -> Result<(Self, usize), SubtitleError> {
        let outcome = Self::parse_srt_string(content);
        if outcome.entries.is_empty() {
            return Err(SubtitleError::NoEntries(path.to_path_buf()));
        }

        debug!(
            "Parsed {} entries from {} ({} malformed blocks skipped)",
            outcome.entries.len(),
            path.display(),
            outcome.skipped_blocks
        );

        Ok((
            SubtitleCollection {
                source_file: path.to_path_buf(),
                entries: outcome.entries,
            },
            outcome.skipped_blocks,
        ))
    }

    /// Read a subtitle file, trying UTF-8 first, then UTF-16 (BOM-detected),
    /// then Latin-1. Subtitle files in the wild come in all of these.
    pub fn read_with_encoding_fallback(path: &Path) -> Result<String> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        if let Ok(text) = String::from_utf8(bytes.clone()) {
            return Ok(text);
        }

        // UTF-16 with BOM
        if bytes.len() >= 2 {
            let (le, be) = (bytes[0] == 0xFF && bytes[1] == 0xFE, bytes[0] == 0xFE && bytes[1] == 0xFF);
            if le || be {
                let units: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|pair| {
                        if le {
                            u16::from_le_bytes([pair[0], pair[1]])
                        } else {
                            u16::from_be_bytes([pair[0], pair[1]])
                        }
                    })
                    .collect();
                return Ok(String::from_utf16_lossy(&units));
            }
        }

        // Latin-1: every byte maps directly to a code point
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Parse SRT format content into subtitle entries.
    ///
    /// The content is split on blank-line boundaries into blocks; each block
    /// carries an index line, a time-range line and one or more text lines.
    /// Malformed blocks are skipped with a warning, never fatal.
    pub fn parse_srt_string(content: &str) -> ParseOutcome {
        let mut entries = Vec::new();
        let mut skipped_blocks = 0;

        let mut block: Vec<&str> = Vec::new();
        let mut block_start_line = 1;
        let mut line_no = 0;

        let flush = |block: &[&str], start_line: usize, entries: &mut Vec<SubtitleEntry>, skipped: &mut usize| {
            if block.is_empty() {
                return;
            }
            match Self::parse_block(block, start_line) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping subtitle block: {}", e);
                    *skipped += 1;
                }
            }
        };

        for line in content.lines() {
            line_no += 1;
            if line.trim().is_empty() {
                flush(&block, block_start_line, &mut entries, &mut skipped_blocks);
                block.clear();
                block_start_line = line_no + 1;
            } else {
                block.push(line);
            }
        }
        flush(&block, block_start_line, &mut entries, &mut skipped_blocks);

        ParseOutcome {
            entries,
            skipped_blocks,
        }
    }

    /// Parse a single numbered block. Returns Ok(None) for blocks that are
    /// ignorable noise (an index with no content at end of file).
    fn parse_block(lines: &[&str], start_line: usize) -> Result<Option<SubtitleEntry>, SubtitleError> {
        // Index line; some files omit it, in which case the time range is first
        let (seq_num, rest) = match lines[0].trim().parse::<usize>() {
            Ok(num) => (Some(num), &lines[1..]),
            Err(_) => (None, lines),
        };

        if rest.is_empty() {
            // A bare index at end of file is noise, not a malformed block
            return Ok(None);
        }

        let caps = TIMESTAMP_REGEX.captures(rest[0].trim()).ok_or_else(|| {
            SubtitleError::MalformedBlock {
                line: start_line,
                reason: format!("expected time range, got '{}'", rest[0].trim()),
            }
        })?;

        let start_ms = Self::capture_to_ms(&caps, 1);
        let end_ms = Self::capture_to_ms(&caps, 5);
        if end_ms <= start_ms {
            return Err(SubtitleError::MalformedBlock {
                line: start_line,
                reason: format!("end time {} <= start time {}", end_ms, start_ms),
            });
        }

        let text = Self::clean_text(&rest[1..]);
        if text.is_empty() {
            // Timed block with no dialogue (pure markup or empty), skip quietly
            return Ok(None);
        }

        Ok(Some(SubtitleEntry {
            seq_num: seq_num.unwrap_or(0),
            start_time_ms: start_ms,
            end_time_ms: end_ms,
            text,
        }))
    }

    /// Join the text lines of a block with spaces and strip formatting markup.
    fn clean_text(lines: &[&str]) -> String {
        let joined = lines
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let stripped = MARKUP_REGEX.replace_all(&joined, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Convert a matched time-range capture group (4 numeric fields starting
    /// at start_idx) to milliseconds.
    fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |i: usize| -> u64 {
            caps.get(start_idx + i)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
