use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Selection thresholds
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Extraction parameters
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            extraction: ExtractionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.selection.min_words == 0 {
            return Err(anyhow!("selection.min_words must be at least 1"));
        }
        if !self.selection.max_score.is_finite() {
            return Err(anyhow!("selection.max_score must be a finite number"));
        }
        if self.extraction.min_clip_length_ms < self.selection.min_duration_ms {
            return Err(anyhow!(
                "extraction.min_clip_length_ms ({}) must not be shorter than selection.min_duration_ms ({})",
                self.extraction.min_clip_length_ms,
                self.selection.min_duration_ms
            ));
        }
        if self.extraction.ffmpeg_timeout_secs == 0 || self.extraction.ffprobe_timeout_secs == 0 {
            return Err(anyhow!("extraction timeouts must be non-zero"));
        }
        Ok(())
    }
}

/// Thresholds controlling which scored entries make it into the selection.
///
/// These are tuning parameters, not correctness invariants, so all of them
/// are exposed with defaults rather than hard-coded.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SelectionConfig {
    /// Minimum word count for an entry to be considered
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Entries scoring at or above this Flesch value are considered too
    /// simple and discarded
    #[serde(default = "default_max_score")]
    pub max_score: f64,

    /// Entries shorter than this (ms) are discarded as trivial clips
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Maximum number of clips to extract, 0 means unlimited
    #[serde(default = "default_max_clips")]
    pub max_clips: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_score: default_max_score(),
            min_duration_ms: default_min_duration_ms(),
            max_clips: default_max_clips(),
        }
    }
}

/// Parameters for the ffmpeg extraction step.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Margin (ms) added before and after each entry's time range
    #[serde(default = "default_padding_ms")]
    pub padding_ms: u64,

    /// Windows shorter than this (ms) are extended forward before clamping
    #[serde(default = "default_min_clip_length_ms")]
    pub min_clip_length_ms: u64,

    /// Generate a screenshot per clip
    #[serde(default)]
    pub screenshot: bool,

    /// Extract a standalone audio track per clip
    #[serde(default = "default_audio")]
    pub audio: bool,

    /// Timeout for each ffmpeg invocation in seconds
    #[serde(default = "default_ffmpeg_timeout_secs")]
    pub ffmpeg_timeout_secs: u64,

    /// Timeout for each ffprobe invocation in seconds
    #[serde(default = "default_ffprobe_timeout_secs")]
    pub ffprobe_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            padding_ms: default_padding_ms(),
            min_clip_length_ms: default_min_clip_length_ms(),
            screenshot: false,
            audio: default_audio(),
            ffmpeg_timeout_secs: default_ffmpeg_timeout_secs(),
            ffprobe_timeout_secs: default_ffprobe_timeout_secs(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{}", s)
    }
}

fn default_min_words() -> usize {
    5
}

fn default_max_score() -> f64 {
    50.0
}

fn default_min_duration_ms() -> u64 {
    2_000
}

fn default_max_clips() -> usize {
    20
}

fn default_padding_ms() -> u64 {
    500
}

fn default_min_clip_length_ms() -> u64 {
    5_000
}

fn default_audio() -> bool {
    true
}

fn default_ffmpeg_timeout_secs() -> u64 {
    120
}

fn default_ffprobe_timeout_secs() -> u64 {
    60
}
