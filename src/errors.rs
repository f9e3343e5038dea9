/*!
 * Error types for the filmfluency application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during subtitle parsing.
///
/// A malformed block is reported per block and skipped by the parser;
/// only an entirely unusable file is surfaced to the caller.
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A block that is missing its time-range line or has unparsable timestamps
    #[error("malformed subtitle block at line {line}: {reason}")]
    MalformedBlock {
        /// 1-based line number where the block starts
        line: usize,
        /// What made the block unusable
        reason: String,
    },

    /// The file contained no valid subtitle entries at all
    #[error("no valid subtitle entries found in {}", .0.display())]
    NoEntries(PathBuf),
}

/// Errors that can occur while cutting a clip with the external media tool.
///
/// These are per-entry errors: the controller logs them and continues
/// with the remaining entries.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The external tool could not be started
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        /// Tool binary name (ffmpeg or ffprobe)
        tool: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The external tool exited with a non-zero status
    #[error("{tool} failed for entry {seq_num}: {stderr}")]
    CommandFailed {
        /// Tool binary name
        tool: &'static str,
        /// Subtitle entry the invocation belonged to
        seq_num: usize,
        /// Filtered stderr of the tool
        stderr: String,
    },

    /// The external tool did not finish within the configured timeout
    #[error("{tool} timed out after {timeout_secs}s for entry {seq_num}")]
    Timeout {
        /// Tool binary name
        tool: &'static str,
        /// Subtitle entry the invocation belonged to
        seq_num: usize,
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// The media duration could not be determined
    #[error("could not probe media duration of {}: {reason}", .path.display())]
    Probe {
        /// Media file that was probed
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

/// Fatal setup errors that abort the run before any entry is processed.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The movie file does not exist or is not a file
    #[error("movie file not found: {}", .0.display())]
    MissingMovie(PathBuf),

    /// The subtitle file does not exist or is not a file
    #[error("subtitle file not found: {}", .0.display())]
    MissingSubtitles(PathBuf),

    /// The subtitle file exists but could not be read
    #[error("cannot read subtitle file {}: {reason}", .path.display())]
    UnreadableSubtitles {
        /// Subtitle file path
        path: PathBuf,
        /// What made it unreadable
        reason: String,
    },

    /// The output directory could not be created
    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        /// Output directory path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fatal setup error, aborts the run with a non-zero exit
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from clip extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
