use log::{debug, error, info};
use serde_json::{Value, from_str};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

use crate::app_config::ExtractionConfig;
use crate::errors::ExtractionError;
use crate::subtitle_processor::SubtitleEntry;

// @module: Clip extraction via ffmpeg/ffprobe child processes

/// Assets produced for one selected subtitle entry.
#[derive(Debug, Clone)]
pub struct ClipAsset {
    /// Subtitle entry the assets belong to
    pub seq_num: usize,
    /// Extracted video segment
    pub video: PathBuf,
    /// Screenshot taken from the clip, when requested
    pub screenshot: Option<PathBuf>,
    /// Standalone audio track, when requested
    pub audio: Option<PathBuf>,
}

/// Extraction window in the source media, already padded and clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionWindow {
    /// Window start in ms
    pub start_ms: u64,
    /// Window length in ms
    pub duration_ms: u64,
}

/// Cuts clips out of one source media file.
pub struct MediaExtractor {
    source: PathBuf,
    output_dir: PathBuf,
    media_duration_ms: u64,
    config: ExtractionConfig,
}

impl MediaExtractor {
    /// Create an extractor for a probed source file.
    pub fn new(
        source: PathBuf,
        output_dir: PathBuf,
        media_duration_ms: u64,
        config: ExtractionConfig,
    ) -> Self {
        MediaExtractor {
            source,
            output_dir,
            media_duration_ms,
            config,
        }
    }

    /// Probe the media duration in milliseconds with ffprobe.
    pub async fn probe_duration_ms<P: AsRef<Path>>(
        media_path: P,
        timeout_secs: u64,
    ) -> Result<u64, ExtractionError> {
        let media_path = media_path.as_ref();

        let output = run_with_timeout(
            Command::new("ffprobe").args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                media_path.to_str().unwrap_or_default(),
            ]),
            "ffprobe",
            0,
            timeout_secs,
        )
        .await?;

        if !output.status.success() {
            return Err(ExtractionError::Probe {
                path: media_path.to_path_buf(),
                reason: filter_ffmpeg_stderr(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = from_str(&stdout).map_err(|e| ExtractionError::Probe {
            path: media_path.to_path_buf(),
            reason: format!("unparsable ffprobe output: {}", e),
        })?;

        let duration_secs: f64 = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ExtractionError::Probe {
                path: media_path.to_path_buf(),
                reason: "no format.duration in ffprobe output".to_string(),
            })?;

        Ok((duration_secs * 1000.0) as u64)
    }

    /// Compute the padded extraction window for an entry, clamped to the
    /// actual media bounds. Windows shorter than the configured minimum
    /// clip length are extended forward before clamping.
    pub fn extraction_window(&self, entry: &SubtitleEntry) -> ExtractionWindow {
        compute_window(
            entry.start_time_ms,
            entry.end_time_ms,
            &self.config,
            self.media_duration_ms,
        )
    }

    /// Extract all assets for one entry: the clip itself, plus the optional
    /// screenshot and audio track derived from the produced clip.
    pub async fn extract(&self, entry: &SubtitleEntry) -> Result<ClipAsset, ExtractionError> {
        let window = self.extraction_window(entry);
        let video = self.clip_path(entry.seq_num);

        debug!(
            "Cutting entry {}: {} +{}ms -> {}",
            entry.seq_num,
            format_ffmpeg_time(window.start_ms),
            window.duration_ms,
            video.display()
        );

        self.run_ffmpeg(
            &[
                "-y",
                "-ss",
                &format_ffmpeg_time(window.start_ms),
                "-i",
                self.source.to_str().unwrap_or_default(),
                "-t",
                &format_ffmpeg_time(window.duration_ms),
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                video.to_str().unwrap_or_default(),
            ],
            entry.seq_num,
        )
        .await?;

        let screenshot = if self.config.screenshot {
            Some(self.take_screenshot(&video, entry.seq_num).await?)
        } else {
            None
        };

        let audio = if self.config.audio {
            Some(self.extract_audio(&video, entry.seq_num).await?)
        } else {
            None
        };

        info!("Extracted clip for entry {}: {}", entry.seq_num, video.display());

        Ok(ClipAsset {
            seq_num: entry.seq_num,
            video,
            screenshot,
            audio,
        })
    }

    /// Grab a single frame from the produced clip as a JPEG.
    async fn take_screenshot(&self, clip: &Path, seq_num: usize) -> Result<PathBuf, ExtractionError> {
        let output = self.output_dir.join(format!("shot_{:04}.jpg", seq_num));

        self.run_ffmpeg(
            &[
                "-y",
                "-ss",
                "2",
                "-i",
                clip.to_str().unwrap_or_default(),
                "-vframes",
                "1",
                output.to_str().unwrap_or_default(),
            ],
            seq_num,
        )
        .await?;

        Ok(output)
    }

    /// Extract the clip's audio track as 16-bit PCM WAV.
    async fn extract_audio(&self, clip: &Path, seq_num: usize) -> Result<PathBuf, ExtractionError> {
        let output = self.output_dir.join(format!("audio_{:04}.wav", seq_num));

        self.run_ffmpeg(
            &[
                "-y",
                "-i",
                clip.to_str().unwrap_or_default(),
                "-vn",
                "-acodec",
                "pcm_s16le",
                output.to_str().unwrap_or_default(),
            ],
            seq_num,
        )
        .await?;

        Ok(output)
    }

    /// Output path for an entry's video clip.
    pub fn clip_path(&self, seq_num: usize) -> PathBuf {
        self.output_dir.join(format!("clip_{:04}.mp4", seq_num))
    }

    async fn run_ffmpeg(&self, args: &[&str], seq_num: usize) -> Result<(), ExtractionError> {
        let output = run_with_timeout(
            Command::new("ffmpeg").args(args),
            "ffmpeg",
            seq_num,
            self.config.ffmpeg_timeout_secs,
        )
        .await?;

        if !output.status.success() {
            let stderr = filter_ffmpeg_stderr(&String::from_utf8_lossy(&output.stderr));
            error!("ffmpeg failed for entry {}: {}", seq_num, stderr);
            return Err(ExtractionError::CommandFailed {
                tool: "ffmpeg",
                seq_num,
                stderr,
            });
        }

        Ok(())
    }
}

/// Pure window arithmetic, separated from the extractor for testability.
pub fn compute_window(
    start_time_ms: u64,
    end_time_ms: u64,
    config: &ExtractionConfig,
    media_duration_ms: u64,
) -> ExtractionWindow {
    let start = start_time_ms.saturating_sub(config.padding_ms);
    let mut end = end_time_ms.saturating_add(config.padding_ms);

    if end - start < config.min_clip_length_ms {
        end = start + config.min_clip_length_ms;
    }

    // Clamp to what the media actually contains
    end = end.min(media_duration_ms);
    let start = start.min(end);

    ExtractionWindow {
        start_ms: start,
        duration_ms: end - start,
    }
}

/// Format milliseconds as an ffmpeg time argument (seconds with ms precision).
pub fn format_ffmpeg_time(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// Run a child process, failing with a timeout error if the tool does not
/// exit within the allotted time. Corrupt media can make ffmpeg hang.
async fn run_with_timeout(
    command: &mut Command,
    tool: &'static str,
    seq_num: usize,
    timeout_secs: u64,
) -> Result<Output, ExtractionError> {
    let future = command.output();
    let timeout = std::time::Duration::from_secs(timeout_secs);

    tokio::select! {
        result = future => {
            result.map_err(|e| ExtractionError::Spawn { tool, source: e })
        },
        _ = tokio::time::sleep(timeout) => {
            Err(ExtractionError::Timeout { tool, seq_num, timeout_secs })
        }
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
