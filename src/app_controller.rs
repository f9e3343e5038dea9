use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::{AppError, SetupError};
use crate::file_utils::FileManager;
use crate::media_extractor::MediaExtractor;
use crate::report::{ReportRow, write_report};
use crate::selector::{Selection, score_entries, select};
use crate::subtitle_processor::SubtitleCollection;
use crate::upload::{Uploader, asset_key};

// @module: Application controller for the clip extraction pipeline

/// Report file name inside the run's output directory.
pub const REPORT_FILE_NAME: &str = "subtitles_important.csv";

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries parsed from the subtitle file
    pub parsed: usize,
    /// Malformed blocks skipped during parsing
    pub skipped_blocks: usize,
    /// Entries that received a complexity score
    pub scored: usize,
    /// Entries selected for extraction
    pub selected: usize,
    /// Entries whose assets were produced
    pub extracted: usize,
    /// Entries that failed during extraction
    pub failed: usize,
}

/// Main application controller for clip extraction
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Output directory for a run: `clips_<id>`, or `clips_local` without an id.
    pub fn output_dir(movie_id: Option<&str>) -> PathBuf {
        PathBuf::from(format!("clips_{}", movie_id.unwrap_or("local")))
    }

    /// Run the whole pipeline: parse, score, select, extract, report, upload.
    ///
    /// Setup problems (missing files, unreadable subtitles, zero parsable
    /// entries) abort with an error. Media tool problems do not: a failed
    /// duration probe and per-entry extraction failures are logged, counted
    /// in the summary, and the report is written either way.
    pub async fn run(
        &self,
        movie: &Path,
        srt: &Path,
        movie_id: Option<&str>,
        uploader: Option<&dyn Uploader>,
    ) -> Result<RunSummary, AppError> {
        let start_time = std::time::Instant::now();

        // Setup validation, all fatal
        if !FileManager::file_exists(movie) {
            return Err(SetupError::MissingMovie(movie.to_path_buf()).into());
        }
        if !FileManager::file_exists(srt) {
            return Err(SetupError::MissingSubtitles(srt.to_path_buf()).into());
        }

        let content = SubtitleCollection::read_with_encoding_fallback(srt).map_err(|e| {
            SetupError::UnreadableSubtitles {
                path: srt.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let (collection, skipped_blocks) = SubtitleCollection::from_srt_content(srt, &content)?;
        let mut summary = RunSummary {
            parsed: collection.entries.len(),
            skipped_blocks,
            ..RunSummary::default()
        };

        let scored = score_entries(&collection.entries);
        summary.scored = scored.len();

        let selection = select(scored, &self.config.selection);
        summary.selected = selection.len();
        info!(
            "Selected {} of {} entries for extraction",
            summary.selected, summary.parsed
        );

        let output_dir = Self::output_dir(movie_id);
        std::fs::create_dir_all(&output_dir).map_err(|e| SetupError::OutputDir {
            path: output_dir.clone(),
            source: e,
        })?;

        let rows = if selection.is_empty() {
            // Nothing qualified; still a successful run with an empty report
            Vec::new()
        } else {
            self.extract_selection(movie, &output_dir, selection, uploader, movie_id, &mut summary)
                .await
        };

        write_report(output_dir.join(REPORT_FILE_NAME), &rows)?;

        info!(
            "Run finished in {:.1}s: {} parsed, {} blocks skipped, {} scored, {} selected, {} extracted, {} failed",
            start_time.elapsed().as_secs_f64(),
            summary.parsed,
            summary.skipped_blocks,
            summary.scored,
            summary.selected,
            summary.extracted,
            summary.failed
        );

        Ok(summary)
    }

    /// Extract every selected entry behind a progress bar, collecting the
    /// report rows for the ones that succeeded.
    ///
    /// Tool failures never escape this stage: a failed duration probe counts
    /// every selected entry as failed and leaves the report empty.
    async fn extract_selection(
        &self,
        movie: &Path,
        output_dir: &Path,
        selection: Selection,
        uploader: Option<&dyn Uploader>,
        movie_id: Option<&str>,
        summary: &mut RunSummary,
    ) -> Vec<ReportRow> {
        let media_duration_ms = match MediaExtractor::probe_duration_ms(
            movie,
            self.config.extraction.ffprobe_timeout_secs,
        )
        .await
        {
            Ok(duration) => duration,
            Err(e) => {
                warn!(
                    "Probing {} failed, skipping extraction of {} entries: {}",
                    movie.display(),
                    selection.len(),
                    e
                );
                summary.failed = selection.len();
                return Vec::new();
            }
        };

        let extractor = MediaExtractor::new(
            movie.to_path_buf(),
            output_dir.to_path_buf(),
            media_duration_ms,
            self.config.extraction.clone(),
        );

        let progress_bar = ProgressBar::new(selection.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Extracting clips");

        let mut rows = Vec::with_capacity(selection.len());

        for scored in selection {
            match extractor.extract(&scored.entry).await {
                Ok(asset) => {
                    summary.extracted += 1;

                    if let (Some(uploader), Some(id)) = (uploader, movie_id) {
                        self.upload_assets(uploader, id, &asset.video, asset.screenshot.as_deref(), asset.audio.as_deref())
                            .await;
                    }

                    rows.push(ReportRow {
                        asset_path: asset.video.to_string_lossy().to_string(),
                        scored,
                    });
                }
                Err(e) => {
                    // Per-entry failure: report, skip, continue with the rest
                    summary.failed += 1;
                    warn!("Skipping entry {}: {}", scored.entry.seq_num, e);
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Extraction done");
        rows
    }

    /// Hand each finalized asset to the uploader, surfacing failures in the log.
    async fn upload_assets(
        &self,
        uploader: &dyn Uploader,
        movie_id: &str,
        video: &Path,
        screenshot: Option<&Path>,
        audio: Option<&Path>,
    ) {
        let assets = [Some(video), screenshot, audio];
        for asset in assets.into_iter().flatten() {
            if let Err(e) = uploader.upload(asset, &asset_key(movie_id, asset)).await {
                warn!("Upload failed for {}: {}", asset.display(), e);
            }
        }
    }
}
