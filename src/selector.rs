use log::debug;
use std::cmp::Ordering;

use crate::app_config::SelectionConfig;
use crate::complexity::{flesch_reading_ease, word_count};
use crate::subtitle_processor::SubtitleEntry;

// @module: Ranking and filtering of scored subtitle entries

/// A subtitle entry together with its Flesch Reading Ease score.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// The underlying subtitle entry
    pub entry: SubtitleEntry,
    /// Flesch Reading Ease score of the entry text (lower = more complex)
    pub score: f64,
}

/// The ranked, filtered subset of entries chosen for extraction,
/// most complex first.
pub type Selection = Vec<ScoredEntry>;

/// Compute the complexity score for every entry.
pub fn score_entries(entries: &[SubtitleEntry]) -> Vec<ScoredEntry> {
    entries
        .iter()
        .map(|entry| ScoredEntry {
            score: flesch_reading_ease(&entry.text),
            entry: entry.clone(),
        })
        .collect()
}

/// Apply the selection policy to a scored sequence.
///
/// Entries below the word-count floor, at or above the simplicity threshold,
/// or shorter than the minimum duration are dropped. The survivors are
/// stably sorted by ascending score (most complex first, ties keep subtitle
/// order) and truncated to the configured maximum. An empty result is a
/// valid outcome, not an error.
pub fn select(scored: Vec<ScoredEntry>, config: &SelectionConfig) -> Selection {
    let before = scored.len();

    let mut selection: Selection = scored
        .into_iter()
        .filter(|s| word_count(&s.entry.text) >= config.min_words)
        .filter(|s| s.score < config.max_score)
        .filter(|s| s.entry.duration_ms() >= config.min_duration_ms)
        .collect();

    // Vec::sort_by is stable, equal scores keep original subtitle order
    selection.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    if config.max_clips > 0 {
        selection.truncate(config.max_clips);
    }

    debug!(
        "Selected {} of {} scored entries (min_words={}, max_score={}, min_duration_ms={}, max_clips={})",
        selection.len(),
        before,
        config.min_words,
        config.max_score,
        config.min_duration_ms,
        config.max_clips
    );

    selection
}
