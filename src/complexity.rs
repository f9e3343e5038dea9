// @module: Flesch Reading Ease scoring for subtitle text

/// Score returned for empty or whitespace-only text.
///
/// This is the formula's theoretical maximum, meaning "maximally simple";
/// such entries can never outrank real dialogue in the selection.
pub const MAX_SCORE: f64 = 206.835;

/// Compute the Flesch Reading Ease score for a piece of text.
///
/// Higher scores mean simpler text; complex dialogue scores low
/// (possibly negative). The score is a pure function of the word,
/// sentence and syllable counts, so identical text always yields
/// an identical score.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words = word_count(text);
    if words == 0 {
        return MAX_SCORE;
    }

    let sentences = sentence_count(text);
    let syllables: usize = text
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphanumeric()))
        .map(syllable_count)
        .sum();

    206.835 - 1.015 * (words as f64 / sentences as f64) - 84.6 * (syllables as f64 / words as f64)
}

/// Count words: whitespace-separated tokens containing at least one
/// alphanumeric character. Pure punctuation tokens ("--", "...") don't count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphanumeric()))
        .count()
}

/// Count sentences by splitting on terminating punctuation.
///
/// A run of `.`, `!` or `?` closes a sentence; only segments that contain
/// actual words count. Text without terminators counts as one sentence,
/// so the result is always at least 1 for non-empty text.
pub fn sentence_count(text: &str) -> usize {
    let count = text
        .split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(|c| c.is_alphanumeric()))
        .count();
    count.max(1)
}

/// Estimate the syllable count of a single word with a vowel-group heuristic.
///
/// Consecutive vowels (including `y`) count as one group; a trailing silent
/// `e` is subtracted when the word has more than one group. Every word
/// counts as at least one syllable.
pub fn syllable_count(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if letters.is_empty() {
        // Numeric tokens ("42") still carry one spoken syllable at minimum
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0;
    let mut in_group = false;
    for &c in &letters {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
                in_group = true;
            }
        } else {
            in_group = false;
        }
    }

    // Silent trailing 'e' as in "obscure" or "time"
    if groups > 1 && letters.last() == Some(&'e') && !letters.ends_with(&['l', 'e']) {
        groups -= 1;
    }

    groups.max(1)
}
