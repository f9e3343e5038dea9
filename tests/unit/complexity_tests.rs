/*!
 * Tests for Flesch Reading Ease scoring
 */

use filmfluency::complexity::{
    MAX_SCORE, flesch_reading_ease, sentence_count, syllable_count, word_count,
};

/// The score is a pure function: identical text yields identical output
#[test]
fn test_flesch_withIdenticalText_shouldBeDeterministic() {
    let text = "The epistemological ramifications remain fundamentally obscure.";
    let first = flesch_reading_ease(text);
    let second = flesch_reading_ease(text);
    assert_eq!(first, second);
}

/// Empty or whitespace-only text yields the sentinel, never an error
#[test]
fn test_flesch_withEmptyText_shouldReturnSentinel() {
    assert_eq!(flesch_reading_ease(""), MAX_SCORE);
    assert_eq!(flesch_reading_ease("   \n\t "), MAX_SCORE);
    // Pure punctuation has no words either
    assert_eq!(flesch_reading_ease("... -- !!"), MAX_SCORE);
}

/// Simple dialogue scores higher than complex dialogue
#[test]
fn test_flesch_withSimpleAndComplexText_shouldRankSimpleHigher() {
    let simple = flesch_reading_ease("Run.");
    let complex = flesch_reading_ease("The epistemological ramifications remain obscure.");

    assert!(simple > complex);
    assert!(simple > 100.0);
    assert!(complex < 50.0);
}

/// Longer sentences lower the score
#[test]
fn test_flesch_withLongerSentences_shouldScoreLower() {
    let short = flesch_reading_ease("We go now. It is time.");
    let long = flesch_reading_ease("We go now and it is time so we all walk out the door as one.");
    assert!(short > long);
}

#[test]
fn test_word_count_shouldIgnorePunctuationTokens() {
    assert_eq!(word_count("Hello there, old friend."), 4);
    assert_eq!(word_count("-- ... !!"), 0);
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("42 is a number"), 4);
}

#[test]
fn test_sentence_count_shouldSplitOnTerminatorsWithMinimumOne() {
    assert_eq!(sentence_count("One. Two! Three?"), 3);
    assert_eq!(sentence_count("No terminator here"), 1);
    // Trailing terminator doesn't create an empty extra sentence
    assert_eq!(sentence_count("Just one."), 1);
    // Ellipsis runs collapse into a single boundary
    assert_eq!(sentence_count("Wait... what?"), 2);
}

#[test]
fn test_syllable_count_withCommonWords_shouldMatchHeuristic() {
    assert_eq!(syllable_count("run"), 1);
    assert_eq!(syllable_count("cat"), 1);
    assert_eq!(syllable_count("hello"), 2);
    assert_eq!(syllable_count("banana"), 3);
    // Trailing silent e
    assert_eq!(syllable_count("time"), 1);
    assert_eq!(syllable_count("obscure"), 2);
    // '-le' endings keep their final group
    assert_eq!(syllable_count("table"), 2);
    // Minimum one syllable, even for vowel-less or numeric tokens
    assert_eq!(syllable_count("hmm"), 1);
    assert_eq!(syllable_count("42"), 1);
}

/// Spot-check the formula against hand-computed counts:
/// "Run." = 1 word, 1 sentence, 1 syllable
#[test]
fn test_flesch_withSingleWord_shouldMatchFormula() {
    let expected = 206.835 - 1.015 * 1.0 - 84.6 * 1.0;
    let actual = flesch_reading_ease("Run.");
    assert!((actual - expected).abs() < 1e-9);
}
