use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::matcher;

/// A transcribed word with its timing in the source audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInterval {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl WordInterval {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Whisper transcription segment
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

/// Individual word from whisper with timing
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// Full transcription result: chronological, non-overlapping segments
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Concatenated segment text, for display
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Flatten the segment/word tree into one chronological interval sequence.
///
/// Segments arrive chronological and non-overlapping, so plain flattening
/// preserves temporal order. Intervals that violate `0 <= start < end`
/// (expected transcription noise) are dropped with a warning rather than
/// failing the run.
pub fn flatten_intervals(transcript: &Transcript) -> Vec<WordInterval> {
    transcript
        .segments
        .iter()
        .flat_map(|segment| segment.words.iter())
        .filter_map(|word| {
            if !word.start.is_finite() || !word.end.is_finite() || word.start < 0.0 || word.start >= word.end {
                warn!(
                    "Skipping malformed word interval '{}' ({}..{})",
                    word.word.trim(),
                    word.start,
                    word.end
                );
                return None;
            }
            Some(WordInterval::new(word.start, word.end, word.word.trim()))
        })
        .collect()
}

/// Filter intervals down to the ones whose text matches the target list.
///
/// Output keeps the chronological order of the input; the censor relies on
/// the intervals being disjoint, which they are because transcribed words
/// do not overlap.
pub fn find_targets(
    intervals: &[WordInterval],
    targets: &[String],
    threshold: f64,
) -> Vec<WordInterval> {
    let matched: Vec<WordInterval> = intervals
        .iter()
        .filter(|interval| matcher::is_target(&interval.text, targets, threshold))
        .cloned()
        .collect();

    for interval in &matched {
        info!(
            "Target word '{}' at {:.2}s-{:.2}s",
            interval.text, interval.start, interval.end
        );
    }

    matched
}
