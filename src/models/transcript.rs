//! Transcript text and the approximate timing derived from it.
//!
//! Timing is NOT real caption timing: the text is split on sentence
//! terminators and a total duration is spread evenly over the sentences.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ASSUMED_MEDIA_DURATION_SECS;

static SENTENCE_TERMINATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Timed slice of text used for playback-synchronised highlighting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: usize,
    pub text: String,
    /// Seconds from the start of the media.
    pub start_time: f64,
    pub end_time: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }
}

/// Sentence fragments of `text`, trimmed, empty ones dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Spread `total_duration` evenly over `sentences`: the k-th of N segments
/// covers `[k*D/N, (k+1)*D/N)`.
fn spread(sentences: &[&str], per_sentence: f64) -> Vec<Segment> {
    sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| Segment {
            id: index,
            text: format!("{}.", sentence),
            start_time: index as f64 * per_sentence,
            end_time: (index + 1) as f64 * per_sentence,
        })
        .collect()
}

/// Source text produced by stage 1. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Timing over an explicit total duration in seconds.
    pub fn segments(&self, total_duration: f64) -> Vec<Segment> {
        let sentences = split_sentences(&self.text);
        if sentences.is_empty() {
            return Vec::new();
        }
        spread(&sentences, total_duration / sentences.len() as f64)
    }

    /// Timing used by the background: the media duration is unknown there,
    /// so a fixed five minutes is assumed.
    pub fn assumed_segments(&self) -> Vec<Segment> {
        self.segments(ASSUMED_MEDIA_DURATION_SECS)
    }
}

/// Original and translated segment lists shown side by side by the overlay.
///
/// Both lists share the per-sentence slot computed from the ORIGINAL sentence
/// count, so translated segment k lines up with original segment k even when
/// the translation has a different number of sentences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptView {
    pub original: Vec<Segment>,
    pub translated: Vec<Segment>,
}

impl TranscriptView {
    /// `media_duration` is the real video duration when the player knows it.
    pub fn build(original: &str, translated: &str, media_duration: Option<f64>) -> Self {
        let duration = media_duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(ASSUMED_MEDIA_DURATION_SECS);

        let original_sentences = split_sentences(original);
        let translated_sentences = split_sentences(translated);

        let slots = if original_sentences.is_empty() {
            translated_sentences.len()
        } else {
            original_sentences.len()
        };
        if slots == 0 {
            return Self {
                original: Vec::new(),
                translated: Vec::new(),
            };
        }

        let per_sentence = duration / slots as f64;
        Self {
            original: spread(&original_sentences, per_sentence),
            translated: spread(&translated_sentences, per_sentence),
        }
    }

    /// Index of the translated segment active at `time`, if any.
    pub fn active_translated(&self, time: f64) -> Option<usize> {
        self.translated.iter().position(|s| s.contains(time))
    }
}
