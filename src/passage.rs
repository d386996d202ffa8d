//! Passage segmentation
//!
//! Splits the English passage into display tokens and flags the ones that
//! contain a vocabulary word.

use regex::Regex;
use tracing::warn;

/// A run of passage text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// Token contains a vocabulary word
    pub highlighted: bool,
}

/// Case-insensitive whole-word matcher for a vocabulary word
pub fn word_pattern(word: &str) -> Option<Regex> {
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping unmatchable vocabulary word '{}': {}", word, e);
            None
        }
    }
}

/// Split a passage on whitespace, keeping the whitespace as its own segments
///
/// Joining every segment's text gives back the passage unchanged.
pub fn segment(passage: &str, highlights: &[&str]) -> Vec<Segment> {
    let patterns: Vec<Regex> = highlights.iter().filter_map(|w| word_pattern(w)).collect();

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for c in passage.chars() {
        if !current.is_empty() && c.is_whitespace() != in_space {
            segments.push(make_segment(std::mem::take(&mut current), in_space, &patterns));
        }
        in_space = c.is_whitespace();
        current.push(c);
    }
    if !current.is_empty() {
        segments.push(make_segment(current, in_space, &patterns));
    }

    segments
}

fn make_segment(text: String, is_space: bool, patterns: &[Regex]) -> Segment {
    let highlighted = !is_space && patterns.iter().any(|re| re.is_match(&text));
    Segment { text, highlighted }
}
