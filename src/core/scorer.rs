//! Pronunciation Scorer
//!
//! Compares a spoken transcript against the target word or sentence using
//! character-level edit distance and maps the similarity to feedback.

use super::normalizer::normalize;
use serde::Serialize;

/// Score at or above which an attempt counts as "great"
pub const GREAT_THRESHOLD: u8 = 90;

/// Score at or above which an attempt counts as "good"
pub const GOOD_THRESHOLD: u8 = 75;

/// Qualitative feedback tier for a scored attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackTier {
    Excellent,
    Great,
    Good,
    KeepPracticing,
    NoSound,
}

impl FeedbackTier {
    /// Tier for a non-exact, non-empty comparison
    pub fn from_score(score: u8) -> Self {
        if score >= GREAT_THRESHOLD {
            FeedbackTier::Great
        } else if score >= GOOD_THRESHOLD {
            FeedbackTier::Good
        } else {
            FeedbackTier::KeepPracticing
        }
    }

    /// User-facing feedback text
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Excellent! Perfect pronunciation.",
            FeedbackTier::Great => "Great job! Very close.",
            FeedbackTier::Good => "Good effort, but check your pronunciation.",
            FeedbackTier::KeepPracticing => "Keep practicing. Listen and try again.",
            FeedbackTier::NoSound => "No sound detected.",
        }
    }
}

/// Outcome of scoring one transcript against its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    /// Similarity in 0..=100
    pub score: u8,
    pub tier: FeedbackTier,
    pub feedback: String,
}

impl ScoreResult {
    fn new(score: u8, tier: FeedbackTier) -> Self {
        Self {
            score,
            tier,
            feedback: tier.message().to_string(),
        }
    }
}

/// Score a spoken transcript against the target text
pub fn score(target: &str, transcript: &str) -> ScoreResult {
    let t = normalize(target);
    let s = normalize(transcript);

    if s.is_empty() {
        return ScoreResult::new(0, FeedbackTier::NoSound);
    }

    if t == s {
        return ScoreResult::new(100, FeedbackTier::Excellent);
    }

    let distance = levenshtein(&t, &s);
    let max_length = t.chars().count().max(s.chars().count());
    let similarity = (1.0 - distance as f64 / max_length as f64) * 100.0;

    // distance <= max_length, so similarity stays within 0..=100
    let score = similarity.round().clamp(0.0, 100.0) as u8;

    ScoreResult::new(score, FeedbackTier::from_score(score))
}

/// Classic Levenshtein distance over characters
///
/// Fills the full `(|b|+1) x (|a|+1)` matrix where cell `[i][j]` is the
/// cost of turning the first `j` characters of `a` into the first `i`
/// characters of `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            matrix[i][j] = if b[i - 1] == a[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
            };
        }
    }

    matrix[b.len()][a.len()]
}
