//! Lesson data
//!
//! Loads the passage and vocabulary list from a `data.json` file.

use crate::core::{Target, TargetKind};
use crate::error::{CoachError, CoachResult};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use strsim::normalized_levenshtein;
use tracing::info;

/// Title used when the data file has none
pub const DEFAULT_TITLE: &str = "速読英単語　必修編　マスターアプリ";

/// Sub-title used when the data file has none
pub const DEFAULT_SUB_TITLE: &str = "01 お茶の木の種類 [文化]";

/// Minimum similarity for a "did you mean" suggestion
const SUGGESTION_CUTOFF: f64 = 0.6;

const DEFAULT_RANK: &str = "★★★";

/// English passage and its Japanese translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub en: String,
    pub ja: String,
}

/// One vocabulary card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    pub id: String,
    pub word: String,
    pub meaning: String,
    pub sentence: Option<String>,
    pub translation: Option<String>,
    pub rank: String,
}

/// A loaded lesson: passage plus vocabulary list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub title: String,
    pub sub_title: String,
    pub story: Story,
    pub vocabulary: Vec<VocabEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLesson {
    title: Option<String>,
    sub_title: Option<String>,
    text: RawText,
    vocabulary: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    en: String,
    #[serde(default)]
    ja: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: RawId,
    word: String,
    definition: String,
    #[serde(default)]
    examples: Option<Vec<RawExample>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
struct RawExample {
    en: Option<String>,
    ja: Option<String>,
}

impl Lesson {
    /// Load a lesson from a JSON data file
    pub fn load(path: &Path) -> CoachResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoachError::Lesson(format!("cannot read {}: {}", path.display(), e))
        })?;
        let lesson = Self::from_json(&content)?;
        info!(
            "📖 Loaded lesson '{}' ({} words) from {}",
            lesson.sub_title,
            lesson.vocabulary.len(),
            path.display()
        );
        Ok(lesson)
    }

    /// Parse a lesson from JSON text
    pub fn from_json(content: &str) -> CoachResult<Self> {
        let raw: RawLesson = serde_json::from_str(content)?;

        let mut seen = HashSet::new();
        let mut vocabulary = Vec::with_capacity(raw.vocabulary.len());
        for entry in raw.vocabulary {
            let id = match entry.id {
                RawId::Text(text) => text,
                RawId::Number(n) => n.to_string(),
            };
            if !seen.insert(id.clone()) {
                return Err(CoachError::Lesson(format!("duplicate vocabulary id '{}'", id)));
            }

            let first = entry.examples.into_iter().flatten().next();
            let (sentence, translation) = match first {
                Some(example) => (example.en, example.ja),
                None => (None, None),
            };

            vocabulary.push(VocabEntry {
                id,
                word: entry.word,
                meaning: entry.definition,
                sentence,
                translation,
                rank: DEFAULT_RANK.to_string(),
            });
        }

        Ok(Self {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            sub_title: raw.sub_title.unwrap_or_else(|| DEFAULT_SUB_TITLE.to_string()),
            story: Story {
                en: raw.text.en,
                ja: raw.text.ja.unwrap_or_default(),
            },
            vocabulary,
        })
    }

    /// Look up an entry by id
    pub fn entry(&self, id: &str) -> Option<&VocabEntry> {
        self.vocabulary.iter().find(|v| v.id == id)
    }

    /// Look up an entry by id, with a suggestion in the error if it is missing
    pub fn require(&self, id: &str) -> CoachResult<&VocabEntry> {
        self.entry(id).ok_or_else(|| match self.suggest(id) {
            Some(hint) => CoachError::UnknownEntry(format!(
                "'{}' (did you mean {} \"{}\"?)",
                id, hint.id, hint.word
            )),
            None => CoachError::UnknownEntry(format!("'{}'", id)),
        })
    }

    /// Pronunciation target for an entry's word or example sentence
    pub fn target(&self, id: &str, kind: TargetKind) -> CoachResult<Target> {
        let entry = self.require(id)?;
        let text = match kind {
            TargetKind::Word => entry.word.clone(),
            TargetKind::Sentence => entry.sentence.clone().ok_or_else(|| {
                CoachError::Lesson(format!("'{}' has no example sentence", entry.word))
            })?,
        };
        Ok(Target::new(&entry.id, kind, text))
    }

    /// Closest entry by word for a free-text query
    pub fn suggest(&self, query: &str) -> Option<&VocabEntry> {
        let query = query.to_lowercase();
        self.vocabulary
            .iter()
            .map(|v| (v, normalized_levenshtein(&query, &v.word.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_CUTOFF)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(v, _)| v)
    }

    /// Words highlighted in the passage
    pub fn highlights(&self) -> Vec<&str> {
        self.vocabulary.iter().map(|v| v.word.as_str()).collect()
    }

    /// All ids in list order
    pub fn ids(&self) -> Vec<String> {
        self.vocabulary.iter().map(|v| v.id.clone()).collect()
    }
}
