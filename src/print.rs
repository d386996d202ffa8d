//! Print sheets
//!
//! Builds printable study sheets from the selected vocabulary entries.

use crate::lesson::{Lesson, VocabEntry};
use crate::passage::word_pattern;
use clap::ValueEnum;
use regex::NoExpand;
use std::fmt::Write;

/// Blank that replaces the vocabulary word in example tests
pub const BLANK: &str = "_______";

/// Study sheet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PrintFormat {
    /// Word and meaning list with a check column
    List,
    /// Word given, write the meaning
    TestMeaning,
    /// Meaning given, write the word
    TestSpelling,
    /// Example sentence with the word blanked out
    TestExample,
    /// Cut-out word cards
    Cards,
    /// Fold-in-half sheet: words left, meanings right
    Foldable,
}

impl PrintFormat {
    pub const ALL: [PrintFormat; 6] = [
        PrintFormat::List,
        PrintFormat::TestMeaning,
        PrintFormat::TestSpelling,
        PrintFormat::TestExample,
        PrintFormat::Cards,
        PrintFormat::Foldable,
    ];

    /// Identifier used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintFormat::List => "list",
            PrintFormat::TestMeaning => "test-meaning",
            PrintFormat::TestSpelling => "test-spelling",
            PrintFormat::TestExample => "test-example",
            PrintFormat::Cards => "cards",
            PrintFormat::Foldable => "foldable",
        }
    }

    /// Label in the print menu
    pub fn menu_label(&self) -> &'static str {
        match self {
            PrintFormat::List => "暗記リスト",
            PrintFormat::TestMeaning => "意味テスト",
            PrintFormat::TestSpelling => "スペルテスト",
            PrintFormat::TestExample => "例文テスト",
            PrintFormat::Cards => "単語カード",
            PrintFormat::Foldable => "折りたたみ",
        }
    }

    /// Heading printed on the sheet
    pub fn title(&self) -> &'static str {
        match self {
            PrintFormat::List => "単語リスト",
            PrintFormat::TestMeaning => "意味テスト",
            PrintFormat::TestSpelling => "スペルテスト",
            PrintFormat::TestExample => "例文テスト",
            PrintFormat::Cards => "単語カード",
            PrintFormat::Foldable => "折りたたみシート",
        }
    }
}

/// Today's date as printed in the sheet header
pub fn today() -> String {
    chrono::Local::now().format("%Y/%m/%d").to_string()
}

/// Blank out the vocabulary word in its example sentence
///
/// Whole-word, case-insensitive matches are all replaced. When there is no
/// whole-word match (e.g. an inflected form), the first literal occurrence
/// is replaced instead; otherwise the sentence is returned unchanged.
pub fn mask_word(sentence: &str, word: &str) -> String {
    if let Some(re) = word_pattern(word) {
        let masked = re.replace_all(sentence, NoExpand(BLANK));
        if masked.contains(BLANK) {
            return masked.into_owned();
        }
    }
    sentence.replacen(word, BLANK, 1)
}

/// Render a complete sheet for the given entries
pub fn render_sheet(
    lesson: &Lesson,
    format: PrintFormat,
    items: &[&VocabEntry],
    date: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", lesson.title);
    let _ = writeln!(out, "{} - {}", lesson.sub_title, format.title());
    let _ = writeln!(out, "Date: {}    Name: ________________", date);
    let _ = writeln!(out, "{}", "=".repeat(48));
    let _ = writeln!(out);

    let body = match format {
        PrintFormat::List => render_list(items),
        PrintFormat::TestMeaning => render_test_meaning(items),
        PrintFormat::TestSpelling => render_test_spelling(items),
        PrintFormat::TestExample => render_test_example(items),
        PrintFormat::Cards => render_cards(items),
        PrintFormat::Foldable => render_foldable(items),
    };
    out.push_str(&body);
    out
}

fn render_list(items: &[&VocabEntry]) -> String {
    let mut out = String::from("| No. | Word | Meaning | Chk |\n|----:|------|---------|-----|\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "| {} | {} | {} |  |", i + 1, item.word, item.meaning);
    }
    out
}

fn render_test_meaning(items: &[&VocabEntry]) -> String {
    let mut out = String::from(
        "| No. | Word | Meaning (日本語) | Score |\n|----:|------|------------------|-------|\n",
    );
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "| {} | {} |  |  |", i + 1, item.word);
    }
    out
}

fn render_test_spelling(items: &[&VocabEntry]) -> String {
    let mut out = String::from(
        "| No. | Meaning | Word (English) | Score |\n|----:|---------|----------------|-------|\n",
    );
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | ({} letters) |  |",
            i + 1,
            item.meaning,
            item.word.chars().count()
        );
    }
    out
}

fn render_test_example(items: &[&VocabEntry]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        // Numbering keeps the entry's place in the selection
        let Some(sentence) = &item.sentence else {
            continue;
        };
        let _ = writeln!(out, "{}. {}", i + 1, mask_word(sentence, &item.word));
        if let Some(translation) = &item.translation {
            let _ = writeln!(out, "   {}", translation);
        }
        let _ = writeln!(out, "   Hint: {}", item.meaning);
        let _ = writeln!(out);
    }
    out
}

fn render_cards(items: &[&VocabEntry]) -> String {
    let rule = format!("+{}+", "-".repeat(38));
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "| No. {}", item.id);
        let _ = writeln!(out, "|     {}", item.word);
        let _ = writeln!(out, "|     {}", "- ".repeat(12).trim_end());
        let _ = writeln!(out, "|     {}", item.meaning);
        let _ = writeln!(out, "{}", rule);
    }
    out
}

fn render_foldable(items: &[&VocabEntry]) -> String {
    let width = items
        .iter()
        .map(|item| item.word.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::from("--- Center Fold Line ---\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3} {:<width$} ┆ {}",
            i + 1,
            item.word,
            item.meaning,
            width = width
        );
    }
    out
}
