//! Text Normalization
//!
//! Canonicalizes target phrases and spoken transcripts before comparison.

/// Whitespace as recognizers and browsers report it
///
/// Differs from [`char::is_whitespace`]: U+0085 (NEL) is not whitespace
/// here, U+FEFF (BOM) is.
pub fn is_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Normalize text for lexical comparison
///
/// Lowercases, drops every character that is not an ASCII letter, digit or
/// [`is_space`] whitespace, then trims. Internal whitespace is kept as-is.
///
/// Accented letters are removed rather than folded to their base letter,
/// so "café" becomes "caf".
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || is_space(c))
        .collect();

    cleaned.trim_matches(is_space).to_string()
}
