//! Text normalization and line segmentation
//!
//! Every later stage works on the output of `normalize_text()` split into
//! `LineToken`s, so currency spellings and whitespace quirks of the PDF text
//! layer are handled once here:
//! - `₹ 1,000`, `Rs. 1,000`, `Rs 1,000`, `RS.1,000` → `INR 1,000`
//! - CRLF / CR line endings → LF
//! - Non-breaking and other Unicode spaces → ASCII space
//! - Runs of spaces and tabs → single space

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical currency symbol all spellings are rewritten to
pub const CANONICAL_CURRENCY: &str = "INR";

static RE_RUPEE_GLYPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"₹\s*").unwrap());
static RE_RS_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brs\b\.?\s*").unwrap());
static RE_HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// One non-empty line of the statement text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineToken {
    /// Zero-based line number in the normalized text (empty lines included)
    pub index: usize,
    pub text: String,
}

/// Canonicalize currency symbols and whitespace.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = normalize_unicode_whitespace(&text);
    let text = normalize_currency_symbols(&text);
    RE_HORIZONTAL_SPACE.replace_all(&text, " ").into_owned()
}

/// Split normalized text into trimmed, non-empty lines.
pub fn segment_lines(text: &str) -> Vec<LineToken> {
    text.split('\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(LineToken {
                    index,
                    text: trimmed.to_string(),
                })
            }
        })
        .collect()
}

fn normalize_unicode_whitespace(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_whitespace() && c != '\n' && c != ' ' && c != '\t' {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn normalize_currency_symbols(s: &str) -> String {
    let replacement = format!("{} ", CANONICAL_CURRENCY);
    let result = RE_RUPEE_GLYPH.replace_all(s, replacement.as_str());
    RE_RS_ABBREVIATION
        .replace_all(&result, replacement.as_str())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_glyph() {
        assert_eq!(normalize_text("Market Value: ₹1,234.50"), "Market Value: INR 1,234.50");
        assert_eq!(normalize_text("₹ 10"), "INR 10");
    }

    #[test]
    fn test_rs_variants() {
        assert_eq!(normalize_text("Cost Rs. 500"), "Cost INR 500");
        assert_eq!(normalize_text("Cost Rs 500"), "Cost INR 500");
        assert_eq!(normalize_text("Cost RS.500"), "Cost INR 500");
    }

    #[test]
    fn test_rs_inside_words_untouched() {
        assert_eq!(normalize_text("Investors Services"), "Investors Services");
        assert_eq!(normalize_text("Hrs 10"), "Hrs 10");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            normalize_text("Axis\u{00A0}Bluechip\t\tFund   Direct"),
            "Axis Bluechip Fund Direct"
        );
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_segment_drops_empty_and_keeps_index() {
        let lines = segment_lines("first\n\n   \n  second  \nthird");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LineToken { index: 0, text: "first".to_string() });
        assert_eq!(lines[1], LineToken { index: 3, text: "second".to_string() });
        assert_eq!(lines[2].index, 4);
    }

    #[test]
    fn test_segment_empty_text() {
        assert!(segment_lines("").is_empty());
        assert!(segment_lines("\n \n").is_empty());
    }
}
