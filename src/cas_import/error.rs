//! Error types for statement parsing.

use thiserror::Error;

/// Result type for statement parsing.
pub type CasParseResult<T> = Result<T, CasParseError>;

/// Maximum number of input characters carried in a diagnostic excerpt
pub const EXCERPT_CHARS: usize = 1000;

/// Errors surfaced by the statement parser.
///
/// Per-holding problems (a rejected amount, a cross-matched value pair) never
/// show up here: those candidates are skipped and scanning continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CasParseError {
    /// The whole text was scanned and no holding survived.
    #[error("No holdings found in statement text")]
    NoHoldingsFound {
        /// Leading part of the input, for debugging layout problems.
        excerpt: String,
    },

    /// The input is not usable statement text at all.
    #[error("Malformed statement input: {reason}")]
    MalformedInput {
        /// Why the input was refused.
        reason: String,
    },
}

impl CasParseError {
    /// Build a `NoHoldingsFound` error carrying the start of `text`.
    pub fn no_holdings(text: &str) -> Self {
        Self::NoHoldingsFound {
            excerpt: text.chars().take(EXCERPT_CHARS).collect(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}
