//! Cell draft grammar.
//!
//! Cells hold whatever the user is typing, so the check runs on every
//! keystroke against a partial string, not a finished number. Every prefix
//! of a well-formed decimal or fraction must pass: typing "-3.5" one
//! character at a time goes through "-", "-3", "-3." and "-3.5".
//!
//! Accepted shapes:
//! - blank (empty or whitespace only)
//! - a lone intermediate token: `-`, `.`, `-.`, `/`, `-/`
//! - signed decimal: `-?([0-9]+\.?[0-9]*|\.[0-9]*)`
//! - signed fraction: `-?([0-9]+)?\s*/\s*([0-9]+)?`
//!
//! Digits are ASCII only. Nothing here parses a number.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tokens a user passes through on the way to a number.
const INTERMEDIATE_TOKENS: [&str; 5] = ["-", ".", "-.", "/", "-/"];

static DECIMAL_DRAFT: OnceLock<Regex> = OnceLock::new();
static FRACTION_DRAFT: OnceLock<Regex> = OnceLock::new();

fn decimal_draft() -> &'static Regex {
    DECIMAL_DRAFT.get_or_init(|| {
        Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]*)$").expect("decimal draft pattern")
    })
}

fn fraction_draft() -> &'static Regex {
    FRACTION_DRAFT.get_or_init(|| {
        Regex::new(r"^-?([0-9]+)?\s*/\s*([0-9]+)?$").expect("fraction draft pattern")
    })
}

/// What kind of draft a cell string is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    /// Empty or whitespace only.
    Empty,
    /// A lone sign, point or slash.
    Partial,
    /// Decimal, possibly unfinished ("3.").
    Decimal,
    /// Fraction, possibly missing either side ("-3/").
    Fraction,
}

/// Classify a draft, or `None` if the text can never become a number.
pub fn classify_draft(text: &str) -> Option<DraftKind> {
    if text.trim().is_empty() {
        return Some(DraftKind::Empty);
    }
    if INTERMEDIATE_TOKENS.contains(&text) {
        return Some(DraftKind::Partial);
    }
    if decimal_draft().is_match(text) {
        return Some(DraftKind::Decimal);
    }
    if fraction_draft().is_match(text) {
        return Some(DraftKind::Fraction);
    }
    None
}

/// True if `text` is acceptable as an in-progress cell entry.
pub fn is_valid_draft(text: &str) -> bool {
    classify_draft(text).is_some()
}
