//! Match-length patterns for the fql lexical grammar
//!
//! Each pattern is anchored and answers one question: starting exactly at a
//! given byte offset, how many bytes does the shape cover? The definitions
//! follow the published lexical grammar of the formula language:
//!
//! - whitespace: horizontal tab, vertical tab, form feed, and any Unicode
//!   space separator. Newlines are line terminators, never whitespace.
//! - hex literals: `0x`/`0X` followed by one or more hex digits.
//! - numeric literals: digits with an optional fraction, or a leading
//!   fraction, either followed by an optional signed exponent.
//! - identifiers: an identifier-start character (letter or underscore)
//!   followed by identifier-part characters, with dot-separated segments
//!   permitted (`Table.RowCount` is a single identifier).

use once_cell::sync::Lazy;
use regex::Regex;

/// The pattern shapes the tokenizer delegates to the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Whitespace,
    Hex,
    Numeric,
    Identifier,
}

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\t\x0B\x0C\p{Zs}]+").expect("whitespace pattern must compile"));

static HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+").expect("hex pattern must compile"));

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?")
        .expect("numeric pattern must compile")
});

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[_\p{L}][_\p{L}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Cf}]*(\.[_\p{L}][_\p{L}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Cf}]*)*",
    )
    .expect("identifier pattern must compile")
});

/// Length in bytes of the pattern match starting exactly at `position`, or
/// `None` when the shape does not occur there.
///
/// `position` must lie on a character boundary of `text`; the tokenizer only
/// ever passes boundaries it produced itself.
pub fn match_length(pattern: Pattern, text: &str, position: usize) -> Option<usize> {
    let regex: &Regex = match pattern {
        Pattern::Whitespace => &WHITESPACE,
        Pattern::Hex => &HEX,
        Pattern::Numeric => &NUMERIC,
        Pattern::Identifier => &IDENTIFIER,
    };

    regex.find(&text[position..]).map(|found| found.end())
}
