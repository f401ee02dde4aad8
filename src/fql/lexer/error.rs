//! Error taxonomy and diagnostic positions for the fql lexer
//!
//! Two families of errors exist. Bounds errors reject an edit before any
//! mutation happens; the input state is untouched. Tokenization errors are
//! caught at the single-line boundary and become part of that line's record,
//! never escaping across lines. There is no fatal error: every error is a
//! value attached to a line or returned from an edit call.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::fql::lexer::line::Range;

/// Validation failures for a caller-supplied range.
///
/// Line numbers and offsets are unsigned, so the negative-index kinds a
/// signed host model would need cannot occur here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadRangeKind {
    SameLineStartAfterEnd,
    StartLineAfterEndLine,
    StartLineOutOfBounds,
    EndLineOutOfBounds,
    StartOffsetExceedsLineLength,
    EndOffsetExceedsLineLength,
    StartOffsetNotOnCharBoundary,
    EndOffsetNotOnCharBoundary,
}

impl fmt::Display for BadRangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            BadRangeKind::SameLineStartAfterEnd => "start offset is after end offset on the same line",
            BadRangeKind::StartLineAfterEndLine => "start line is after end line",
            BadRangeKind::StartLineOutOfBounds => "start line is out of bounds",
            BadRangeKind::EndLineOutOfBounds => "end line is out of bounds",
            BadRangeKind::StartOffsetExceedsLineLength => "start offset exceeds its line's length",
            BadRangeKind::EndOffsetExceedsLineLength => "end offset exceeds its line's length",
            BadRangeKind::StartOffsetNotOnCharBoundary => "start offset is not on a character boundary",
            BadRangeKind::EndOffsetNotOnCharBoundary => "end offset is not on a character boundary",
        };
        write!(f, "{}", description)
    }
}

/// A diagnostic position within one line.
///
/// `line_code_unit` is the stored byte offset; `column_number` is the
/// user-perceived column, counted in grapheme clusters. Columns are derived
/// on demand for diagnostics and never stored on tokens or lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphemePosition {
    pub line_number: usize,
    pub line_code_unit: usize,
    pub column_number: usize,
}

/// Every error the lexer can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LexError {
    /// A line that previously ended in an error was asked to tokenize again
    /// without a text change. Carries the prior error.
    BadState(Box<LexError>),
    /// The line number does not name a line of the state.
    BadLineNumber { line_number: usize, num_lines: usize },
    BadRange { kind: BadRangeKind, range: Range },
    /// A line that already tokenized cleanly was asked to tokenize again:
    /// there is nothing left to read. Replace the line's text instead.
    EndOfStream,
    /// `0x`/`0X` was read but no hex digits followed.
    ExpectedHexLiteral(GraphemePosition),
    /// A numeric lead-in was read but no numeric literal followed.
    ExpectedNumericLiteral(GraphemePosition),
    /// The line ended in the middle of a construct that still required a
    /// value, e.g. a lone `.` at end of line.
    UnexpectedEndOfStream(GraphemePosition),
    /// The character at the position starts no token of the grammar.
    UnexpectedRead(GraphemePosition),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::BadState(inner) => {
                write!(f, "line previously failed to tokenize: {}", inner)
            }
            LexError::BadLineNumber {
                line_number,
                num_lines,
            } => write!(
                f,
                "line number {} is out of bounds for a state of {} lines",
                line_number, num_lines
            ),
            LexError::BadRange { kind, range } => write!(
                f,
                "invalid range [{},{}]-[{},{}]: {}",
                range.start.line_number,
                range.start.line_code_unit,
                range.end.line_number,
                range.end.line_code_unit,
                kind
            ),
            LexError::EndOfStream => {
                write!(f, "nothing left to read on an already tokenized line")
            }
            LexError::ExpectedHexLiteral(position) => write!(
                f,
                "expected a hex literal at line {}, column {}",
                position.line_number, position.column_number
            ),
            LexError::ExpectedNumericLiteral(position) => write!(
                f,
                "expected a numeric literal at line {}, column {}",
                position.line_number, position.column_number
            ),
            LexError::UnexpectedEndOfStream(position) => write!(
                f,
                "unexpected end of stream at line {}, column {}",
                position.line_number, position.column_number
            ),
            LexError::UnexpectedRead(position) => write!(
                f,
                "unexpected read at line {}, column {}",
                position.line_number, position.column_number
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Resolve a byte offset into a user-perceived column.
///
/// Walks the line's grapheme clusters accumulating byte length until the
/// target offset is reached. Offsets produced by the tokenizer always fall
/// on cluster boundaries; a miss is an internal invariant violation, so this
/// panics rather than returning a user-facing error.
pub fn grapheme_position_from(
    text: &str,
    line_number: usize,
    line_code_unit: usize,
) -> GraphemePosition {
    let mut column_number = None;

    for (index, (grapheme_start, _)) in text.grapheme_indices(true).enumerate() {
        if grapheme_start == line_code_unit {
            column_number = Some(index);
            break;
        }
        if grapheme_start > line_code_unit {
            break;
        }
    }

    if column_number.is_none() && line_code_unit == text.len() {
        column_number = Some(text.graphemes(true).count());
    }

    let column_number = match column_number {
        Some(column_number) => column_number,
        None => panic!(
            "offset {} is not on a grapheme boundary of line {}",
            line_code_unit, line_number
        ),
    };

    GraphemePosition {
        line_number,
        line_code_unit,
        column_number,
    }
}
