//! Line and token data model for the fql lexer
//!
//! A [State] is the only externally visible document representation: an
//! ordered sequence of [Line] records behind `Arc` handles. Lines are never
//! mutated after construction; every edit builds replacement lines and
//! shares the untouched remainder by reference. Structural equality lives
//! here too, and deliberately ignores raw text: two states are equal when
//! they tokenize the same way, not when their bytes match.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fql::lexer::error::LexError;

/// The cross-line continuation state.
///
/// There are two categories of line tokenization contexts: tokenize the
/// entire line as usual (`Default`), or the line is a continuation of a
/// multi-line token, e.g. `"foo \n bar"`. Block comments, quoted
/// identifiers, and strings are the multi-line contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineMode {
    Comment,
    Default,
    QuotedIdentifier,
    String,
}

/// What `tokenize` has concluded about a line so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// An error occurred before any token was produced.
    Error,
    /// The entire line tokenized without issue.
    Touched,
    /// Some tokens were read, then an error interrupted the scan.
    TouchedWithError,
    /// Not yet tokenized.
    Untouched,
}

/// A line's exact original terminator. The final line of a document always
/// carries `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTerminator {
    CarriageReturnLineFeed,
    LineFeed,
    LineSeparator,
    ParagraphSeparator,
    None,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::CarriageReturnLineFeed => "\r\n",
            LineTerminator::LineFeed => "\n",
            LineTerminator::LineSeparator => "\u{2028}",
            LineTerminator::ParagraphSeparator => "\u{2029}",
            LineTerminator::None => "",
        }
    }
}

/// Every token kind the per-line tokenizer can produce.
///
/// The `*Start`/`*Content`/`*End` kinds are the multi-line fragments: a
/// string, quoted identifier, or block comment that fails to close on its
/// line emits a `*Start`, continuation lines emit `*Content`, and the line
/// holding the closing sequence emits `*End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Ampersand,
    Asterisk,
    AtSign,
    Bang,
    Comma,
    Division,
    Ellipsis,
    Equal,
    FatArrow,
    GreaterThan,
    GreaterThanEqualTo,
    HexLiteral,
    Identifier,
    KeywordAnd,
    KeywordAs,
    KeywordEach,
    KeywordElse,
    KeywordError,
    KeywordFalse,
    KeywordHashBinary,
    KeywordHashDate,
    KeywordHashDateTime,
    KeywordHashDateTimeZone,
    KeywordHashDuration,
    KeywordHashInfinity,
    KeywordHashNan,
    KeywordHashSections,
    KeywordHashShared,
    KeywordHashTable,
    KeywordHashTime,
    KeywordIf,
    KeywordIn,
    KeywordIs,
    KeywordLet,
    KeywordMeta,
    KeywordNot,
    KeywordOr,
    KeywordOtherwise,
    KeywordSection,
    KeywordShared,
    KeywordThen,
    KeywordTrue,
    KeywordTry,
    KeywordType,
    LeftBrace,
    LeftBracket,
    LeftParenthesis,
    LessThan,
    LessThanEqualTo,
    LineComment,
    Minus,
    MultilineComment,
    MultilineCommentContent,
    MultilineCommentEnd,
    MultilineCommentStart,
    NotEqual,
    NullLiteral,
    NumericLiteral,
    Plus,
    QuestionMark,
    QuotedIdentifierContent,
    QuotedIdentifierEnd,
    QuotedIdentifierStart,
    RightBrace,
    RightBracket,
    RightParenthesis,
    Semicolon,
    StringLiteral,
    StringLiteralContent,
    StringLiteralEnd,
    StringLiteralStart,
}

/// One token within a single line.
///
/// Positions are byte offsets into the line's text, half-open,
/// non-overlapping, and strictly increasing across the line. `data` is the
/// exact substring `text[position_start..position_end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub position_start: usize,
    pub position_end: usize,
    pub data: String,
}

/// The fields shared by every line variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFields {
    /// Raw line content, terminator excluded.
    pub text: String,
    pub line_terminator: LineTerminator,
    /// The previous line's `line_mode_end`, or `Default` for line zero.
    pub line_mode_start: LineMode,
    pub line_mode_end: LineMode,
    pub tokens: Vec<Token>,
}

/// A single line record, tagged by tokenization outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Line {
    Error(LineFields, LexError),
    Touched(LineFields),
    TouchedWithError(LineFields, LexError),
    Untouched(LineFields),
}

impl Line {
    pub fn kind(&self) -> LineKind {
        match self {
            Line::Error(..) => LineKind::Error,
            Line::Touched(..) => LineKind::Touched,
            Line::TouchedWithError(..) => LineKind::TouchedWithError,
            Line::Untouched(..) => LineKind::Untouched,
        }
    }

    pub fn fields(&self) -> &LineFields {
        match self {
            Line::Error(fields, _)
            | Line::Touched(fields)
            | Line::TouchedWithError(fields, _)
            | Line::Untouched(fields) => fields,
        }
    }

    /// The error attached to this line, when its kind carries one.
    pub fn error(&self) -> Option<&LexError> {
        match self {
            Line::Error(_, error) | Line::TouchedWithError(_, error) => Some(error),
            Line::Touched(..) | Line::Untouched(..) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Line::Error(..) | Line::TouchedWithError(..))
    }
}

/// The whole-document lexer state: an ordered sequence of line records.
///
/// States are values. Operations in [edit](crate::fql::lexer::edit) return
/// new states that share unaffected lines with the input by reference, so
/// holding several generations at once (undo history, diffing) is cheap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub lines: Vec<Arc<Line>>,
}

/// A position inside a state: a line number plus a byte offset into that
/// line's text (terminator excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePosition {
    pub line_number: usize,
    pub line_code_unit: usize,
}

/// An edit boundary pair. `start` and `end` are inclusive/exclusive in the
/// usual half-open sense: the text in `[start, end)` is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: RangePosition,
    pub end: RangePosition,
}

/// Deep state comparison. See [equal_lines] for what is compared.
pub fn equal_states(left: &State, right: &State) -> bool {
    equal_lines(&left.lines, &right.lines)
}

/// Deep line comparison.
///
/// Partial equality: a line's raw `text` is deliberately ignored. Two lines
/// can differ in whitespace outside any token and still tokenize
/// identically; equality here is about tokenization outcome, not source
/// bytes.
pub fn equal_lines(left: &[Arc<Line>], right: &[Arc<Line>]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter().zip(right.iter()).all(|(left, right)| {
        let left_fields = left.fields();
        let right_fields = right.fields();

        let equal_quick_check = left.kind() == right.kind()
            && left_fields.line_terminator == right_fields.line_terminator
            && left_fields.line_mode_start == right_fields.line_mode_start
            && left_fields.line_mode_end == right_fields.line_mode_end
            && left_fields.tokens.len() == right_fields.tokens.len();
        if !equal_quick_check {
            return false;
        }

        left_fields
            .tokens
            .iter()
            .zip(right_fields.tokens.iter())
            .all(|(left_token, right_token)| equal_tokens(left_token, right_token))
    })
}

/// Deep token comparison on kind, data, and both positions.
pub fn equal_tokens(left: &Token, right: &Token) -> bool {
    left.kind == right.kind
        && left.data == right.data
        && left.position_start == right.position_start
        && left.position_end == right.position_end
}

/// Whether any line of the state carries an error.
pub fn is_error_state(state: &State) -> bool {
    state.lines.iter().any(|line| line.is_error())
}

/// The error-carrying lines of a state, keyed by line index, or `None` when
/// the state is settled.
pub fn error_lines(state: &State) -> Option<BTreeMap<usize, Arc<Line>>> {
    let collected: BTreeMap<usize, Arc<Line>> = state
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_error())
        .map(|(index, line)| (index, Arc::clone(line)))
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}
