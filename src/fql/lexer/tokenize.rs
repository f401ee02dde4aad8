//! Per-line tokenizer for fql
//!
//! `tokenize` consumes an untouched line and classifies the outcome:
//! - Ok: the cursor reached end of line, the line becomes `Touched`
//! - Partial: an error interrupted the scan after at least one token, the
//!   line becomes `TouchedWithError` and keeps the tokens read so far
//! - Err: the error hit before any token was produced, the line becomes
//!   `Error` with no tokens
//!
//! The scan is a result-returning loop; errors never unwind across a line
//! boundary, and a failure on one line has no effect on how any other line
//! tokenizes. Only `Untouched` lines may be tokenized: a `Touched` line has
//! nothing left to read (end of stream), and a line that previously ended in
//! an error must have its text replaced before it can be lexed again.

use crate::fql::grammar::{self, Pattern};
use crate::fql::lexer::error::{grapheme_position_from, LexError};
use crate::fql::lexer::line::{Line, LineFields, LineMode, Token, TokenKind};

/// A single token read plus the mode the line is in after reading it.
struct LineModeAlteringRead {
    token: Token,
    line_mode: LineMode,
}

enum TokenizeOutcome {
    Ok {
        tokens: Vec<Token>,
        line_mode_end: LineMode,
    },
    Partial {
        tokens: Vec<Token>,
        line_mode_end: LineMode,
        error: LexError,
    },
    Err(LexError),
}

/// The main entry of the tokenizer. `line_number` is carried for error
/// positions only.
pub(crate) fn tokenize(line: Line, line_number: usize) -> Line {
    let fields = match line {
        // Nothing has changed since the tokenize that failed; the text must
        // be replaced before trying again.
        Line::Error(..) => return line,
        // The line was already fully lexed once. Without a text change it
        // surfaces end-of-stream to diagnose the caller instead of silently
        // re-lexing.
        Line::Touched(fields) => return Line::Error(fields, LexError::EndOfStream),
        Line::TouchedWithError(fields, error) => {
            return Line::Error(fields, LexError::BadState(Box::new(error)))
        }
        Line::Untouched(fields) => fields,
    };

    let outcome = scan_line(&fields.text, fields.line_mode_start, line_number);

    match outcome {
        TokenizeOutcome::Ok {
            tokens,
            line_mode_end,
        } => Line::Touched(LineFields {
            line_mode_end,
            tokens,
            ..fields
        }),
        TokenizeOutcome::Partial {
            tokens,
            line_mode_end,
            error,
        } => Line::TouchedWithError(
            LineFields {
                line_mode_end,
                tokens,
                ..fields
            },
            error,
        ),
        TokenizeOutcome::Err(error) => Line::Error(fields, error),
    }
}

// While neither end of line nor an error:
//  * read one token according to the current mode
//  * advance the cursor to the token's end
//  * drain whitespace whenever the mode is back to Default
fn scan_line(text: &str, line_mode_start: LineMode, line_number: usize) -> TokenizeOutcome {
    let text_length = text.len();
    let mut line_mode = line_mode_start;
    let mut current_position = 0;

    if line_mode == LineMode::Default {
        current_position = drain_whitespace(text, current_position);
    }

    let mut new_tokens: Vec<Token> = Vec::new();

    while current_position < text_length {
        let read_result = match line_mode {
            LineMode::Comment => Ok(read_multiline_comment_content_or_end(text, current_position)),
            LineMode::Default => read_default(text, line_number, current_position),
            LineMode::QuotedIdentifier => {
                Ok(read_quoted_identifier_content_or_end(text, current_position))
            }
            LineMode::String => Ok(read_string_literal_content_or_end(text, current_position)),
        };

        match read_result {
            Ok(read) => {
                line_mode = read.line_mode;
                let position_end = read.token.position_end;
                new_tokens.push(read.token);

                current_position = if line_mode == LineMode::Default {
                    drain_whitespace(text, position_end)
                } else {
                    position_end
                };
            }
            Err(error) => {
                return if new_tokens.is_empty() {
                    TokenizeOutcome::Err(error)
                } else {
                    TokenizeOutcome::Partial {
                        tokens: new_tokens,
                        line_mode_end: line_mode,
                        error,
                    }
                };
            }
        }
    }

    TokenizeOutcome::Ok {
        tokens: new_tokens,
        line_mode_end: line_mode,
    }
}

/// Read one token in Default mode, dispatching on up to three bytes of
/// lookahead. Multi-byte characters fall through to the identifier read,
/// which is Unicode-aware.
fn read_default(
    text: &str,
    line_number: usize,
    position_start: usize,
) -> Result<LineModeAlteringRead, LexError> {
    let chr1 = text.as_bytes()[position_start];

    let read = match chr1 {
        b'!' => read_constant(TokenKind::Bang, text, position_start, 1),
        b'&' => read_constant(TokenKind::Ampersand, text, position_start, 1),
        b'(' => read_constant(TokenKind::LeftParenthesis, text, position_start, 1),
        b')' => read_constant(TokenKind::RightParenthesis, text, position_start, 1),
        b'*' => read_constant(TokenKind::Asterisk, text, position_start, 1),
        b'+' => read_constant(TokenKind::Plus, text, position_start, 1),
        b',' => read_constant(TokenKind::Comma, text, position_start, 1),
        b'-' => read_constant(TokenKind::Minus, text, position_start, 1),
        b';' => read_constant(TokenKind::Semicolon, text, position_start, 1),
        b'?' => read_constant(TokenKind::QuestionMark, text, position_start, 1),
        b'@' => read_constant(TokenKind::AtSign, text, position_start, 1),
        b'[' => read_constant(TokenKind::LeftBracket, text, position_start, 1),
        b']' => read_constant(TokenKind::RightBracket, text, position_start, 1),
        b'{' => read_constant(TokenKind::LeftBrace, text, position_start, 1),
        b'}' => read_constant(TokenKind::RightBrace, text, position_start, 1),

        b'"' => read_string_literal_or_start(text, position_start),

        b'0' => match byte_at(text, position_start + 1) {
            Some(b'x') | Some(b'X') => read_hex_literal(text, line_number, position_start)?,
            _ => read_numeric_literal(text, line_number, position_start)?,
        },
        b'1'..=b'9' => read_numeric_literal(text, line_number, position_start)?,

        b'.' => match byte_at(text, position_start + 1) {
            None => {
                return Err(LexError::UnexpectedEndOfStream(grapheme_position_from(
                    text,
                    line_number,
                    position_start,
                )))
            }
            Some(b'1'..=b'9') => read_numeric_literal(text, line_number, position_start)?,
            Some(b'.') => match byte_at(text, position_start + 2) {
                Some(b'.') => read_constant(TokenKind::Ellipsis, text, position_start, 3),
                _ => return Err(unexpected_read_error(text, line_number, position_start)),
            },
            Some(_) => return Err(unexpected_read_error(text, line_number, position_start)),
        },

        b'>' => match byte_at(text, position_start + 1) {
            Some(b'=') => read_constant(TokenKind::GreaterThanEqualTo, text, position_start, 2),
            _ => read_constant(TokenKind::GreaterThan, text, position_start, 1),
        },
        b'<' => match byte_at(text, position_start + 1) {
            Some(b'=') => read_constant(TokenKind::LessThanEqualTo, text, position_start, 2),
            Some(b'>') => read_constant(TokenKind::NotEqual, text, position_start, 2),
            _ => read_constant(TokenKind::LessThan, text, position_start, 1),
        },
        b'=' => match byte_at(text, position_start + 1) {
            Some(b'>') => read_constant(TokenKind::FatArrow, text, position_start, 2),
            _ => read_constant(TokenKind::Equal, text, position_start, 1),
        },

        b'/' => match byte_at(text, position_start + 1) {
            Some(b'/') => LineModeAlteringRead {
                token: read_rest_of_line(TokenKind::LineComment, text, position_start),
                line_mode: LineMode::Default,
            },
            Some(b'*') => read_multiline_comment_or_start(text, position_start),
            _ => read_constant(TokenKind::Division, text, position_start, 1),
        },

        b'#' => match byte_at(text, position_start + 1) {
            Some(b'"') => read_quoted_identifier_or_start(text, position_start),
            _ => read_keyword(text, line_number, position_start)?,
        },

        _ => read_keyword_or_identifier(text, line_number, position_start)?,
    };

    Ok(read)
}

// Newlines never appear in a line's text, so whitespace here is horizontal
// whitespace only.
fn drain_whitespace(text: &str, position: usize) -> usize {
    match grammar::match_length(Pattern::Whitespace, text, position) {
        Some(length) => position + length,
        None => position,
    }
}

/// Read either a whole string literal, or its opening fragment when no
/// terminating quote exists on this line.
fn read_string_literal_or_start(text: &str, position_start: usize) -> LineModeAlteringRead {
    match index_of_string_end(text, position_start + 1) {
        Some(index) => LineModeAlteringRead {
            token: read_token_from(TokenKind::StringLiteral, text, position_start, index + 1),
            line_mode: LineMode::Default,
        },
        None => LineModeAlteringRead {
            token: read_rest_of_line(TokenKind::StringLiteralStart, text, position_start),
            line_mode: LineMode::String,
        },
    }
}

/// Continuation read in String mode: either the closing quote occurs on this
/// line, or the whole line is string content.
fn read_string_literal_content_or_end(text: &str, current_position: usize) -> LineModeAlteringRead {
    match index_of_string_end(text, current_position) {
        Some(index) => LineModeAlteringRead {
            token: read_token_from(TokenKind::StringLiteralEnd, text, current_position, index + 1),
            line_mode: LineMode::Default,
        },
        None => LineModeAlteringRead {
            token: read_rest_of_line(TokenKind::StringLiteralContent, text, current_position),
            line_mode: LineMode::String,
        },
    }
}

/// Continuation read in QuotedIdentifier mode. Quoted identifiers follow the
/// exact terminator and escaping rules of strings, with their own token
/// kinds and mode so hosts can tell the two apart.
fn read_quoted_identifier_content_or_end(
    text: &str,
    current_position: usize,
) -> LineModeAlteringRead {
    let read = read_string_literal_content_or_end(text, current_position);
    match read.token.kind {
        TokenKind::StringLiteralContent => LineModeAlteringRead {
            line_mode: LineMode::QuotedIdentifier,
            token: Token {
                kind: TokenKind::QuotedIdentifierContent,
                ..read.token
            },
        },
        TokenKind::StringLiteralEnd => LineModeAlteringRead {
            line_mode: LineMode::Default,
            token: Token {
                kind: TokenKind::QuotedIdentifierEnd,
                ..read.token
            },
        },
        _ => unreachable!("string continuation read produced a non-string token kind"),
    }
}

/// Read `#"..."`: a closed quoted identifier is an ordinary identifier
/// token; an unterminated one opens QuotedIdentifier mode.
fn read_quoted_identifier_or_start(text: &str, position_start: usize) -> LineModeAlteringRead {
    match index_of_string_end(text, position_start + 2) {
        Some(index) => LineModeAlteringRead {
            token: read_token_from(TokenKind::Identifier, text, position_start, index + 1),
            line_mode: LineMode::Default,
        },
        None => LineModeAlteringRead {
            token: read_rest_of_line(TokenKind::QuotedIdentifierStart, text, position_start),
            line_mode: LineMode::QuotedIdentifier,
        },
    }
}

/// Read `/* ... */`, or its opening fragment when the closing sequence is
/// not on this line.
fn read_multiline_comment_or_start(text: &str, position_start: usize) -> LineModeAlteringRead {
    match find_from(text, "*/", position_start) {
        Some(index) => LineModeAlteringRead {
            token: read_token_from(TokenKind::MultilineComment, text, position_start, index + 2),
            line_mode: LineMode::Default,
        },
        None => LineModeAlteringRead {
            token: read_rest_of_line(TokenKind::MultilineCommentStart, text, position_start),
            line_mode: LineMode::Comment,
        },
    }
}

/// Continuation read in Comment mode: either `*/` occurs on this line, or
/// the whole line is comment content.
fn read_multiline_comment_content_or_end(
    text: &str,
    position_start: usize,
) -> LineModeAlteringRead {
    match find_from(text, "*/", position_start) {
        Some(index) => LineModeAlteringRead {
            token: read_token_from(
                TokenKind::MultilineCommentEnd,
                text,
                position_start,
                index + 2,
            ),
            line_mode: LineMode::Default,
        },
        None => LineModeAlteringRead {
            token: read_rest_of_line(TokenKind::MultilineCommentContent, text, position_start),
            line_mode: LineMode::Comment,
        },
    }
}

fn read_hex_literal(
    text: &str,
    line_number: usize,
    position_start: usize,
) -> Result<LineModeAlteringRead, LexError> {
    match index_of_regex_end(Pattern::Hex, text, position_start) {
        Some(position_end) => Ok(LineModeAlteringRead {
            token: read_token_from(TokenKind::HexLiteral, text, position_start, position_end),
            line_mode: LineMode::Default,
        }),
        None => Err(LexError::ExpectedHexLiteral(grapheme_position_from(
            text,
            line_number,
            position_start,
        ))),
    }
}

fn read_numeric_literal(
    text: &str,
    line_number: usize,
    position_start: usize,
) -> Result<LineModeAlteringRead, LexError> {
    match index_of_regex_end(Pattern::Numeric, text, position_start) {
        Some(position_end) => Ok(LineModeAlteringRead {
            token: read_token_from(TokenKind::NumericLiteral, text, position_start, position_end),
            line_mode: LineMode::Default,
        }),
        None => Err(LexError::ExpectedNumericLiteral(grapheme_position_from(
            text,
            line_number,
            position_start,
        ))),
    }
}

/// Read a `#`-prefixed spelling, which must be an exact keyword.
fn read_keyword(
    text: &str,
    line_number: usize,
    position_start: usize,
) -> Result<LineModeAlteringRead, LexError> {
    match maybe_read_keyword(text, position_start) {
        Some(token) => Ok(LineModeAlteringRead {
            token,
            line_mode: LineMode::Default,
        }),
        None => Err(unexpected_read_error(text, line_number, position_start)),
    }
}

fn maybe_read_keyword(text: &str, current_position: usize) -> Option<Token> {
    let identifier_position_start = if text.as_bytes()[current_position] == b'#' {
        current_position + 1
    } else {
        current_position
    };

    let identifier_position_end =
        index_of_regex_end(Pattern::Identifier, text, identifier_position_start)?;
    let data = &text[current_position..identifier_position_end];
    let kind = grammar::keyword_token_kind(data)?;

    Some(read_token_from(
        kind,
        text,
        current_position,
        identifier_position_end,
    ))
}

/// Read an identifier-shaped run and resolve it against the keyword table.
/// The null-literal is also read here.
fn read_keyword_or_identifier(
    text: &str,
    line_number: usize,
    position_start: usize,
) -> Result<LineModeAlteringRead, LexError> {
    let position_end = match index_of_regex_end(Pattern::Identifier, text, position_start) {
        Some(position_end) => position_end,
        None => return Err(unexpected_read_error(text, line_number, position_start)),
    };

    let data = &text[position_start..position_end];
    let kind = match grammar::keyword_token_kind(data) {
        Some(kind) => kind,
        None if data == "null" => TokenKind::NullLiteral,
        None => TokenKind::Identifier,
    };

    Ok(LineModeAlteringRead {
        token: read_token_from(kind, text, position_start, position_end),
        line_mode: LineMode::Default,
    })
}

fn read_constant(
    kind: TokenKind,
    text: &str,
    position_start: usize,
    length: usize,
) -> LineModeAlteringRead {
    LineModeAlteringRead {
        token: read_token_from(kind, text, position_start, position_start + length),
        line_mode: LineMode::Default,
    }
}

fn read_token_from(
    kind: TokenKind,
    text: &str,
    position_start: usize,
    position_end: usize,
) -> Token {
    Token {
        kind,
        position_start,
        position_end,
        data: text[position_start..position_end].to_string(),
    }
}

fn read_rest_of_line(kind: TokenKind, text: &str, position_start: usize) -> Token {
    read_token_from(kind, text, position_start, text.len())
}

/// The byte offset of the next unescaped `"` at or after `position_start`.
/// `""` escapes a literal quote and does not terminate; the search skips
/// past each escaped pair and keeps going.
fn index_of_string_end(text: &str, position_start: usize) -> Option<usize> {
    let mut index_low = position_start;

    while let Some(found) = find_from(text, "\"", index_low) {
        if text[found + 1..].starts_with('"') {
            index_low = found + 2;
        } else {
            return Some(found);
        }
    }

    None
}

fn find_from(text: &str, needle: &str, position_start: usize) -> Option<usize> {
    text[position_start..]
        .find(needle)
        .map(|relative| position_start + relative)
}

fn index_of_regex_end(pattern: Pattern, text: &str, position_start: usize) -> Option<usize> {
    grammar::match_length(pattern, text, position_start).map(|length| position_start + length)
}

fn byte_at(text: &str, index: usize) -> Option<u8> {
    text.as_bytes().get(index).copied()
}

fn unexpected_read_error(text: &str, line_number: usize, position_start: usize) -> LexError {
    LexError::UnexpectedRead(grapheme_position_from(text, line_number, position_start))
}
