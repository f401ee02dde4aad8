//! Incremental line-indexed lexer for fql
//!
//! The document representation is a [State]: an ordered sequence of
//! immutable [Line] records, each holding its raw text, its exact original
//! terminator, its tokens, and the lexical mode it started and ended in.
//! Modes are how a token begun on one line legally continues on the next:
//! an unterminated string, quoted identifier, or block comment sets the
//! line's ending mode, and the following line tokenizes starting in that
//! mode.
//!
//! Structure:
//! - `split` turns a text blob into (text, terminator) fragments
//! - `tokenize` lexes one line under a starting mode
//! - `edit` builds fresh states and applies incremental edits, cascading
//!   retokenization only while a line's mode actually changed
//! - `line` holds the data model and structural equality
//! - `error` holds the error taxonomy and the grapheme position resolver
//!
//! Every public operation returns a new state value; prior states stay
//! valid, which is what makes undo stacks and host-side diffing cheap.

pub mod edit;
pub mod error;
pub mod line;
pub mod split;
pub mod tokenize;

pub use edit::{append_line, delete_line, insert_at, state_from, update_line, update_range};
pub use error::{grapheme_position_from, BadRangeKind, GraphemePosition, LexError};
pub use line::{
    equal_lines, equal_states, equal_tokens, error_lines, is_error_state, Line, LineFields,
    LineKind, LineMode, LineTerminator, Range, RangePosition, State, Token, TokenKind,
};
