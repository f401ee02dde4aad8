//! Lexical grammar provider for fql
//!
//! The tokenizer never hardcodes character classes for the pattern-shaped
//! parts of the grammar. Instead it asks this module two questions:
//! - starting at a given offset, how far does a whitespace / hex / numeric /
//!   identifier run extend? ([pattern::match_length])
//! - is this spelling a reserved word, and if so which token kind is it?
//!   ([keyword::keyword_token_kind])
//!
//! Keeping the grammar behind this seam means the scanner in
//! `lexer::tokenize` only deals with dispatch and mode transitions, and the
//! character-class definitions stay in one reviewable place.

pub mod keyword;
pub mod pattern;

pub use keyword::{keyword_token_kind, KEYWORDS};
pub use pattern::{match_length, Pattern};
