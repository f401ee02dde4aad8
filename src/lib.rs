//! # fql-lexer
//!
//! The lexical front end for the fql formula language.
//!
//! Source text is split into line records and tokenized line by line, with a
//! small lexical-mode state machine carrying multi-line tokens (strings,
//! quoted identifiers, block comments) across line boundaries. Edits produce
//! brand-new states that share every unaffected line with their predecessor,
//! so retokenization cost is bounded by the lines an edit actually reaches.
//!
//! Entry points live in [lexer](fql::lexer): `state_from` lexes a whole
//! document, and `update_range`/`update_line`/`insert_at`/`append_line`/
//! `delete_line` apply incremental edits.

pub mod fql;
