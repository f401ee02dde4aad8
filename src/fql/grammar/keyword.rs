//! Keyword table for fql
//!
//! Reserved spellings map one-to-one onto token kinds. The `#`-prefixed
//! spellings are the intrinsic constructors (`#table`, `#date`, ...); their
//! `#` is part of the reserved spelling itself. The spelling `null` is not a
//! keyword: it lexes as a dedicated null-literal kind instead.

use crate::fql::lexer::TokenKind;

/// Every reserved spelling, in table order.
pub const KEYWORDS: [&str; 31] = [
    "and",
    "as",
    "each",
    "else",
    "error",
    "false",
    "if",
    "in",
    "is",
    "let",
    "meta",
    "not",
    "or",
    "otherwise",
    "section",
    "shared",
    "then",
    "true",
    "try",
    "type",
    "#binary",
    "#date",
    "#datetime",
    "#datetimezone",
    "#duration",
    "#infinity",
    "#nan",
    "#sections",
    "#shared",
    "#table",
    "#time",
];

/// Map a reserved spelling to its token kind, or `None` for anything that is
/// not an exact keyword match.
pub fn keyword_token_kind(data: &str) -> Option<TokenKind> {
    match data {
        "and" => Some(TokenKind::KeywordAnd),
        "as" => Some(TokenKind::KeywordAs),
        "each" => Some(TokenKind::KeywordEach),
        "else" => Some(TokenKind::KeywordElse),
        "error" => Some(TokenKind::KeywordError),
        "false" => Some(TokenKind::KeywordFalse),
        "if" => Some(TokenKind::KeywordIf),
        "in" => Some(TokenKind::KeywordIn),
        "is" => Some(TokenKind::KeywordIs),
        "let" => Some(TokenKind::KeywordLet),
        "meta" => Some(TokenKind::KeywordMeta),
        "not" => Some(TokenKind::KeywordNot),
        "or" => Some(TokenKind::KeywordOr),
        "otherwise" => Some(TokenKind::KeywordOtherwise),
        "section" => Some(TokenKind::KeywordSection),
        "shared" => Some(TokenKind::KeywordShared),
        "then" => Some(TokenKind::KeywordThen),
        "true" => Some(TokenKind::KeywordTrue),
        "try" => Some(TokenKind::KeywordTry),
        "type" => Some(TokenKind::KeywordType),
        "#binary" => Some(TokenKind::KeywordHashBinary),
        "#date" => Some(TokenKind::KeywordHashDate),
        "#datetime" => Some(TokenKind::KeywordHashDateTime),
        "#datetimezone" => Some(TokenKind::KeywordHashDateTimeZone),
        "#duration" => Some(TokenKind::KeywordHashDuration),
        "#infinity" => Some(TokenKind::KeywordHashInfinity),
        "#nan" => Some(TokenKind::KeywordHashNan),
        "#sections" => Some(TokenKind::KeywordHashSections),
        "#shared" => Some(TokenKind::KeywordHashShared),
        "#table" => Some(TokenKind::KeywordHashTable),
        "#time" => Some(TokenKind::KeywordHashTime),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_has_a_token_kind() {
        for keyword in KEYWORDS {
            assert!(
                keyword_token_kind(keyword).is_some(),
                "keyword {keyword} is missing from the token kind table"
            );
        }
    }

    #[test]
    fn test_null_is_not_a_keyword() {
        assert_eq!(keyword_token_kind("null"), None);
    }

    #[test]
    fn test_near_misses_are_not_keywords() {
        assert_eq!(keyword_token_kind("And"), None);
        assert_eq!(keyword_token_kind("lets"), None);
        assert_eq!(keyword_token_kind("#tables"), None);
        assert_eq!(keyword_token_kind("table"), None);
        assert_eq!(keyword_token_kind(""), None);
    }

    #[test]
    fn test_hash_spelling_is_exact() {
        assert_eq!(keyword_token_kind("#shared"), Some(TokenKind::KeywordHashShared));
        assert_eq!(keyword_token_kind("shared"), Some(TokenKind::KeywordShared));
    }
}
