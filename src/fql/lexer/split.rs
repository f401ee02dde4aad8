//! Line splitter for the fql lexer
//!
//! Normalizes a text blob into ordered (text, terminator) fragments. The
//! split runs on `\r\n` first, then each fragment is rescanned for the
//! single-character terminators (`\n`, U+2028, U+2029) and expanded in place
//! until no fragment contains a terminator. Each fragment remembers the
//! terminator that followed it, and the final fragment's terminator is
//! forced to [LineTerminator::None] regardless of what preceded it.
//!
//! Concatenating `text + terminator` over all fragments reconstructs the
//! input exactly; that round-trip is the contract the snapshot boundary
//! depends on.

use crate::fql::lexer::line::LineTerminator;

/// A text fragment paired with the terminator that followed it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitLine {
    pub text: String,
    pub line_terminator: LineTerminator,
}

pub(crate) fn split_on_line_terminators(text: &str) -> Vec<SplitLine> {
    let mut lines: Vec<SplitLine> = text
        .split("\r\n")
        .map(|fragment| SplitLine {
            text: fragment.to_string(),
            line_terminator: LineTerminator::CarriageReturnLineFeed,
        })
        .collect();

    const SINGLE_CHAR_TERMINATORS: [(char, LineTerminator); 3] = [
        ('\n', LineTerminator::LineFeed),
        ('\u{2028}', LineTerminator::LineSeparator),
        ('\u{2029}', LineTerminator::ParagraphSeparator),
    ];

    let mut index = 0;
    while index < lines.len() {
        let mut index_was_expanded = false;

        for (terminator, terminator_kind) in SINGLE_CHAR_TERMINATORS {
            if !lines[index].text.contains(terminator) {
                continue;
            }
            index_was_expanded = true;

            let original = lines[index].clone();
            let mut expanded: Vec<SplitLine> = original
                .text
                .split(terminator)
                .map(|fragment| SplitLine {
                    text: fragment.to_string(),
                    line_terminator: terminator_kind,
                })
                .collect();
            // the fragment after the last terminator inherits whatever
            // followed the original fragment
            if let Some(last) = expanded.last_mut() {
                last.line_terminator = original.line_terminator;
            }
            lines.splice(index..=index, expanded);
        }

        if !index_was_expanded {
            index += 1;
        }
    }

    if let Some(last) = lines.last_mut() {
        last.line_terminator = LineTerminator::None;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(lines: &[SplitLine]) -> String {
        lines
            .iter()
            .map(|line| format!("{}{}", line.text, line.line_terminator.as_str()))
            .collect()
    }

    fn abridged(lines: &[SplitLine]) -> Vec<(&str, LineTerminator)> {
        lines
            .iter()
            .map(|line| (line.text.as_str(), line.line_terminator))
            .collect()
    }

    #[test]
    fn test_split_single_line() {
        let lines = split_on_line_terminators("foobar");
        assert_eq!(abridged(&lines), vec![("foobar", LineTerminator::None)]);
    }

    #[test]
    fn test_split_empty_text() {
        let lines = split_on_line_terminators("");
        assert_eq!(abridged(&lines), vec![("", LineTerminator::None)]);
    }

    #[test]
    fn test_split_line_feed() {
        let lines = split_on_line_terminators("alpha\nbravo");
        assert_eq!(
            abridged(&lines),
            vec![
                ("alpha", LineTerminator::LineFeed),
                ("bravo", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_split_carriage_return_line_feed() {
        let lines = split_on_line_terminators("alpha\r\nbravo");
        assert_eq!(
            abridged(&lines),
            vec![
                ("alpha", LineTerminator::CarriageReturnLineFeed),
                ("bravo", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_split_mixed_terminators() {
        let lines = split_on_line_terminators("a\r\nb\nc\u{2028}d\u{2029}e");
        assert_eq!(
            abridged(&lines),
            vec![
                ("a", LineTerminator::CarriageReturnLineFeed),
                ("b", LineTerminator::LineFeed),
                ("c", LineTerminator::LineSeparator),
                ("d", LineTerminator::ParagraphSeparator),
                ("e", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_split_trailing_terminator_yields_empty_final_line() {
        let lines = split_on_line_terminators("alpha\n");
        assert_eq!(
            abridged(&lines),
            vec![
                ("alpha", LineTerminator::LineFeed),
                ("", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_split_consecutive_terminators() {
        let lines = split_on_line_terminators("a\n\nb");
        assert_eq!(
            abridged(&lines),
            vec![
                ("a", LineTerminator::LineFeed),
                ("", LineTerminator::LineFeed),
                ("b", LineTerminator::None),
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        for text in [
            "",
            "foobar",
            "a\nb",
            "a\r\nb\nc",
            "a\u{2028}b\u{2029}c\r\nd\n",
            "\n\n\n",
            "\r\n\u{2028}\r\n",
        ] {
            let lines = split_on_line_terminators(text);
            assert_eq!(concat(&lines), text, "round trip failed for {:?}", text);
        }
    }
}
