//! Property-based tests for the fql lexer
//!
//! The round-trip and mode-continuity properties must hold for arbitrary
//! input, not just the documents the unit tests pick by hand.

use proptest::prelude::*;

use fql_lexer::fql::lexer::{equal_states, state_from, update_line, LineTerminator, State};

/// Reconstruct the document text the way the snapshot boundary would.
fn flatten(state: &State) -> String {
    state
        .lines
        .iter()
        .map(|line| {
            format!(
                "{}{}",
                line.fields().text,
                line.fields().line_terminator.as_str()
            )
        })
        .collect()
}

/// One line's worth of content: no terminator characters.
fn line_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \t\"#/*.=+,;<>_-]{0,12}"
}

fn terminator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("\n"),
        Just("\r\n"),
        Just("\u{2028}"),
        Just("\u{2029}"),
    ]
}

/// A document assembled from content fragments and explicit terminators.
fn document_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((line_strategy(), terminator_strategy()), 0..8),
        line_strategy(),
    )
        .prop_map(|(pairs, last)| {
            let mut text = String::new();
            for (line, terminator) in pairs {
                text.push_str(&line);
                text.push_str(terminator);
            }
            text.push_str(&last);
            text
        })
}

fn lines_and_index() -> impl Strategy<Value = (Vec<String>, usize)> {
    prop::collection::vec(line_strategy(), 1..6).prop_flat_map(|lines| {
        let num_lines = lines.len();
        (Just(lines), 0..num_lines)
    })
}

proptest! {
    #[test]
    fn test_round_trip_arbitrary_text(
        characters in prop::collection::vec(any::<char>(), 0..64)
    ) {
        // state_from must neither panic nor lose a byte, whatever the input
        let text: String = characters.into_iter().collect();
        let state = state_from(&text);
        prop_assert_eq!(flatten(&state), text);
    }

    #[test]
    fn test_round_trip_structured_documents(text in document_strategy()) {
        let state = state_from(&text);
        prop_assert_eq!(flatten(&state), text);
    }

    #[test]
    fn test_last_line_has_no_terminator(text in document_strategy()) {
        let state = state_from(&text);
        let last = state.lines.last().expect("a state always has a line");
        prop_assert_eq!(last.fields().line_terminator, LineTerminator::None);
    }

    #[test]
    fn test_mode_continuity_across_adjacent_lines(text in document_strategy()) {
        let state = state_from(&text);
        for pair in state.lines.windows(2) {
            prop_assert_eq!(
                pair[0].fields().line_mode_end,
                pair[1].fields().line_mode_start
            );
        }
    }

    #[test]
    fn test_tokenization_is_deterministic(text in document_strategy()) {
        prop_assert!(equal_states(&state_from(&text), &state_from(&text)));
    }

    #[test]
    fn test_update_line_splices_text_exactly(
        (lines, line_number) in lines_and_index(),
        new_text in line_strategy()
    ) {
        let original = lines.join("\n");
        let state = state_from(&original);

        let updated = update_line(&state, line_number, &new_text)
            .expect("line_number is always in bounds");

        let mut expected_lines = lines;
        expected_lines[line_number] = new_text;
        prop_assert_eq!(flatten(&updated), expected_lines.join("\n"));
    }

    #[test]
    fn test_update_line_with_multiline_replacement(
        (lines, line_number) in lines_and_index(),
        first in line_strategy(),
        second in line_strategy()
    ) {
        let original = lines.join("\n");
        let state = state_from(&original);
        let new_text = format!("{}\n{}", first, second);

        let updated = update_line(&state, line_number, &new_text)
            .expect("line_number is always in bounds");

        let mut expected_lines = lines;
        expected_lines[line_number] = new_text;
        prop_assert_eq!(flatten(&updated), expected_lines.join("\n"));
        prop_assert_eq!(updated.lines.len(), expected_lines.len() + 1);
    }

    #[test]
    fn test_token_data_matches_line_text(text in document_strategy()) {
        let state = state_from(&text);
        for line in &state.lines {
            let fields = line.fields();
            for token in &fields.tokens {
                prop_assert_eq!(
                    &fields.text[token.position_start..token.position_end],
                    token.data.as_str()
                );
            }
        }
    }
}
