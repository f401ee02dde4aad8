//! Edit engine for the fql lexer
//!
//! Every operation is a pure function from an input state plus edit
//! parameters to a new state or a typed error. Bounds validation runs
//! completely before any splice: on error the input state is untouched and
//! no replacement line has been built. Within `update_range`
//! retokenization proceeds strictly top-to-bottom from the first affected
//! line, and the cascade below the edit stops as soon as a line's newly
//! computed ending mode matches its original ending mode — every line after
//! that point is shared with the input state by reference.

use std::sync::Arc;

use crate::fql::lexer::error::{BadRangeKind, LexError};
use crate::fql::lexer::line::{
    Line, LineFields, LineMode, LineTerminator, Range, RangePosition, State,
};
use crate::fql::lexer::split::{split_on_line_terminators, SplitLine};
use crate::fql::lexer::tokenize::tokenize;

/// Lex a whole document into a fresh state.
pub fn state_from(text: &str) -> State {
    let split_lines = split_on_line_terminators(text);

    State {
        lines: tokenized_lines_from(split_lines, LineMode::Default),
    }
}

/// Tokenize one more line onto the end of the state. The new line starts in
/// the prior last line's ending mode, or `Default` for an empty state.
pub fn append_line(state: &State, text: &str, line_terminator: LineTerminator) -> State {
    let line_mode_start = state
        .lines
        .last()
        .map_or(LineMode::Default, |line| line.fields().line_mode_end);

    let untokenized = line_from(text.to_string(), line_terminator, line_mode_start);
    let tokenized = tokenize(untokenized, state.lines.len());

    let mut lines = state.lines.clone();
    lines.push(Arc::new(tokenized));
    State { lines }
}

/// Replace the full text of one line. Equivalent to `update_range` over the
/// line's whole extent, cascade included.
pub fn update_line(state: &State, line_number: usize, text: &str) -> Result<State, LexError> {
    check_line_number(state, line_number)?;

    let line = &state.lines[line_number];
    let range = full_line_range(line, line_number);
    update_range(state, &range, text)
}

/// Insert text at a position: `update_range` with a zero-width range.
pub fn insert_at(state: &State, position: &RangePosition, text: &str) -> Result<State, LexError> {
    update_range(
        state,
        &Range {
            start: *position,
            end: *position,
        },
        text,
    )
}

/// Replace the text covered by `range` with `text`, retokenizing the
/// replacement lines and cascading below them only as far as lexical modes
/// actually changed.
pub fn update_range(state: &State, range: &Range, text: &str) -> Result<State, LexError> {
    check_range(state, range)?;

    let mut split_lines = split_on_line_terminators(text);

    // keep the untouched start-of-line text ahead of the range
    let range_start = range.start;
    let line_start = state.lines[range_start.line_number].fields();
    let text_prefix = &line_start.text[..range_start.line_code_unit];
    if let Some(first) = split_lines.first_mut() {
        first.text.insert_str(0, text_prefix);
    }

    // keep the untouched end-of-line text behind the range, and with it the
    // end line's terminator, so the document still reconstructs exactly
    let range_end = range.end;
    let line_end = state.lines[range_end.line_number].fields();
    let text_suffix = &line_end.text[range_end.line_code_unit..];
    if let Some(last) = split_lines.last_mut() {
        last.text.push_str(text_suffix);
        last.line_terminator = line_end.line_terminator;
    }

    let previous_line_mode_end = if range_start.line_number == 0 {
        LineMode::Default
    } else {
        state.lines[range_start.line_number - 1].fields().line_mode_end
    };
    let new_lines = tokenized_lines_from(split_lines, previous_line_mode_end);
    let last_line_mode_end = new_lines
        .last()
        .map_or(previous_line_mode_end, |line| line.fields().line_mode_end);

    let retokenized_suffix =
        retokenize_lines(&state.lines, range_end.line_number + 1, last_line_mode_end);

    let mut lines =
        Vec::with_capacity(range_start.line_number + new_lines.len() + retokenized_suffix.len());
    lines.extend_from_slice(&state.lines[..range_start.line_number]);
    lines.extend(new_lines);
    lines.extend(retokenized_suffix);

    Ok(State { lines })
}

/// Remove a line outright. No cascade runs: a caller deleting a line that
/// opened a multi-line token owns the follow-up range edit if consistency
/// must be restored.
pub fn delete_line(state: &State, line_number: usize) -> Result<State, LexError> {
    check_line_number(state, line_number)?;

    let mut lines = state.lines.clone();
    lines.remove(line_number);
    Ok(State { lines })
}

fn line_from(text: String, line_terminator: LineTerminator, line_mode_start: LineMode) -> Line {
    Line::Untouched(LineFields {
        text,
        line_terminator,
        line_mode_start,
        line_mode_end: LineMode::Default,
        tokens: Vec::new(),
    })
}

fn full_line_range(line: &Line, line_number: usize) -> Range {
    Range {
        start: RangePosition {
            line_number,
            line_code_unit: 0,
        },
        end: RangePosition {
            line_number,
            line_code_unit: line.fields().text.len(),
        },
    }
}

/// Tokenize split fragments in order, threading each line's ending mode into
/// the next line's starting mode.
fn tokenized_lines_from(
    split_lines: Vec<SplitLine>,
    mut previous_line_mode_end: LineMode,
) -> Vec<Arc<Line>> {
    let mut tokenized_lines = Vec::with_capacity(split_lines.len());

    for (line_number, split_line) in split_lines.into_iter().enumerate() {
        let untokenized = line_from(
            split_line.text,
            split_line.line_terminator,
            previous_line_mode_end,
        );
        let tokenized = tokenize(untokenized, line_number);
        previous_line_mode_end = tokenized.fields().line_mode_end;
        tokenized_lines.push(Arc::new(tokenized));
    }

    tokenized_lines
}

// If an earlier line changed its ending mode, e.g. inserting a `"` that
// starts a string literal, the lines below must be retokenized one by one.
// The walk stops at the first line whose recorded starting mode already
// matches the incoming mode; from there on the tail is reused by reference.
fn retokenize_lines(
    lines: &[Arc<Line>],
    line_number: usize,
    mut previous_line_mode_end: LineMode,
) -> Vec<Arc<Line>> {
    let mut retokenized_lines: Vec<Arc<Line>> = Vec::new();
    let mut index = line_number;

    while let Some(current) = lines.get(index) {
        if previous_line_mode_end == current.fields().line_mode_start {
            retokenized_lines.extend_from_slice(&lines[index..]);
            return retokenized_lines;
        }

        let fields = current.fields();
        let untokenized = line_from(
            fields.text.clone(),
            fields.line_terminator,
            previous_line_mode_end,
        );
        let retokenized = tokenize(untokenized, index);
        previous_line_mode_end = retokenized.fields().line_mode_end;
        retokenized_lines.push(Arc::new(retokenized));
        index += 1;
    }

    retokenized_lines
}

fn check_line_number(state: &State, line_number: usize) -> Result<(), LexError> {
    let num_lines = state.lines.len();

    if line_number >= num_lines {
        Err(LexError::BadLineNumber {
            line_number,
            num_lines,
        })
    } else {
        Ok(())
    }
}

/// Validator for `Range`. Runs in two passes: line numbers first, then the
/// offsets against the endpoint lines those numbers name.
fn check_range(state: &State, range: &Range) -> Result<(), LexError> {
    let start = range.start;
    let end = range.end;
    let num_lines = state.lines.len();

    let kind = if start.line_number == end.line_number && start.line_code_unit > end.line_code_unit
    {
        Some(BadRangeKind::SameLineStartAfterEnd)
    } else if start.line_number > end.line_number {
        Some(BadRangeKind::StartLineAfterEndLine)
    } else if start.line_number >= num_lines {
        Some(BadRangeKind::StartLineOutOfBounds)
    } else if end.line_number >= num_lines {
        Some(BadRangeKind::EndLineOutOfBounds)
    } else {
        None
    };
    if let Some(kind) = kind {
        return Err(LexError::BadRange {
            kind,
            range: *range,
        });
    }

    let line_start_text = &state.lines[start.line_number].fields().text;
    let line_end_text = &state.lines[end.line_number].fields().text;

    let kind = if start.line_code_unit > line_start_text.len() {
        Some(BadRangeKind::StartOffsetExceedsLineLength)
    } else if end.line_code_unit > line_end_text.len() {
        Some(BadRangeKind::EndOffsetExceedsLineLength)
    } else if !line_start_text.is_char_boundary(start.line_code_unit) {
        Some(BadRangeKind::StartOffsetNotOnCharBoundary)
    } else if !line_end_text.is_char_boundary(end.line_code_unit) {
        Some(BadRangeKind::EndOffsetNotOnCharBoundary)
    } else {
        None
    };
    if let Some(kind) = kind {
        return Err(LexError::BadRange {
            kind,
            range: *range,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fql::lexer::line::LineKind;

    fn texts(state: &State) -> Vec<&str> {
        state
            .lines
            .iter()
            .map(|line| line.fields().text.as_str())
            .collect()
    }

    #[test]
    fn test_state_from_empty_text() {
        let state = state_from("");
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.lines[0].kind(), LineKind::Touched);
        assert!(state.lines[0].fields().tokens.is_empty());
    }

    #[test]
    fn test_state_from_threads_modes() {
        let state = state_from("\"open\nstill\nclosed\" 1");
        assert_eq!(state.lines.len(), 3);
        assert_eq!(state.lines[0].fields().line_mode_end, LineMode::String);
        assert_eq!(state.lines[1].fields().line_mode_start, LineMode::String);
        assert_eq!(state.lines[1].fields().line_mode_end, LineMode::String);
        assert_eq!(state.lines[2].fields().line_mode_start, LineMode::String);
        assert_eq!(state.lines[2].fields().line_mode_end, LineMode::Default);
    }

    #[test]
    fn test_append_line_seeds_mode_from_last_line() {
        let state = state_from("\"open");
        let appended = append_line(&state, "still open", LineTerminator::None);

        assert_eq!(appended.lines.len(), 2);
        assert_eq!(
            appended.lines[1].fields().line_mode_start,
            LineMode::String
        );
        // the input state is a value; appending did not grow it
        assert_eq!(state.lines.len(), 1);
    }

    #[test]
    fn test_append_line_on_empty_state() {
        let empty = State { lines: Vec::new() };
        let appended = append_line(&empty, "x", LineTerminator::None);
        assert_eq!(appended.lines.len(), 1);
        assert_eq!(appended.lines[0].fields().line_mode_start, LineMode::Default);
    }

    #[test]
    fn test_update_line_out_of_bounds() {
        let state = state_from("foo");
        let result = update_line(&state, 1, "bar");
        assert_eq!(
            result,
            Err(LexError::BadLineNumber {
                line_number: 1,
                num_lines: 1,
            })
        );
    }

    #[test]
    fn test_delete_line() {
        let state = state_from("a\nb\nc");
        let updated = delete_line(&state, 1).expect("delete in bounds");
        assert_eq!(texts(&updated), vec!["a", "c"]);
        // untouched lines are shared, not copied
        assert!(Arc::ptr_eq(&state.lines[0], &updated.lines[0]));
        assert!(Arc::ptr_eq(&state.lines[2], &updated.lines[1]));
    }

    #[test]
    fn test_delete_line_out_of_bounds() {
        let state = state_from("a");
        assert!(matches!(
            delete_line(&state, 5),
            Err(LexError::BadLineNumber { .. })
        ));
    }

    #[test]
    fn test_delete_line_does_not_cascade() {
        // deleting the string-opening line leaves the continuation lines in
        // String mode; restoring consistency is the caller's follow-up
        let state = state_from("\"open\nstill\nstill2");
        let updated = delete_line(&state, 0).expect("delete in bounds");
        assert_eq!(
            updated.lines[0].fields().line_mode_start,
            LineMode::String
        );
    }

    #[test]
    fn test_update_range_rejects_backwards_ranges() {
        let state = state_from("foo\nbar");

        let same_line = Range {
            start: RangePosition {
                line_number: 0,
                line_code_unit: 2,
            },
            end: RangePosition {
                line_number: 0,
                line_code_unit: 1,
            },
        };
        assert!(matches!(
            update_range(&state, &same_line, "X"),
            Err(LexError::BadRange {
                kind: BadRangeKind::SameLineStartAfterEnd,
                ..
            })
        ));

        let crossed_lines = Range {
            start: RangePosition {
                line_number: 1,
                line_code_unit: 0,
            },
            end: RangePosition {
                line_number: 0,
                line_code_unit: 0,
            },
        };
        assert!(matches!(
            update_range(&state, &crossed_lines, "X"),
            Err(LexError::BadRange {
                kind: BadRangeKind::StartLineAfterEndLine,
                ..
            })
        ));
    }

    #[test]
    fn test_update_range_rejects_mid_character_offsets() {
        let state = state_from("café");
        let range = Range {
            start: RangePosition {
                line_number: 0,
                line_code_unit: 4,
            },
            end: RangePosition {
                line_number: 0,
                line_code_unit: 5,
            },
        };
        assert!(matches!(
            update_range(&state, &range, "X"),
            Err(LexError::BadRange {
                kind: BadRangeKind::StartOffsetNotOnCharBoundary,
                ..
            })
        ));
    }

    #[test]
    fn test_failed_update_leaves_state_usable() {
        let state = state_from("foo");
        let bad_range = Range {
            start: RangePosition {
                line_number: 0,
                line_code_unit: 0,
            },
            end: RangePosition {
                line_number: 0,
                line_code_unit: 99,
            },
        };
        let result = update_range(&state, &bad_range, "X");
        assert!(matches!(
            result,
            Err(LexError::BadRange {
                kind: BadRangeKind::EndOffsetExceedsLineLength,
                ..
            })
        ));
        assert_eq!(texts(&state), vec!["foo"]);
    }

    #[test]
    fn test_update_range_cascade_stops_at_unchanged_mode() {
        let state = state_from("a\nb\nc\nd");

        // replace "b" with a string opener; c and d must flip to String
        let updated = update_line(&state, 1, "\"").expect("update in bounds");
        assert_eq!(updated.lines[2].fields().line_mode_start, LineMode::String);
        assert_eq!(updated.lines[3].fields().line_mode_start, LineMode::String);
        // line 0 was before the edit and is shared by reference
        assert!(Arc::ptr_eq(&state.lines[0], &updated.lines[0]));

        // a plain replacement of line 0 leaves every later line shared
        let updated = update_line(&state, 0, "aa").expect("update in bounds");
        assert!(Arc::ptr_eq(&state.lines[1], &updated.lines[1]));
        assert!(Arc::ptr_eq(&state.lines[2], &updated.lines[2]));
        assert!(Arc::ptr_eq(&state.lines[3], &updated.lines[3]));
    }
}
