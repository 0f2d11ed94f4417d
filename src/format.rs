//! Inline span toggling (emphasis, strong, code)

use bevy::prelude::*;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::TextBuffer;
use crate::types::Selection;

/// What a toggle did to the document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Delimiters were inserted around the range
    Wrapped,
    /// The surrounding delimiters were removed
    Unwrapped,
    /// Nothing to do: empty range, or a delimiter on only one side
    Unchanged,
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// The word around `offset`, with leading and trailing underscores trimmed.
///
/// Prefers the word segment under the offset and falls back to the one just
/// before it, so a cursor right after a word still finds it. Returns an
/// empty range at `offset` when there is no word.
pub fn word_range_at<B: TextBuffer + ?Sized>(buffer: &B, offset: usize) -> Range<usize> {
    let line_start = buffer.line_start_at(offset);
    let line = buffer.slice(line_start..line_start + buffer.line_content_len_at(offset));
    let column = offset - line_start;

    // (start, end) in chars, for every word-bound segment of the line
    let mut segments = Vec::new();
    let mut chars_seen = 0;
    for part in line.split_word_bounds() {
        let len = part.chars().count();
        segments.push((chars_seen, chars_seen + len, part));
        chars_seen += len;
    }

    let word_at = |column: usize| {
        segments
            .iter()
            .find(|(start, end, _)| *start <= column && column < *end)
            .filter(|(_, _, part)| part.chars().any(is_word_char))
    };

    let Some(&(start, end, part)) = word_at(column).or_else(|| column.checked_sub(1).and_then(word_at)) else {
        return offset..offset;
    };

    // Underscores delimit emphasis here, they are not part of the word
    let leading = part.chars().take_while(|c| *c == '_').count();
    let trailing = part.chars().rev().take_while(|c| *c == '_').count();
    let (start, end) = if leading == end - start {
        (start, start)
    } else {
        (start + leading, end - trailing)
    };
    line_start + start..line_start + end
}

/// Wrap the selection (or the word under the cursor) in `delimiter`, or
/// unwrap it if it is already wrapped.
///
/// A delimiter on only one side is ambiguous and leaves the document as is.
pub fn toggle_format<B: TextBuffer + ?Sized>(buffer: &mut B, delimiter: &str) -> ToggleOutcome {
    let selection = buffer.selection();
    let range = if selection.has_selection() {
        selection.range()
    } else {
        word_range_at(buffer, selection.head)
    };
    if range.is_empty() {
        trace!("toggle {:?}: nothing to format at {}", delimiter, selection.head);
        return ToggleOutcome::Unchanged;
    }

    let len = delimiter.chars().count();
    let starts_with = range.start >= len && buffer.slice(range.start - len..range.start) == delimiter;
    let ends_with = buffer.slice(range.end..range.end + len) == delimiter;

    match (starts_with, ends_with) {
        (false, false) => {
            debug!("wrap {:?} in {:?}", range, delimiter);
            buffer.begin_edit_group();
            buffer.insert(range.end, delimiter);
            buffer.insert(range.start, delimiter);
            let reselect = if selection.has_selection() {
                selection
            } else {
                Selection::new(range.end, range.start)
            };
            buffer.set_selection(reselect.with_range(range.start + len, range.end + len));
            buffer.end_edit_group();
            ToggleOutcome::Wrapped
        }
        (true, true) => {
            debug!("unwrap {:?} from {:?}", range, delimiter);
            buffer.begin_edit_group();
            buffer.remove(range.end..range.end + len);
            buffer.remove(range.start - len..range.start);
            buffer.end_edit_group();
            ToggleOutcome::Unwrapped
        }
        _ => {
            trace!(
                "toggle {:?}: delimiter on one side only of {:?}, leaving as is",
                delimiter,
                range
            );
            ToggleOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::buffer_with_markers;

    #[test]
    fn test_word_range_trims_underscores() {
        let buffer = buffer_with_markers("_wo|rd_");
        assert_eq!(word_range_at(&buffer, 3), 1..5);
        assert_eq!(buffer.slice(1..5), "word");
    }

    #[test]
    fn test_word_range_excludes_asterisks() {
        let buffer = buffer_with_markers("say *he|llo* now");
        assert_eq!(buffer.slice(word_range_at(&buffer, 7)), "hello");
    }

    #[test]
    fn test_word_range_after_word_end() {
        let buffer = buffer_with_markers("one two");
        assert_eq!(word_range_at(&buffer, 3), 0..3);
        assert_eq!(word_range_at(&buffer, 7), 4..7);
    }

    #[test]
    fn test_word_range_on_second_line() {
        let buffer = buffer_with_markers("first\n__bold__ x");
        assert_eq!(word_range_at(&buffer, 10), 8..12);
    }

    #[test]
    fn test_no_word_is_empty() {
        let buffer = buffer_with_markers("a  ,  b");
        assert!(word_range_at(&buffer, 4).is_empty());
        let buffer = buffer_with_markers("x ___ y");
        assert!(word_range_at(&buffer, 3).is_empty());
    }

    #[test]
    fn test_wrap_selection_reselects_content() {
        let mut buffer = buffer_with_markers("a [bc] d");
        assert_eq!(toggle_format(&mut buffer, "**"), ToggleOutcome::Wrapped);
        assert_eq!(buffer.text(), "a **bc** d");
        assert_eq!(buffer.selection(), Selection::new(6, 4));
    }

    #[test]
    fn test_wrap_word_under_cursor() {
        let mut buffer = buffer_with_markers("say he|llo");
        assert_eq!(toggle_format(&mut buffer, "`"), ToggleOutcome::Wrapped);
        assert_eq!(buffer.text(), "say `hello`");
        assert_eq!(buffer.selection(), Selection::new(10, 5));
        assert_eq!(buffer.history().undo_stack.len(), 1);
    }

    #[test]
    fn test_unwrap_word_under_cursor() {
        let mut buffer = buffer_with_markers("say _he|llo_ now");
        assert_eq!(toggle_format(&mut buffer, "_"), ToggleOutcome::Unwrapped);
        assert_eq!(buffer.text(), "say hello now");
    }

    #[test]
    fn test_wrap_then_unwrap_restores_text() {
        let mut buffer = buffer_with_markers("x [word] y");
        toggle_format(&mut buffer, "*");
        assert_eq!(toggle_format(&mut buffer, "*"), ToggleOutcome::Unwrapped);
        assert_eq!(buffer.text(), "x word y");
    }

    #[test]
    fn test_one_sided_delimiter_is_unchanged() {
        let mut buffer = buffer_with_markers("*[foo]");
        assert_eq!(toggle_format(&mut buffer, "*"), ToggleOutcome::Unchanged);
        assert_eq!(buffer.text(), "*foo");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_empty_target_is_unchanged() {
        let mut buffer = buffer_with_markers("a | b");
        assert_eq!(toggle_format(&mut buffer, "*"), ToggleOutcome::Unchanged);
        assert_eq!(buffer.text(), "a  b");
    }
}
