//! Indentation engine: Tab / Shift-Tab on a cursor or a block of lines

use bevy::prelude::*;

use crate::buffer::TextBuffer;
use crate::geometry::{line_starts_in_selection, selection_is_full_lines};
use crate::settings::SettingsError;
use crate::types::Dispatch;

/// What one indent level is, and how many spaces one unindent removes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndentPolicy {
    /// Text inserted for one indent level: a tab or some spaces
    pub indent_string: String,
    /// Column width used to round cursor indents and to guess how many
    /// leading spaces make up one level when unindenting
    pub spaces_indent_width_hint: usize,
}

impl Default for IndentPolicy {
    fn default() -> Self {
        Self {
            indent_string: "    ".to_string(),
            spaces_indent_width_hint: 4,
        }
    }
}

impl IndentPolicy {
    /// Build a policy from a host-provided indent string.
    ///
    /// The string must be a single tab or one or more spaces.
    pub fn new(indent_string: impl Into<String>, spaces_indent_width_hint: usize) -> Result<Self, SettingsError> {
        let indent_string = indent_string.into();
        let valid = indent_string == "\t" || (!indent_string.is_empty() && indent_string.chars().all(|c| c == ' '));
        if !valid {
            return Err(SettingsError::InvalidIndentString(indent_string));
        }
        Ok(Self {
            indent_string,
            spaces_indent_width_hint,
        })
    }

    pub fn uses_spaces(&self) -> bool {
        self.indent_string.starts_with(' ')
    }

    /// Number of leading spaces a single unindent deletes at most
    pub fn spaces_to_delete(&self) -> usize {
        if self.spaces_indent_width_hint != 0 {
            self.spaces_indent_width_hint
        } else if self.uses_spaces() {
            self.indent_string.chars().count()
        } else {
            0
        }
    }

    /// Text to insert at `column` so the cursor lands on the next indent stop
    fn indent_text_at_column(&self, column: usize) -> String {
        if !self.uses_spaces() {
            return self.indent_string.clone();
        }
        let width = match self.spaces_indent_width_hint {
            0 => self.indent_string.chars().count(),
            hint => hint,
        };
        " ".repeat(width - column % width)
    }
}

/// Tab key: indent at the cursor, or indent every line of a full-line selection
pub fn indent<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) -> Dispatch {
    dispatch(buffer, policy, Direction::Indent)
}

/// Shift-Tab: unindent the cursor's line, or every line of a full-line selection
pub fn unindent<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) -> Dispatch {
    dispatch(buffer, policy, Direction::Unindent)
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Indent,
    Unindent,
}

fn dispatch<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy, direction: Direction) -> Dispatch {
    if buffer.selections().is_complex() {
        trace!("{:?}: complex selection, passing through", direction);
        return Dispatch::PassThrough;
    }

    let selection = buffer.selection();
    if selection.is_cursor() {
        match direction {
            Direction::Indent => indent_at_cursor(buffer, policy),
            Direction::Unindent => unindent_at_cursor(buffer, policy),
        }
        return Dispatch::Handled;
    }

    if !selection_is_full_lines(buffer, &selection) {
        trace!("{:?}: partial-line selection {:?}, collapsing", direction, selection.range());
        let mut collapsed = selection;
        collapsed.collapse_to_start();
        buffer.set_selection(collapsed);
        return Dispatch::Handled;
    }

    match direction {
        Direction::Indent => indent_selected_lines(buffer, policy),
        Direction::Unindent => unindent_selected_lines(buffer, policy),
    }
    Dispatch::Handled
}

/// Insert indentation at the cursor, rounding space indents up to the next stop
pub fn indent_at_cursor<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) {
    let position = buffer.selection().head;
    let column = position - buffer.line_start_at(position);
    let text = policy.indent_text_at_column(column);

    debug!("indent at {} (column {}): inserting {:?}", position, column, text);
    buffer.begin_edit_group();
    buffer.insert(position, &text);
    buffer.end_edit_group();
}

/// Remove one indent level from the start of the cursor's line
pub fn unindent_at_cursor<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) {
    let line_start = buffer.line_start_at(buffer.selection().head);

    buffer.begin_edit_group();
    let deleted = remove_indent_at(buffer, line_start, policy);
    buffer.end_edit_group();
    debug!("unindent line at {}: removed {} chars", line_start, deleted);
}

/// Insert the indent string at the start of every selected line, then
/// extend the selection back over the first inserted indent.
pub fn indent_selected_lines<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) {
    let selection = buffer.selection();
    let line_starts: Vec<usize> = line_starts_in_selection(buffer, &selection).collect();
    let indent_len = policy.indent_string.chars().count();

    buffer.begin_edit_group();
    let mut shift = 0;
    for line_start in &line_starts {
        buffer.insert(line_start + shift, &policy.indent_string);
        shift += indent_len;
    }
    let end = buffer.selection().end();
    buffer.set_selection(selection.with_range(selection.start(), end));
    buffer.end_edit_group();

    debug!("indented {} lines", line_starts.len());
}

/// Remove one indent level from every selected line
pub fn unindent_selected_lines<B: TextBuffer + ?Sized>(buffer: &mut B, policy: &IndentPolicy) {
    let selection = buffer.selection();
    let line_starts: Vec<usize> = line_starts_in_selection(buffer, &selection).collect();

    buffer.begin_edit_group();
    let mut deleted_chars = 0;
    for line_start in &line_starts {
        deleted_chars += remove_indent_at(buffer, line_start - deleted_chars, policy);
    }
    buffer.end_edit_group();

    debug!("unindented {} lines, removed {} chars", line_starts.len(), deleted_chars);
}

/// Delete one indent level at `line_start`. Returns the number of characters removed.
fn remove_indent_at<B: TextBuffer + ?Sized>(buffer: &mut B, line_start: usize, policy: &IndentPolicy) -> usize {
    let count = match buffer.char_at(line_start) {
        Some('\t') => 1,
        Some(' ') => {
            let max = policy.spaces_to_delete();
            (0..max)
                .take_while(|i| buffer.char_at(line_start + i) == Some(' '))
                .count()
        }
        _ => 0,
    };
    buffer.remove(line_start..line_start + count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{buffer_with_markers, RopeBuffer};
    use crate::types::Selection;

    fn tabs() -> IndentPolicy {
        IndentPolicy::new("\t", 4).unwrap()
    }

    #[test]
    fn test_policy_validation() {
        assert!(IndentPolicy::new("  ", 2).is_ok());
        assert!(IndentPolicy::new("\t", 0).is_ok());
        assert_eq!(
            IndentPolicy::new("", 4),
            Err(SettingsError::InvalidIndentString(String::new()))
        );
        assert!(IndentPolicy::new(" x", 4).is_err());
        assert!(IndentPolicy::new("\t\t", 4).is_err());
    }

    #[test]
    fn test_spaces_to_delete_fallbacks() {
        assert_eq!(IndentPolicy::default().spaces_to_delete(), 4);
        assert_eq!(IndentPolicy::new("  ", 0).unwrap().spaces_to_delete(), 2);
        assert_eq!(IndentPolicy::new("\t", 0).unwrap().spaces_to_delete(), 0);
    }

    #[test]
    fn test_indent_at_cursor_rounds_to_next_stop() {
        let mut buffer = buffer_with_markers("ab|c");
        assert_eq!(indent(&mut buffer, &IndentPolicy::default()), Dispatch::Handled);
        assert_eq!(buffer.text(), "ab  c");
        assert_eq!(buffer.selection(), Selection::cursor(4));

        // Already on a stop: a full level
        let mut buffer = buffer_with_markers("x\n|y");
        indent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "x\n    y");
    }

    #[test]
    fn test_indent_at_cursor_with_tab() {
        let mut buffer = buffer_with_markers("ab|c");
        indent(&mut buffer, &tabs());
        assert_eq!(buffer.text(), "ab\tc");
    }

    #[test]
    fn test_unindent_at_cursor() {
        let mut buffer = buffer_with_markers("x\n      ab|c");
        assert_eq!(unindent(&mut buffer, &IndentPolicy::default()), Dispatch::Handled);
        assert_eq!(buffer.text(), "x\n  abc");
        assert_eq!(buffer.selection(), Selection::cursor(6));

        let mut buffer = buffer_with_markers("\t\tab|");
        unindent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "\tab");

        let mut buffer = buffer_with_markers(" |ab");
        unindent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_unindent_without_indent_is_noop() {
        let mut buffer = buffer_with_markers("ab|c");
        assert_eq!(unindent(&mut buffer, &IndentPolicy::default()), Dispatch::Handled);
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.can_undo());

        let mut buffer = RopeBuffer::from_text("");
        unindent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_indent_selected_lines_keeps_block_selected() {
        let mut buffer = buffer_with_markers("[ab\ncd]\nef");
        indent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "    ab\n    cd\nef");
        assert_eq!(buffer.selection(), Selection::new(13, 0));

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "ab\ncd\nef");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_indent_reversed_selection_keeps_direction() {
        let mut buffer = RopeBuffer::from_text("ab\ncd\n");
        buffer.set_selection(Selection::new(0, 6));
        indent(&mut buffer, &tabs());
        assert_eq!(buffer.text(), "\tab\n\tcd\n");
        assert_eq!(buffer.selection(), Selection::new(0, 8));
    }

    #[test]
    fn test_unindent_selected_lines_tracks_deleted_chars() {
        let mut buffer = buffer_with_markers("[    a\n\tb\n  c\nd]");
        unindent(&mut buffer, &IndentPolicy::default());
        assert_eq!(buffer.text(), "a\nb\nc\nd");
        assert_eq!(buffer.selection(), Selection::new(7, 0));
        assert_eq!(buffer.history().undo_stack.len(), 1);
    }

    #[test]
    fn test_partial_line_selection_collapses() {
        let mut buffer = buffer_with_markers("a[b\nc]d");
        assert_eq!(indent(&mut buffer, &IndentPolicy::default()), Dispatch::Handled);
        assert_eq!(buffer.text(), "ab\ncd");
        assert_eq!(buffer.selection(), Selection::cursor(1));
    }

    #[test]
    fn test_complex_selection_passes_through() {
        let mut buffer = RopeBuffer::from_text("ab\ncd");
        let mut selections = buffer.selections().clone();
        selections.add_range(5, 3);
        buffer.set_selections(selections);
        assert_eq!(indent(&mut buffer, &IndentPolicy::default()), Dispatch::PassThrough);
        assert_eq!(unindent(&mut buffer, &IndentPolicy::default()), Dispatch::PassThrough);
        assert_eq!(buffer.text(), "ab\ncd");
    }
}
