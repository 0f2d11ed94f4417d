//! Text buffer adapter
//!
//! The editing engines only talk to a document through [`TextBuffer`]: read
//! characters and ranges, mutate ranges, navigate lines, read and write the
//! selection, and bracket multi-step mutations in an edit group so they undo
//! as one step. [`RopeBuffer`] is the stock implementation over a
//! [`ropey::Rope`] with `'\n'` as the only line break.

use bevy::prelude::*;
use ropey::Rope;
use std::ops::Range;

use crate::types::{Selection, SelectionSet, TextEdit};

/// The line-break marker. Counts as one character for offset arithmetic.
pub const LINE_BREAK: char = '\n';

/// Mutable text document with a cursor/selection and grouped edits.
///
/// All offsets are character offsets. Reads outside the document return
/// `None` or are clamped, and writes outside it are no-ops.
pub trait TextBuffer {
    /// Number of characters in the document
    fn len_chars(&self) -> usize;

    /// Counter that changes whenever the text changes
    fn content_version(&self) -> u64;

    /// Character at `offset`, or `None` past the end
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Text in `range`, clamped to the document
    fn slice(&self, range: Range<usize>) -> String;

    /// Insert `text` at `offset` (clamped to the document end)
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove the characters in `range` (clamped to the document)
    fn remove(&mut self, range: Range<usize>);

    /// Start a group of mutations that undo/redo as a single step.
    /// Groups nest; only the outermost `end_edit_group` commits.
    fn begin_edit_group(&mut self);

    /// Finish the current edit group
    fn end_edit_group(&mut self);

    /// Number of lines. A document always has at least one (possibly empty) line.
    fn line_count(&self) -> usize;

    /// Index of the line containing `offset` (clamped to the document)
    fn line_of(&self, offset: usize) -> usize;

    /// Start offset of `line` (clamped to the last line)
    fn line_start(&self, line: usize) -> usize;

    /// Length of `line` in characters, including its trailing line break
    fn line_len(&self, line: usize) -> usize;

    /// Current cursor/selection state
    fn selections(&self) -> &SelectionSet;

    /// Replace the cursor/selection state (clamped to the document)
    fn set_selections(&mut self, selections: SelectionSet);

    /// Revert the most recent edit group, restoring the selection held before it.
    /// Returns false if there is nothing to undo or the buffer keeps no history.
    fn undo(&mut self) -> bool {
        false
    }

    /// Re-apply the most recently undone group
    fn redo(&mut self) -> bool {
        false
    }

    // ----- provided helpers -----

    /// Character immediately before `offset`, or `None` at document start
    fn char_before(&self, offset: usize) -> Option<char> {
        offset.checked_sub(1).and_then(|prev| self.char_at(prev))
    }

    /// The primary selection
    fn selection(&self) -> Selection {
        self.selections().primary()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.set_selections(SelectionSet::from(selection));
    }

    /// Collapse everything to a single cursor at `offset`
    fn set_cursor(&mut self, offset: usize) {
        self.set_selection(Selection::cursor(offset));
    }

    /// Start offset of the line containing `offset`
    fn line_start_at(&self, offset: usize) -> usize {
        self.line_start(self.line_of(offset))
    }

    /// Offset just past the line containing `offset`, including its break.
    /// Equals the document length for the last line.
    fn line_end_at(&self, offset: usize) -> usize {
        let line = self.line_of(offset);
        self.line_start(line) + self.line_len(line)
    }

    /// Length of the line containing `offset`, excluding its break
    fn line_content_len_at(&self, offset: usize) -> usize {
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let len = self.line_len(line);
        if len > 0 && self.char_at(start + len - 1) == Some(LINE_BREAK) {
            len - 1
        } else {
            len
        }
    }

    /// Whole document as a string
    fn text(&self) -> String {
        self.slice(0..self.len_chars())
    }
}

// ========== Undo history ==========

/// A single recorded mutation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOperation {
    /// The text that was removed (empty for insertions)
    pub removed_text: String,
    /// The text that was inserted (empty for deletions)
    pub inserted_text: String,
    /// The position where the edit occurred (char index)
    pub position: usize,
}

/// Mutations that undo/redo together
#[derive(Clone, Debug, Default)]
pub struct EditGroup {
    /// The operations in this group (in order of execution)
    pub operations: Vec<EditOperation>,
    /// Selection state before the first operation
    pub selections_before: SelectionSet,
    /// Selection state when the group was closed
    pub selections_after: SelectionSet,
}

impl EditGroup {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// History manager for undo/redo of edit groups
#[derive(Clone, Debug)]
pub struct EditHistory {
    /// Stack of undo groups
    pub undo_stack: Vec<EditGroup>,
    /// Stack of redo groups
    pub redo_stack: Vec<EditGroup>,
    /// Maximum number of groups to keep
    pub max_history_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history_size: 1000,
        }
    }
}

impl EditHistory {
    /// Push a finished group, dropping the redo stack
    pub fn commit(&mut self, group: EditGroup) {
        if group.is_empty() {
            return;
        }
        self.undo_stack.push(group);
        // Trim history if needed
        while self.undo_stack.len() > self.max_history_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

// ========== Rope-backed buffer ==========

/// [`TextBuffer`] over a [`Rope`], with selection tracking and undo groups.
#[derive(Clone, Debug, Default)]
pub struct RopeBuffer {
    rope: Rope,
    selections: SelectionSet,
    history: EditHistory,
    /// Nesting depth of open edit groups
    group_depth: usize,
    /// The group being built while `group_depth > 0`
    open_group: Option<EditGroup>,
    /// Bumped on every content change
    content_version: u64,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::default()
        }
    }

    /// Replace the whole document, resetting cursor and history
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selections = SelectionSet::with_cursor(0);
        self.history.clear();
        self.group_depth = 0;
        self.open_group = None;
        self.content_version += 1;
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn close_open_groups(&mut self) {
        if self.group_depth > 0 {
            warn!("edit group left open ({} levels), closing it", self.group_depth);
            self.group_depth = 1;
            self.end_edit_group();
        }
    }

    fn record(&mut self, operation: EditOperation, selections_before: SelectionSet) {
        match self.open_group.as_mut() {
            Some(group) => group.operations.push(operation),
            None => {
                // A lone mutation is its own group
                let group = EditGroup {
                    operations: vec![operation],
                    selections_before,
                    selections_after: self.selections.clone(),
                };
                self.history.commit(group);
            }
        }
    }

    fn raw_insert(&mut self, offset: usize, text: &str) {
        let len = text.chars().count();
        self.rope.insert(offset, text);
        self.selections.adjust(&TextEdit::insert(offset, len));
        self.content_version += 1;
    }

    fn raw_remove(&mut self, range: Range<usize>) {
        let edit = TextEdit::delete(range.start, range.end);
        self.rope.remove(range);
        self.selections.adjust(&edit);
        self.content_version += 1;
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }
}

impl TextBuffer for RopeBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn content_version(&self) -> u64 {
        self.content_version
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp_range(range);
        self.rope.slice(range).to_string()
    }

    fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.rope.len_chars());
        let before = self.selections.clone();
        self.raw_insert(offset, text);
        self.record(
            EditOperation {
                removed_text: String::new(),
                inserted_text: text.to_string(),
                position: offset,
            },
            before,
        );
    }

    fn remove(&mut self, range: Range<usize>) {
        let range = self.clamp_range(range);
        if range.is_empty() {
            return;
        }
        let removed_text = self.rope.slice(range.clone()).to_string();
        let position = range.start;
        let before = self.selections.clone();
        self.raw_remove(range);
        self.record(
            EditOperation {
                removed_text,
                inserted_text: String::new(),
                position,
            },
            before,
        );
    }

    fn begin_edit_group(&mut self) {
        if self.group_depth == 0 {
            self.open_group = Some(EditGroup {
                operations: Vec::new(),
                selections_before: self.selections.clone(),
                selections_after: SelectionSet::default(),
            });
        }
        self.group_depth += 1;
    }

    fn end_edit_group(&mut self) {
        match self.group_depth {
            0 => warn!("end_edit_group called without a matching begin_edit_group"),
            1 => {
                self.group_depth = 0;
                if let Some(mut group) = self.open_group.take() {
                    group.selections_after = self.selections.clone();
                    self.history.commit(group);
                }
            }
            _ => self.group_depth -= 1,
        }
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        self.rope.line(line).len_chars()
    }

    fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    fn set_selections(&mut self, mut selections: SelectionSet) {
        selections.clamp(self.rope.len_chars());
        self.selections = selections;
    }

    fn undo(&mut self) -> bool {
        self.close_open_groups();
        let Some(group) = self.history.undo_stack.pop() else {
            return false;
        };

        // Apply operations in reverse order
        for op in group.operations.iter().rev() {
            if !op.inserted_text.is_empty() {
                let end = op.position + op.inserted_text.chars().count();
                self.raw_remove(op.position..end);
            }
            if !op.removed_text.is_empty() {
                self.raw_insert(op.position, &op.removed_text);
            }
        }
        self.selections = group.selections_before.clone();
        self.selections.clamp(self.rope.len_chars());

        self.history.redo_stack.push(group);
        true
    }

    fn redo(&mut self) -> bool {
        self.close_open_groups();
        let Some(group) = self.history.redo_stack.pop() else {
            return false;
        };

        for op in group.operations.iter() {
            if !op.removed_text.is_empty() {
                let end = op.position + op.removed_text.chars().count();
                self.raw_remove(op.position..end);
            }
            if !op.inserted_text.is_empty() {
                self.raw_insert(op.position, &op.inserted_text);
            }
        }
        self.selections = group.selections_after.clone();
        self.selections.clamp(self.rope.len_chars());

        self.history.undo_stack.push(group);
        true
    }
}

/// Test helper: parse `|` as the cursor and `[` `]` as a selection (anchor at `[`,
/// head at `]`) and build a buffer from the remaining text.
#[cfg(test)]
pub(crate) fn buffer_with_markers(marked: &str) -> RopeBuffer {
    let mut text = String::new();
    let mut cursor = None;
    let mut open = None;
    let mut close = None;
    for c in marked.chars() {
        let offset = text.chars().count();
        match c {
            '|' => cursor = Some(offset),
            '[' => open = Some(offset),
            ']' => close = Some(offset),
            _ => text.push(c),
        }
    }
    let mut buffer = RopeBuffer::from_text(&text);
    match (open, close, cursor) {
        (Some(anchor), Some(head), _) => buffer.set_selection(Selection::new(head, anchor)),
        (_, _, Some(offset)) => buffer.set_cursor(offset),
        _ => {}
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_at_out_of_range_is_none() {
        let buffer = RopeBuffer::from_text("ab");
        assert_eq!(buffer.char_at(1), Some('b'));
        assert_eq!(buffer.char_at(2), None);
        assert_eq!(buffer.char_before(0), None);
    }

    #[test]
    fn test_line_navigation() {
        let buffer = RopeBuffer::from_text("one\ntwo\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_of(5), 1);
        assert_eq!(buffer.line_start_at(5), 4);
        assert_eq!(buffer.line_end_at(5), 8);
        assert_eq!(buffer.line_content_len_at(5), 3);
        // Trailing empty line
        assert_eq!(buffer.line_start_at(8), 8);
        assert_eq!(buffer.line_end_at(8), 8);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut buffer = RopeBuffer::from_text("abc");
        buffer.remove(5..9);
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_insert_shifts_cursor_at_insertion_point() {
        let mut buffer = RopeBuffer::from_text("abc");
        buffer.set_cursor(1);
        buffer.insert(1, "XY");
        assert_eq!(buffer.text(), "aXYbc");
        assert_eq!(buffer.selection(), Selection::cursor(3));
    }

    #[test]
    fn test_group_undoes_as_one_step() {
        let mut buffer = RopeBuffer::from_text("a\nb\n");
        buffer.set_cursor(0);
        buffer.begin_edit_group();
        buffer.insert(0, "  ");
        buffer.insert(4, "  ");
        buffer.end_edit_group();
        assert_eq!(buffer.text(), "  a\n  b\n");

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "a\nb\n");
        assert_eq!(buffer.selection(), Selection::cursor(0));
        assert!(!buffer.can_undo());

        assert!(buffer.redo());
        assert_eq!(buffer.text(), "  a\n  b\n");
    }

    #[test]
    fn test_nested_groups_commit_once() {
        let mut buffer = RopeBuffer::from_text("x");
        buffer.begin_edit_group();
        buffer.insert(0, "1");
        buffer.begin_edit_group();
        buffer.insert(0, "2");
        buffer.end_edit_group();
        buffer.remove(2..3);
        buffer.end_edit_group();
        assert_eq!(buffer.text(), "21");
        assert_eq!(buffer.history().undo_stack.len(), 1);

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "x");
    }

    #[test]
    fn test_content_version_tracks_text_changes() {
        let mut buffer = RopeBuffer::from_text("x");
        let start = buffer.content_version();
        buffer.set_cursor(1);
        assert_eq!(buffer.content_version(), start);
        buffer.insert(1, "y");
        let edited = buffer.content_version();
        assert_ne!(edited, start);
        buffer.remove(7..9);
        assert_eq!(buffer.content_version(), edited);
        assert!(buffer.undo());
        assert_ne!(buffer.content_version(), edited);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = RopeBuffer::from_text("x");
        buffer.insert(1, "y");
        assert!(buffer.undo());
        assert!(buffer.can_redo());
        buffer.insert(0, "z");
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_marker_helper() {
        let buffer = buffer_with_markers("a[bc]d");
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.selection(), Selection::new(3, 1));

        let buffer = buffer_with_markers("ab|cd");
        assert_eq!(buffer.selection(), Selection::cursor(2));
    }
}
