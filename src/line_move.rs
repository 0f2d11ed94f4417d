//! Line reordering: move the lines touched by the selection past a neighbour

use bevy::prelude::*;
use std::ops::Range;

use crate::buffer::{TextBuffer, LINE_BREAK};
use crate::types::{Dispatch, Selection};

/// Which neighbour the block swaps with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Move the selected lines up one line
pub fn move_lines_up<B: TextBuffer + ?Sized>(buffer: &mut B) -> Dispatch {
    move_lines(buffer, MoveDirection::Up)
}

/// Move the selected lines down one line
pub fn move_lines_down<B: TextBuffer + ?Sized>(buffer: &mut B) -> Dispatch {
    move_lines(buffer, MoveDirection::Down)
}

/// Swap the block of lines touched by the primary selection with the line
/// above or below it.
///
/// The selection follows the moved text. Moving the first line up or the
/// last line down leaves the document untouched.
pub fn move_lines<B: TextBuffer + ?Sized>(buffer: &mut B, direction: MoveDirection) -> Dispatch {
    if buffer.selections().is_complex() {
        trace!("move lines {:?}: complex selection, passing through", direction);
        return Dispatch::PassThrough;
    }

    let selection = buffer.selection();
    let block = expand_to_lines(buffer, &selection);

    let Some((range, replacement, shift)) = plan_move(buffer, block, direction) else {
        trace!("move lines {:?}: already at document edge", direction);
        return Dispatch::Handled;
    };

    debug!("move lines {:?}: rewriting {:?}, selection shift {}", direction, range, shift);
    buffer.begin_edit_group();
    buffer.remove(range.clone());
    buffer.insert(range.start, &replacement);
    buffer.set_selection(Selection::new(
        offset_by(selection.head, shift),
        offset_by(selection.anchor, shift),
    ));
    buffer.end_edit_group();

    Dispatch::Handled
}

/// Snap a selection outward to whole lines, including the last line's break.
///
/// A non-empty selection that already ends at a line start is left as is
/// at the end.
fn expand_to_lines<B: TextBuffer + ?Sized>(buffer: &B, selection: &Selection) -> Range<usize> {
    let start = buffer.line_start_at(selection.start());
    let end = if selection.has_selection() && buffer.char_before(selection.end()) == Some(LINE_BREAK) {
        selection.end()
    } else {
        buffer.line_end_at(selection.end())
    };
    start..end
}

/// Work out the range to rewrite, its new text, and how far the selected
/// text travels. `None` when there is no neighbour to swap with.
fn plan_move<B: TextBuffer + ?Sized>(
    buffer: &B,
    block: Range<usize>,
    direction: MoveDirection,
) -> Option<(Range<usize>, String, isize)> {
    let selected = buffer.slice(block.clone());

    match direction {
        MoveDirection::Up => {
            if block.start == 0 {
                return None;
            }
            let prev_start = buffer.line_start_at(block.start - 1);
            let prev = buffer.slice(prev_start..block.start);
            let replacement = swap_lines(&selected, &prev);
            let shift = -((block.start - prev_start) as isize);
            Some((prev_start..block.end, replacement, shift))
        }
        MoveDirection::Down => {
            if block.end >= buffer.len_chars() {
                return None;
            }
            let next_end = buffer.line_end_at(block.end);
            let next = buffer.slice(block.end..next_end);
            if next.is_empty() {
                return None;
            }
            let replacement = swap_lines(&next, &selected);
            // The selected block loses its break when it becomes the last line
            let moved_len = if next.ends_with(LINE_BREAK) {
                selected.chars().count()
            } else {
                selected.chars().count().saturating_sub(1)
            };
            let shift = (replacement.chars().count() - moved_len) as isize;
            Some((block.start..next_end, replacement, shift))
        }
    }
}

/// `first` followed by `second`, where `second` previously preceded `first`.
///
/// When `first` was the document's last line it has no trailing break; the
/// break moves over from `second` so line structure is preserved.
fn swap_lines(first: &str, second: &str) -> String {
    if first.ends_with(LINE_BREAK) {
        format!("{first}{second}")
    } else {
        let second = second.strip_suffix(LINE_BREAK).unwrap_or(second);
        format!("{first}{LINE_BREAK}{second}")
    }
}

fn offset_by(offset: usize, shift: isize) -> usize {
    offset.saturating_add_signed(shift)
}
