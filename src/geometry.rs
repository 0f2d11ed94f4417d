//! Line and selection geometry helpers

use crate::buffer::{TextBuffer, LINE_BREAK};
use crate::types::Selection;

/// True for a missing character (document start/end) or a line break
pub fn is_line_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c == LINE_BREAK,
    }
}

/// True if only spaces and tabs sit between the start of the line and `pos`
pub fn is_before_line_content_start<B: TextBuffer + ?Sized>(buffer: &B, pos: usize) -> bool {
    let mut offset = pos;
    loop {
        let c = buffer.char_before(offset);
        if is_line_boundary(c) {
            return true;
        }
        match c {
            Some(' ') | Some('\t') => offset -= 1,
            _ => return false,
        }
    }
}

/// True if `selection` starts at a line start and ends at a line end.
///
/// The end counts as a line end when the character after it is a boundary,
/// or when the selection's last character is itself a line break (the
/// selection already includes the break and stops at the next line's start).
pub fn selection_is_full_lines<B: TextBuffer + ?Sized>(buffer: &B, selection: &Selection) -> bool {
    let start = selection.start();
    let end = selection.end();

    let starts_at_line_start = is_line_boundary(buffer.char_before(start));
    let ends_at_line_end = is_line_boundary(buffer.char_at(end))
        || (end > start && buffer.char_before(end) == Some(LINE_BREAK));

    starts_at_line_start && ends_at_line_end
}

/// Start offsets of every line the selection overlaps, in document order.
///
/// Walks from the line containing the selection start up to, but not
/// including, the first line starting at or after the selection end.
pub fn line_starts_in_selection<'a, B: TextBuffer + ?Sized>(
    buffer: &'a B,
    selection: &Selection,
) -> LineStarts<'a, B> {
    let line = buffer.line_of(selection.start());
    LineStarts {
        buffer,
        line: Some(line),
        end: selection.end(),
    }
}

/// Iterator returned by [`line_starts_in_selection`]
pub struct LineStarts<'a, B: TextBuffer + ?Sized> {
    buffer: &'a B,
    line: Option<usize>,
    end: usize,
}

impl<B: TextBuffer + ?Sized> Iterator for LineStarts<'_, B> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let line = self.line?;
        let start = self.buffer.line_start(line);
        if start >= self.end {
            self.line = None;
            return None;
        }
        self.line = (line + 1 < self.buffer.line_count()).then_some(line + 1);
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    #[test]
    fn test_line_boundary() {
        assert!(is_line_boundary(None));
        assert!(is_line_boundary(Some('\n')));
        assert!(!is_line_boundary(Some(' ')));
    }

    #[test]
    fn test_before_line_content_start() {
        let buffer = RopeBuffer::from_text("ab\n \t cd");
        assert!(is_before_line_content_start(&buffer, 0));
        assert!(!is_before_line_content_start(&buffer, 1));
        assert!(is_before_line_content_start(&buffer, 3));
        assert!(is_before_line_content_start(&buffer, 6));
        assert!(!is_before_line_content_start(&buffer, 7));
    }

    #[test]
    fn test_partial_line_selection_is_not_full_lines() {
        let buffer = RopeBuffer::from_text("ab\ncd");
        assert!(!selection_is_full_lines(&buffer, &Selection::new(4, 1)));
    }

    #[test]
    fn test_full_line_selections() {
        let buffer = RopeBuffer::from_text("ab\ncd\nef");
        // "ab" without its break
        assert!(selection_is_full_lines(&buffer, &Selection::new(2, 0)));
        // "ab\ncd\n", ending at the start of the next line
        assert!(selection_is_full_lines(&buffer, &Selection::new(6, 0)));
        // "cd\nef" up to the document end
        assert!(selection_is_full_lines(&buffer, &Selection::new(3, 8)));
        // starts mid-line
        assert!(!selection_is_full_lines(&buffer, &Selection::new(6, 1)));
    }

    #[test]
    fn test_line_starts_in_selection() {
        let buffer = RopeBuffer::from_text("ab\ncd\nef\n");
        let starts: Vec<usize> = line_starts_in_selection(&buffer, &Selection::new(7, 1)).collect();
        assert_eq!(starts, vec![0, 3, 6]);

        // Ending exactly at a line start excludes that line
        let starts: Vec<usize> = line_starts_in_selection(&buffer, &Selection::new(6, 0)).collect();
        assert_eq!(starts, vec![0, 3]);

        // Last line of the document
        let starts: Vec<usize> = line_starts_in_selection(&buffer, &Selection::new(9, 6)).collect();
        assert_eq!(starts, vec![6]);
    }
}
