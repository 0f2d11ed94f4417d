//! Anchor (link) hit-testing over externally supplied annotation ranges

use bevy::prelude::*;
use std::collections::HashMap;

use crate::buffer::{TextBuffer, LINE_BREAK};
use crate::settings::LayoutSettings;

/// A styled range within one line, optionally carrying a link target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatRange {
    /// Start column within the line (chars)
    pub start: usize,
    /// Length in chars
    pub length: usize,
    /// Link target, if this range is an anchor
    pub link: Option<String>,
}

impl FormatRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            link: None,
        }
    }

    pub fn link(start: usize, length: usize, target: impl Into<String>) -> Self {
        Self {
            start,
            length,
            link: Some(target.into()),
        }
    }

    /// True if `column` falls in `[start, start + length)`
    pub fn contains(&self, column: usize) -> bool {
        self.start <= column && column < self.start + self.length
    }
}

/// Per-line style annotations produced by a highlighter.
///
/// The editor only reads these; keeping them in step with edits is the
/// highlighter's job.
pub trait AnnotationStore {
    /// Ranges annotating `line`, in the order the highlighter produced them
    fn line_ranges(&self, line: usize) -> &[FormatRange];
}

/// Map-backed [`AnnotationStore`]
#[derive(Clone, Debug, Default)]
pub struct LineAnnotations {
    lines: HashMap<usize, Vec<FormatRange>>,
}

impl LineAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all ranges of `line`
    pub fn set_line(&mut self, line: usize, ranges: Vec<FormatRange>) {
        if ranges.is_empty() {
            self.lines.remove(&line);
        } else {
            self.lines.insert(line, ranges);
        }
    }

    pub fn push(&mut self, line: usize, range: FormatRange) {
        self.lines.entry(line).or_default().push(range);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl AnnotationStore for LineAnnotations {
    fn line_ranges(&self, line: usize) -> &[FormatRange] {
        self.lines.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Maps a view-local point (top-left origin) to a document offset
pub trait PointMapper {
    fn offset_at(&self, buffer: &dyn TextBuffer, point: Vec2) -> usize;
}

/// [`PointMapper`] for a fixed-pitch, unwrapped text layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospacePointMapper {
    pub char_width: f32,
    pub line_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
}

impl From<&LayoutSettings> for MonospacePointMapper {
    fn from(layout: &LayoutSettings) -> Self {
        Self {
            char_width: layout.char_width,
            line_height: layout.line_height,
            margin_left: layout.margin_left,
            margin_top: layout.margin_top,
        }
    }
}

impl PointMapper for MonospacePointMapper {
    fn offset_at(&self, buffer: &dyn TextBuffer, point: Vec2) -> usize {
        let last_line = buffer.line_count().saturating_sub(1);
        let line = ((point.y - self.margin_top) / self.line_height.max(1.0))
            .floor()
            .max(0.0) as usize;
        let line = line.min(last_line);

        let line_start = buffer.line_start(line);
        // Nearest character boundary, like a caret placed by clicking
        let column = ((point.x - self.margin_left) / self.char_width.max(1.0))
            .round()
            .max(0.0) as usize;
        line_start + column.min(buffer.line_content_len_at(line_start))
    }
}

/// Link target of the first anchor range covering `offset`.
///
/// A line-break position is never part of a link.
pub fn link_at_offset<'a, B, A>(buffer: &B, annotations: &'a A, offset: usize) -> Option<&'a str>
where
    B: TextBuffer + ?Sized,
    A: AnnotationStore + ?Sized,
{
    if buffer.char_at(offset) == Some(LINE_BREAK) {
        return None;
    }
    let line = buffer.line_of(offset);
    let column = offset - buffer.line_start(line);
    annotations
        .line_ranges(line)
        .iter()
        .filter(|range| range.contains(column))
        .find_map(|range| range.link.as_deref())
}

/// Link target under a view-local point, if any
pub fn anchor_at<'a, B, A>(
    buffer: &B,
    mapper: &dyn PointMapper,
    annotations: &'a A,
    point: Vec2,
) -> Option<&'a str>
where
    B: TextBuffer,
    A: AnnotationStore + ?Sized,
{
    let offset = mapper.offset_at(buffer, point);
    link_at_offset(buffer, annotations, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    fn sample() -> (RopeBuffer, LineAnnotations) {
        // line 1: "see [docs](http://x) ok"
        let buffer = RopeBuffer::from_text("# Title\nsee [docs](http://x) ok\n");
        let mut annotations = LineAnnotations::new();
        annotations.push(1, FormatRange::new(0, 3));
        annotations.push(1, FormatRange::link(4, 16, "http://x"));
        (buffer, annotations)
    }

    #[test]
    fn test_link_at_offset_bounds() {
        let (buffer, annotations) = sample();
        // line 1 starts at 8
        assert_eq!(link_at_offset(&buffer, &annotations, 8 + 3), None);
        assert_eq!(link_at_offset(&buffer, &annotations, 8 + 4), Some("http://x"));
        assert_eq!(link_at_offset(&buffer, &annotations, 8 + 19), Some("http://x"));
        assert_eq!(link_at_offset(&buffer, &annotations, 8 + 20), None);
    }

    #[test]
    fn test_range_without_link_does_not_hide_later_link() {
        let buffer = RopeBuffer::from_text("[a](b)");
        let mut annotations = LineAnnotations::new();
        annotations.set_line(0, vec![FormatRange::new(0, 6), FormatRange::link(0, 6, "b")]);
        assert_eq!(link_at_offset(&buffer, &annotations, 2), Some("b"));
    }

    #[test]
    fn test_line_break_is_never_a_link() {
        let buffer = RopeBuffer::from_text("ab\ncd");
        let mut annotations = LineAnnotations::new();
        annotations.push(0, FormatRange::link(0, 10, "x"));
        assert_eq!(link_at_offset(&buffer, &annotations, 1), Some("x"));
        assert_eq!(link_at_offset(&buffer, &annotations, 2), None);
    }

    #[test]
    fn test_out_of_range_offset_has_no_link() {
        let (buffer, annotations) = sample();
        assert_eq!(link_at_offset(&buffer, &annotations, 500), None);
    }

    #[test]
    fn test_monospace_mapper() {
        let (buffer, annotations) = sample();
        let mapper = MonospacePointMapper {
            char_width: 10.0,
            line_height: 20.0,
            margin_left: 5.0,
            margin_top: 0.0,
        };
        // second line, column 6
        assert_eq!(mapper.offset_at(&buffer, Vec2::new(5.0 + 60.0, 25.0)), 14);
        // past the end of the line clamps to its content end
        assert_eq!(mapper.offset_at(&buffer, Vec2::new(900.0, 25.0)), 8 + 23);
        // above the text
        assert_eq!(mapper.offset_at(&buffer, Vec2::new(-10.0, -10.0)), 0);

        assert_eq!(anchor_at(&buffer, &mapper, &annotations, Vec2::new(65.0, 25.0)), Some("http://x"));
        assert_eq!(anchor_at(&buffer, &mapper, &annotations, Vec2::new(65.0, 5.0)), None);
    }
}
