//! Core types for the markdown editor

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ========== Edits and offset tracking ==========

/// A single text mutation, used to keep selections in place across edits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Character offset where the edit starts
    pub start: usize,
    /// Character offset where the replaced text ended (before the edit)
    pub old_end: usize,
    /// Character offset where the new text ends (after the edit)
    pub new_end: usize,
}

impl TextEdit {
    /// Create an insertion edit
    pub fn insert(position: usize, length: usize) -> Self {
        Self {
            start: position,
            old_end: position,
            new_end: position + length,
        }
    }

    /// Create a deletion edit
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            old_end: end,
            new_end: start,
        }
    }

    /// Net change in document length
    pub fn delta(&self) -> isize {
        self.new_end as isize - self.old_end as isize
    }

    /// Map an offset through this edit.
    ///
    /// Offsets at or after an insertion point move with the inserted text,
    /// offsets inside a deleted range collapse onto its start.
    pub fn map_offset(&self, offset: usize) -> usize {
        if self.old_end == self.start {
            if offset >= self.start {
                offset + (self.new_end - self.start)
            } else {
                offset
            }
        } else if offset <= self.start {
            offset
        } else if offset < self.old_end {
            self.start
        } else {
            (offset as isize + self.delta()) as usize
        }
    }
}

// ========== Selections ==========

/// A cursor with an optional selection.
///
/// `head` is where the caret is drawn, `anchor` is where the selection started.
/// When `head == anchor` there is no selection, just a cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub head: usize,
    pub anchor: usize,
}

impl Selection {
    /// Create a selection with just a cursor (no selection)
    pub fn cursor(offset: usize) -> Self {
        Self {
            head: offset,
            anchor: offset,
        }
    }

    /// Create a selection with a range
    pub fn new(head: usize, anchor: usize) -> Self {
        Self { head, anchor }
    }

    /// Start position (minimum of head and anchor)
    pub fn start(&self) -> usize {
        self.head.min(self.anchor)
    }

    /// End position (maximum of head and anchor)
    pub fn end(&self) -> usize {
        self.head.max(self.anchor)
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }

    pub fn is_cursor(&self) -> bool {
        self.head == self.anchor
    }

    pub fn has_selection(&self) -> bool {
        self.head != self.anchor
    }

    /// Check if the selection is "reversed" (anchor is after head)
    pub fn is_reversed(&self) -> bool {
        self.anchor > self.head
    }

    /// Build a selection over `start..end` keeping this selection's direction
    pub fn with_range(&self, start: usize, end: usize) -> Self {
        if self.is_reversed() {
            Self::new(start, end)
        } else {
            Self::new(end, start)
        }
    }

    /// Collapse the selection to a cursor at its start position
    pub fn collapse_to_start(&mut self) {
        let start = self.start();
        self.head = start;
        self.anchor = start;
    }

    /// Adjust this selection based on a text edit
    pub fn adjust(&mut self, edit: &TextEdit) {
        self.head = edit.map_offset(self.head);
        self.anchor = edit.map_offset(self.anchor);
    }

    /// Clamp both ends to the document length
    pub fn clamp(&mut self, len: usize) {
        self.head = self.head.min(len);
        self.anchor = self.anchor.min(len);
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_cursor()
    }
}

/// The full cursor state of a document: a primary selection plus any
/// additional disjoint ranges.
///
/// A set with secondary ranges is a "complex" selection, which the
/// single-range editing algorithms refuse to touch.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectionSet {
    primary: Selection,
    secondary: Vec<Selection>,
}

impl SelectionSet {
    pub fn with_cursor(offset: usize) -> Self {
        Self {
            primary: Selection::cursor(offset),
            secondary: Vec::new(),
        }
    }

    pub fn with_selection(head: usize, anchor: usize) -> Self {
        Self {
            primary: Selection::new(head, anchor),
            secondary: Vec::new(),
        }
    }

    pub fn primary(&self) -> Selection {
        self.primary
    }

    pub fn secondary(&self) -> &[Selection] {
        &self.secondary
    }

    /// Add a disjoint range, turning this into a complex selection
    pub fn add_range(&mut self, head: usize, anchor: usize) {
        self.secondary.push(Selection::new(head, anchor));
    }

    pub fn is_complex(&self) -> bool {
        !self.secondary.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Selection> {
        std::iter::once(&mut self.primary).chain(self.secondary.iter_mut())
    }

    /// Adjust every range based on a text edit
    pub fn adjust(&mut self, edit: &TextEdit) {
        for selection in self.iter_mut() {
            selection.adjust(edit);
        }
    }

    pub fn clamp(&mut self, len: usize) {
        for selection in self.iter_mut() {
            selection.clamp(len);
        }
    }
}

impl From<Selection> for SelectionSet {
    fn from(primary: Selection) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }
}

// ========== Input ==========

/// Keyboard modifier set.
///
/// Compared by exact equality when deciding whether a pointer click
/// activates a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
    #[serde(rename = "super")]
    pub super_key: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
        alt: false,
        super_key: false,
    };
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const SUPER: Self = Self {
        super_key: true,
        ..Self::NONE
    };

    /// Combine two modifier sets
    pub const fn union(self, other: Self) -> Self {
        Self {
            control: self.control || other.control,
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
            super_key: self.super_key || other.super_key,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Read the currently held modifiers from Bevy's keyboard state
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            control: keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            shift: keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            alt: keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
            super_key: keys.any_pressed([KeyCode::SuperLeft, KeyCode::SuperRight]),
        }
    }
}

/// A key press delivered to the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// What happened to the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Press,
    Release,
}

/// A pointer event in editor-local coordinates (top-left origin)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn new(kind: PointerKind, position: Vec2, modifiers: Modifiers) -> Self {
        Self {
            kind,
            position,
            modifiers,
        }
    }
}

/// Outcome of offering an input event to the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The editor consumed the event
    Handled,
    /// The event should go to the default text handling unchanged
    PassThrough,
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled)
    }
}

/// Pointer affordance requested by the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerShape {
    /// Text caret (I-beam)
    #[default]
    Text,
    /// Pointing hand, shown over an activatable link
    Link,
}

// ========== Formatting ==========

/// Inline Markdown span kinds that can be toggled around a selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatStyle {
    Emphasized,
    Strong,
    Code,
}

impl FormatStyle {
    pub const ALL: [FormatStyle; 3] = [FormatStyle::Emphasized, FormatStyle::Strong, FormatStyle::Code];
}
