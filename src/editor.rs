//! Markdown editor: routes input to the editing engines
//!
//! [`MarkdownEditor`] owns a [`TextBuffer`] and decides, per event, whether
//! to intercept it (returning [`Dispatch::Handled`]) or hand it unchanged to
//! a [`FallbackHandler`] standing in for the plain text widget. After every
//! event it re-reads the cursor and notifies observers if it moved.

use bevy::prelude::*;
use std::ops::Range;

use crate::anchor::{link_at_offset, AnnotationStore, PointMapper};
use crate::buffer::{RopeBuffer, TextBuffer};
use crate::format::{toggle_format, ToggleOutcome};
use crate::indent::{indent, unindent, IndentPolicy};
use crate::input::EditorAction;
use crate::line_move::{move_lines, MoveDirection};
use crate::settings::{AnchorSettings, CursorLineSettings, EditorSettings, FormattingSettings, SettingsError};
use crate::types::{Dispatch, FormatStyle, KeyInput, PointerInput, PointerKind, PointerShape, Selection, SelectionSet};

/// Something the host should know about
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A link was clicked with the configured modifiers
    LinkActivated(String),
    /// The cursor or selection changed
    CursorChanged(Selection),
}

type Observer = Box<dyn FnMut(&Notification) + Send + Sync>;

/// Background range for the cursor's line
#[derive(Clone, Debug, PartialEq)]
pub struct LineHighlight {
    /// The line's content, without its break
    pub range: Range<usize>,
    pub color: Color,
}

/// Default handling for events the editor does not intercept
pub trait FallbackHandler<B: TextBuffer + ?Sized> {
    fn key(&mut self, _buffer: &mut B, _key: &KeyInput) -> Dispatch {
        Dispatch::PassThrough
    }

    /// `offset` is the document offset under the pointer
    fn pointer(&mut self, _buffer: &mut B, _pointer: &PointerInput, _offset: usize) -> Dispatch {
        Dispatch::PassThrough
    }
}

/// Minimal plain-text behaviour: a press places the caret, and a Tab the
/// editor passed on inserts a tab character.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicTextFallback;

impl<B: TextBuffer + ?Sized> FallbackHandler<B> for BasicTextFallback {
    fn key(&mut self, buffer: &mut B, key: &KeyInput) -> Dispatch {
        if key.key != KeyCode::Tab || !key.modifiers.is_empty() {
            return Dispatch::PassThrough;
        }
        let selection = buffer.selection();
        buffer.begin_edit_group();
        buffer.remove(selection.range());
        buffer.insert(selection.start(), "\t");
        buffer.end_edit_group();
        Dispatch::Handled
    }

    fn pointer(&mut self, buffer: &mut B, pointer: &PointerInput, offset: usize) -> Dispatch {
        match pointer.kind {
            PointerKind::Press => {
                buffer.set_cursor(offset);
                Dispatch::Handled
            }
            PointerKind::Move | PointerKind::Release => Dispatch::PassThrough,
        }
    }
}

/// Markdown-aware editing over a [`TextBuffer`]
pub struct MarkdownEditor<B: TextBuffer = RopeBuffer> {
    buffer: B,
    /// Cached until `apply_settings`
    indent_policy: IndentPolicy,
    /// Cached until `apply_settings`
    formatting: FormattingSettings,
    anchor: AnchorSettings,
    cursor_line: CursorLineSettings,
    pointer_shape: PointerShape,
    line_highlight: Option<LineHighlight>,
    last_selections: SelectionSet,
    last_content_version: u64,
    fallback: Box<dyn FallbackHandler<B> + Send + Sync>,
    observers: Vec<Observer>,
}

impl Default for MarkdownEditor<RopeBuffer> {
    fn default() -> Self {
        Self::new(RopeBuffer::new())
    }
}

impl<B: TextBuffer + 'static> MarkdownEditor<B> {
    pub fn new(buffer: B) -> Self {
        let settings = EditorSettings::default();
        let mut editor = Self {
            last_selections: buffer.selections().clone(),
            last_content_version: buffer.content_version(),
            buffer,
            indent_policy: settings.indentation.policy(),
            formatting: settings.formatting,
            anchor: settings.anchor,
            cursor_line: settings.cursor_line,
            pointer_shape: PointerShape::Text,
            line_highlight: None,
            fallback: Box::new(BasicTextFallback),
            observers: Vec::new(),
        };
        editor.line_highlight = editor.compute_line_highlight();
        editor
    }

    pub fn with_settings(buffer: B, settings: &EditorSettings) -> Result<Self, SettingsError> {
        let mut editor = Self::new(buffer);
        editor.apply_settings(settings)?;
        Ok(editor)
    }
}

impl<B: TextBuffer> MarkdownEditor<B> {
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Direct buffer access. Call [`refresh`](Self::refresh) afterwards if the
    /// cursor may have moved.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Replace the configuration. Indent and delimiter strings only change here.
    pub fn apply_settings(&mut self, settings: &EditorSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.indent_policy = settings.indentation.policy();
        self.formatting = settings.formatting.clone();
        self.anchor = settings.anchor.clone();
        self.cursor_line = settings.cursor_line.clone();
        self.line_highlight = self.compute_line_highlight();
        debug!("editor settings applied: indent {:?}", self.indent_policy.indent_string);
        Ok(())
    }

    /// Use a custom indent string rather than one derived from settings
    pub fn set_indent_policy(&mut self, policy: IndentPolicy) {
        self.indent_policy = policy;
    }

    pub fn indent_policy(&self) -> &IndentPolicy {
        &self.indent_policy
    }

    pub fn delimiter(&self, style: FormatStyle) -> &str {
        self.formatting.delimiter(style)
    }

    pub fn set_fallback(&mut self, fallback: impl FallbackHandler<B> + Send + Sync + 'static) {
        self.fallback = Box::new(fallback);
    }

    /// Register a callback for [`Notification`]s
    pub fn add_observer(&mut self, observer: impl FnMut(&Notification) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn pointer_shape(&self) -> PointerShape {
        self.pointer_shape
    }

    /// The cursor line's highlight, `None` on an empty line or when disabled
    pub fn current_line_highlight(&self) -> Option<LineHighlight> {
        self.line_highlight.clone()
    }

    /// Offer a key press to the editor. Keys it does not act on go to the fallback.
    pub fn handle_key(&mut self, key: KeyInput) -> Dispatch {
        let dispatch = match EditorAction::from_key(&key) {
            Some(action) => self.run_action(action),
            None => Dispatch::PassThrough,
        };
        let dispatch = match dispatch {
            Dispatch::Handled => Dispatch::Handled,
            Dispatch::PassThrough => self.fallback.key(&mut self.buffer, &key),
        };
        self.refresh();
        dispatch
    }

    /// Run a bound action. If the editor declines it, the fallback sees the
    /// action's default key.
    pub fn execute_action(&mut self, action: EditorAction) -> Dispatch {
        let dispatch = match self.run_action(action) {
            Dispatch::Handled => Dispatch::Handled,
            Dispatch::PassThrough => self.fallback.key(&mut self.buffer, &action.default_key()),
        };
        self.refresh();
        dispatch
    }

    fn run_action(&mut self, action: EditorAction) -> Dispatch {
        match action {
            EditorAction::Indent => indent(&mut self.buffer, &self.indent_policy),
            EditorAction::Unindent => unindent(&mut self.buffer, &self.indent_policy),
            EditorAction::MoveLinesUp => move_lines(&mut self.buffer, MoveDirection::Up),
            EditorAction::MoveLinesDown => move_lines(&mut self.buffer, MoveDirection::Down),
            EditorAction::ToggleEmphasis | EditorAction::ToggleStrong | EditorAction::ToggleCode => {
                if let Some(style) = action.format_style() {
                    self.toggle(style);
                }
                Dispatch::Handled
            }
            EditorAction::Undo => {
                if !self.buffer.undo() {
                    trace!("nothing to undo");
                }
                Dispatch::Handled
            }
            EditorAction::Redo => {
                if !self.buffer.redo() {
                    trace!("nothing to redo");
                }
                Dispatch::Handled
            }
        }
    }

    fn toggle(&mut self, style: FormatStyle) -> ToggleOutcome {
        toggle_format(&mut self.buffer, self.formatting.delimiter(style))
    }

    /// Wrap or unwrap the selection (or the word under the cursor) in the
    /// delimiter configured for `style`
    pub fn toggle_format(&mut self, style: FormatStyle) -> ToggleOutcome {
        let outcome = self.toggle(style);
        self.refresh();
        outcome
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.buffer.undo();
        self.refresh();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.buffer.redo();
        self.refresh();
        redone
    }

    /// Offer a pointer event to the editor.
    ///
    /// Links react only when the held modifiers equal the configured set
    /// exactly: hovering shows the link shape, pressing does not move the
    /// caret, and releasing activates the link.
    pub fn handle_pointer(
        &mut self,
        pointer: PointerInput,
        mapper: &dyn PointMapper,
        annotations: &dyn AnnotationStore,
    ) -> Dispatch {
        let offset = mapper.offset_at(&self.buffer, pointer.position);
        let link = if pointer.modifiers == self.anchor.click_modifiers {
            link_at_offset(&self.buffer, annotations, offset)
        } else {
            None
        };

        let dispatch = match (pointer.kind, link) {
            (PointerKind::Move, link) => {
                self.pointer_shape = if link.is_some() {
                    PointerShape::Link
                } else {
                    PointerShape::Text
                };
                self.fallback.pointer(&mut self.buffer, &pointer, offset)
            }
            (PointerKind::Press, Some(_)) => Dispatch::Handled,
            (PointerKind::Release, Some(target)) => {
                debug!("link activated at {}: {}", offset, target);
                let notification = Notification::LinkActivated(target.to_string());
                self.notify(&notification);
                Dispatch::Handled
            }
            (_, None) => self.fallback.pointer(&mut self.buffer, &pointer, offset),
        };
        self.refresh();
        dispatch
    }

    /// Link target to show as a tooltip at `point`, regardless of modifiers
    pub fn tooltip_at(
        &self,
        point: Vec2,
        mapper: &dyn PointMapper,
        annotations: &dyn AnnotationStore,
    ) -> Option<String> {
        if !self.anchor.show_tooltips {
            return None;
        }
        let offset = mapper.offset_at(&self.buffer, point);
        link_at_offset(&self.buffer, annotations, offset).map(str::to_string)
    }

    /// Re-read the cursor and text. The line highlight is recomputed when
    /// either changed; observers hear only about cursor changes.
    pub fn refresh(&mut self) {
        let cursor_moved = *self.buffer.selections() != self.last_selections;
        let text_changed = self.buffer.content_version() != self.last_content_version;
        if !cursor_moved && !text_changed {
            return;
        }
        self.last_content_version = self.buffer.content_version();
        self.line_highlight = self.compute_line_highlight();

        if cursor_moved {
            self.last_selections = self.buffer.selections().clone();
            let notification = Notification::CursorChanged(self.buffer.selection());
            self.notify(&notification);
        }
    }

    fn compute_line_highlight(&self) -> Option<LineHighlight> {
        if !self.cursor_line.enabled {
            return None;
        }
        let head = self.buffer.selection().head;
        let start = self.buffer.line_start_at(head);
        let len = self.buffer.line_content_len_at(head);
        (len > 0).then(|| LineHighlight {
            range: start..start + len,
            color: self.cursor_line.color(),
        })
    }

    fn notify(&mut self, notification: &Notification) {
        for observer in &mut self.observers {
            observer(notification);
        }
    }
}
