//! # Bevy Markdown Editor
//!
//! Markdown-aware editing for Bevy: smart indentation, moving lines,
//! emphasis/strong/code toggling and clickable links, on top of a plain
//! text buffer.
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_markdown_editor::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(MarkdownEditorPlugin::default())
//!         .add_systems(Update, open_links)
//!         .run();
//! }
//!
//! fn open_links(mut links: MessageReader<LinkActivated>) {
//!     for link in links.read() {
//!         info!("open {}", link.target);
//!     }
//! }
//! ```
//!
//! ## Without Bevy's app loop
//!
//! The editing engines work on any [`buffer::TextBuffer`]:
//!
//! ```rust
//! use bevy_markdown_editor::prelude::*;
//!
//! let mut editor = MarkdownEditor::new(RopeBuffer::from_text("A\nB\nC\n"));
//! editor.buffer_mut().set_cursor(2);
//! editor.execute_action(EditorAction::MoveLinesUp);
//! assert_eq!(editor.buffer().text(), "B\nA\nC\n");
//! ```

pub mod anchor;
pub mod buffer;
pub mod editor;
pub mod events;
pub mod format;
pub mod geometry;
pub mod indent;
pub mod input;
pub mod line_move;
pub mod plugin;
pub mod settings;
pub mod types;

pub mod prelude {
    //! Convenient re-exports for common usage
    pub use crate::anchor::{AnnotationStore, FormatRange, LineAnnotations, MonospacePointMapper, PointMapper};
    pub use crate::buffer::{RopeBuffer, TextBuffer};
    pub use crate::editor::{BasicTextFallback, FallbackHandler, LineHighlight, MarkdownEditor, Notification};
    pub use crate::events::*;
    pub use crate::format::ToggleOutcome;
    pub use crate::indent::IndentPolicy;
    pub use crate::input::*;
    pub use crate::line_move::MoveDirection;
    pub use crate::plugin::{EditorInputManager, MarkdownEditorPlugin, MarkdownEditorState};
    pub use crate::settings::*;
    pub use crate::types::*;
}
