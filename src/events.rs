//! Editor messages for the host application

use bevy::prelude::*;

use crate::types::Selection;

/// A link was clicked with the configured modifiers held.
///
/// The editor never opens links itself; the host decides what to do.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct LinkActivated {
    pub target: String,
}

/// The primary cursor or selection changed
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChanged {
    pub selection: Selection,
}

/// The link under the pointer changed.
///
/// `target` is `None` when the pointer left a link and any tooltip should hide.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct LinkTooltip {
    pub target: Option<String>,
    /// Window position of the pointer
    pub position: Vec2,
}
