use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::types::{FormatStyle, KeyInput, Modifiers};

/// Create the default input map with all keybindings
pub fn default_input_map() -> InputMap<EditorAction> {
    let mut input_map = InputMap::default();

    // Indentation
    input_map.insert(EditorAction::Indent, KeyCode::Tab);
    input_map.insert(EditorAction::Unindent, ButtonlikeChord::new([KeyCode::ShiftLeft, KeyCode::Tab]));

    // Line reordering
    input_map.insert(EditorAction::MoveLinesUp, ButtonlikeChord::new([KeyCode::AltLeft, KeyCode::ArrowUp]));
    input_map.insert(EditorAction::MoveLinesDown, ButtonlikeChord::new([KeyCode::AltLeft, KeyCode::ArrowDown]));

    // Inline formatting
    input_map.insert(EditorAction::ToggleEmphasis, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyI]));
    input_map.insert(EditorAction::ToggleStrong, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyB]));
    input_map.insert(EditorAction::ToggleCode, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyD]));

    // Undo/Redo
    input_map.insert(EditorAction::Undo, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyZ]));
    input_map.insert(EditorAction::Redo, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyY]));
    input_map.insert(EditorAction::Redo, ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyZ]));

    input_map
}

/// Editor action that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Actionlike)]
pub enum EditorAction {
    /// Indent at the cursor, or every line of a full-line selection (Tab)
    Indent,
    /// Remove one indent level (Shift+Tab)
    Unindent,
    /// Swap the selected lines with the line above (Alt+Up)
    MoveLinesUp,
    /// Swap the selected lines with the line below (Alt+Down)
    MoveLinesDown,
    /// Toggle emphasis around the selection or word (Ctrl+I)
    ToggleEmphasis,
    /// Toggle strong around the selection or word (Ctrl+B)
    ToggleStrong,
    /// Toggle inline code around the selection or word (Ctrl+D)
    ToggleCode,
    Undo,
    Redo,
}

impl EditorAction {
    /// All actions, in the order the keyboard system checks them
    pub const ALL: [EditorAction; 9] = [
        EditorAction::Indent,
        EditorAction::Unindent,
        EditorAction::MoveLinesUp,
        EditorAction::MoveLinesDown,
        EditorAction::ToggleEmphasis,
        EditorAction::ToggleStrong,
        EditorAction::ToggleCode,
        EditorAction::Undo,
        EditorAction::Redo,
    ];

    /// Returns true if this action should repeat when the key is held down
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            EditorAction::Indent
                | EditorAction::Unindent
                | EditorAction::MoveLinesUp
                | EditorAction::MoveLinesDown
                | EditorAction::Undo
                | EditorAction::Redo
        )
    }

    /// The span style this action toggles, if it is a formatting action
    pub fn format_style(&self) -> Option<FormatStyle> {
        match self {
            EditorAction::ToggleEmphasis => Some(FormatStyle::Emphasized),
            EditorAction::ToggleStrong => Some(FormatStyle::Strong),
            EditorAction::ToggleCode => Some(FormatStyle::Code),
            _ => None,
        }
    }

    /// The key press this action is bound to in [`default_input_map`]
    pub fn default_key(&self) -> KeyInput {
        let ctrl = Modifiers::CONTROL;
        match self {
            EditorAction::Indent => KeyInput::plain(KeyCode::Tab),
            EditorAction::Unindent => KeyInput::new(KeyCode::Tab, Modifiers::SHIFT),
            EditorAction::MoveLinesUp => KeyInput::new(KeyCode::ArrowUp, Modifiers::ALT),
            EditorAction::MoveLinesDown => KeyInput::new(KeyCode::ArrowDown, Modifiers::ALT),
            EditorAction::ToggleEmphasis => KeyInput::new(KeyCode::KeyI, ctrl),
            EditorAction::ToggleStrong => KeyInput::new(KeyCode::KeyB, ctrl),
            EditorAction::ToggleCode => KeyInput::new(KeyCode::KeyD, ctrl),
            EditorAction::Undo => KeyInput::new(KeyCode::KeyZ, ctrl),
            EditorAction::Redo => KeyInput::new(KeyCode::KeyY, ctrl),
        }
    }

    /// Resolve a raw key press against the default bindings.
    ///
    /// Modifiers must match exactly, so Ctrl+Shift+B is not strong.
    pub fn from_key(key: &KeyInput) -> Option<Self> {
        // Redo has a second binding
        if *key == KeyInput::new(KeyCode::KeyZ, Modifiers::CONTROL.union(Modifiers::SHIFT)) {
            return Some(EditorAction::Redo);
        }
        Self::ALL.into_iter().find(|action| action.default_key() == *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_resolves_default_bindings() {
        for action in EditorAction::ALL {
            assert_eq!(EditorAction::from_key(&action.default_key()), Some(action));
        }
        let ctrl_shift_z = KeyInput::new(KeyCode::KeyZ, Modifiers::CONTROL.union(Modifiers::SHIFT));
        assert_eq!(EditorAction::from_key(&ctrl_shift_z), Some(EditorAction::Redo));
    }

    #[test]
    fn test_from_key_requires_exact_modifiers() {
        let ctrl_shift_b = KeyInput::new(KeyCode::KeyB, Modifiers::CONTROL.union(Modifiers::SHIFT));
        assert_eq!(EditorAction::from_key(&ctrl_shift_b), None);
        assert_eq!(EditorAction::from_key(&KeyInput::plain(KeyCode::ArrowUp)), None);
    }

    #[test]
    fn test_format_style() {
        assert_eq!(EditorAction::ToggleStrong.format_style(), Some(FormatStyle::Strong));
        assert_eq!(EditorAction::Indent.format_style(), None);
    }
}
