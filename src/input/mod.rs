//! Input handling for the markdown editor
//!
//! Keyboard input goes through leafwing-input-manager actions; pointer input
//! is read from the primary window and mapped to document offsets.

mod keybindings;
mod keyboard;
mod mouse;

// Re-export public types
pub use keybindings::{default_input_map, EditorAction};
pub use keyboard::{handle_keyboard_input, KeyRepeatState};
pub use mouse::{handle_pointer_input, PointerTracker};

// Re-export leafwing types for user customization
pub use leafwing_input_manager::prelude::{ActionState, Actionlike, ButtonlikeChord, InputMap};
