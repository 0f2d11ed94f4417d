use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use std::time::Instant;

use super::keybindings::EditorAction;
use crate::plugin::{EditorInputManager, MarkdownEditorState};
use crate::settings::{EditorSettings, KeyRepeatSettings};

/// Resource to track key repeat state for editor actions
#[derive(Resource, Default, Debug)]
pub struct KeyRepeatState {
    /// The action currently being repeated (if any)
    pub current_action: Option<EditorAction>,
    /// When the action key was first pressed
    pub press_start: Option<Instant>,
    /// When the last repeat occurred
    pub last_repeat: Option<Instant>,
}

impl KeyRepeatState {
    /// Pick the action to run this frame.
    ///
    /// A fresh press always wins and, if repeatable, starts tracking. Otherwise
    /// the tracked action fires once the initial delay has passed and then
    /// every repeat delay, for as long as `is_held` reports it held.
    pub fn next_action(
        &mut self,
        just_pressed: Option<EditorAction>,
        is_held: impl Fn(&EditorAction) -> bool,
        now: Instant,
        settings: &KeyRepeatSettings,
    ) -> Option<EditorAction> {
        if let Some(action) = just_pressed {
            if action.is_repeatable() {
                self.current_action = Some(action);
                self.press_start = Some(now);
                self.last_repeat = None;
            } else {
                self.reset();
            }
            return Some(action);
        }

        let action = self.current_action?;
        if !is_held(&action) {
            // Key was released
            self.reset();
            return None;
        }

        let press_start = self.press_start?;
        if now.duration_since(press_start) < settings.initial_delay() {
            return None;
        }
        let should_repeat = match self.last_repeat {
            Some(last) => now.duration_since(last) >= settings.repeat_delay(),
            None => true,
        };
        if !should_repeat {
            return None;
        }
        self.last_repeat = Some(now);
        Some(action)
    }

    pub fn reset(&mut self) {
        self.current_action = None;
        self.press_start = None;
        self.last_repeat = None;
    }
}

/// System to run bound editor actions using leafwing-input-manager
pub fn handle_keyboard_input(
    mut state: ResMut<MarkdownEditorState>,
    action_query: Query<&ActionState<EditorAction>, With<EditorInputManager>>,
    settings: Res<EditorSettings>,
    mut key_repeat_state: ResMut<KeyRepeatState>,
) {
    // Only process input if editor is focused
    if !state.is_focused {
        key_repeat_state.reset();
        return;
    }

    let Ok(action_state) = action_query.single() else {
        warn!("No EditorInputManager entity found with ActionState");
        return;
    };

    // One action per frame; chords win over their plain keys via the clash strategy
    let just_pressed = EditorAction::ALL
        .into_iter()
        .find(|action| action_state.just_pressed(action));

    let Some(action) = key_repeat_state.next_action(
        just_pressed,
        |action| action_state.pressed(action),
        Instant::now(),
        &settings.key_repeat,
    ) else {
        return;
    };

    let dispatch = state.editor.execute_action(action);
    if !dispatch.is_handled() {
        trace!("{:?} left to the host", action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn test_held_action_repeats_after_initial_delay() {
        let settings = KeyRepeatSettings::default();
        let mut repeat = KeyRepeatState::default();
        let start = Instant::now();
        let held = |_: &EditorAction| true;

        let pressed = Some(EditorAction::MoveLinesDown);
        assert_eq!(repeat.next_action(pressed, held, start, &settings), pressed);
        assert_eq!(repeat.next_action(None, held, ms(start, 100), &settings), None);
        assert_eq!(repeat.next_action(None, held, ms(start, 500), &settings), pressed);
        assert_eq!(repeat.next_action(None, held, ms(start, 520), &settings), None);
        assert_eq!(repeat.next_action(None, held, ms(start, 550), &settings), pressed);
    }

    #[test]
    fn test_release_stops_repeat() {
        let settings = KeyRepeatSettings::default();
        let mut repeat = KeyRepeatState::default();
        let start = Instant::now();

        repeat.next_action(Some(EditorAction::Indent), |_| true, start, &settings);
        assert_eq!(repeat.next_action(None, |_| false, ms(start, 600), &settings), None);
        assert_eq!(repeat.current_action, None);
        assert_eq!(repeat.next_action(None, |_| true, ms(start, 700), &settings), None);
    }

    #[test]
    fn test_formatting_actions_do_not_repeat() {
        let settings = KeyRepeatSettings::default();
        let mut repeat = KeyRepeatState::default();
        let start = Instant::now();

        let pressed = Some(EditorAction::ToggleStrong);
        assert_eq!(repeat.next_action(pressed, |_| true, start, &settings), pressed);
        assert_eq!(repeat.next_action(None, |_| true, ms(start, 1000), &settings), None);
    }
}
