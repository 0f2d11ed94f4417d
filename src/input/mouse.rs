use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::anchor::MonospacePointMapper;
use crate::events::LinkTooltip;
use crate::plugin::MarkdownEditorState;
use crate::settings::EditorSettings;
use crate::types::{Modifiers, PointerInput, PointerKind};

/// Pointer state from the previous frame
#[derive(Resource, Default)]
pub struct PointerTracker {
    pub last_position: Option<Vec2>,
    pub last_modifiers: Modifiers,
    /// Link target last reported through [`LinkTooltip`]
    pub last_tooltip: Option<String>,
}

/// System to forward pointer moves and left-button clicks to the editor
pub fn handle_pointer_input(
    mut state: ResMut<MarkdownEditorState>,
    mut tracker: ResMut<PointerTracker>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    settings: Res<EditorSettings>,
    mut tooltips: MessageWriter<LinkTooltip>,
) {
    // cursor_position() is top-left origin, matching the point mapper
    let Some(position) = window_query.iter().next().and_then(|window| window.cursor_position()) else {
        return;
    };
    let modifiers = Modifiers::from_keys(&keyboard_input);
    let mapper = MonospacePointMapper::from(&settings.layout);
    let state = &mut *state;

    let moved = tracker.last_position != Some(position) || tracker.last_modifiers != modifiers;
    let mut kinds = Vec::with_capacity(3);
    if moved {
        kinds.push(PointerKind::Move);
    }
    if mouse_button.just_pressed(MouseButton::Left) {
        kinds.push(PointerKind::Press);
    }
    if mouse_button.just_released(MouseButton::Left) {
        kinds.push(PointerKind::Release);
    }

    for kind in kinds {
        let pointer = PointerInput::new(kind, position, modifiers);
        state.editor.handle_pointer(pointer, &mapper, &state.annotations);
    }

    tracker.last_position = Some(position);
    tracker.last_modifiers = modifiers;

    if moved {
        let tooltip = state.editor.tooltip_at(position, &mapper, &state.annotations);
        if tooltip != tracker.last_tooltip {
            tooltips.write(LinkTooltip {
                target: tooltip.clone(),
                position,
            });
            tracker.last_tooltip = tooltip;
        }
    }
}
