//! Bevy plugin wiring the markdown editor into an app
//!
//! The plugin owns one [`MarkdownEditor`] in [`MarkdownEditorState`], feeds it
//! keyboard actions and pointer events, and turns its notifications into
//! messages. Rendering is left to the host.

use bevy::prelude::*;
use crossbeam_channel::Receiver;
use leafwing_input_manager::prelude::{ActionState, InputManagerPlugin, InputMap};

use crate::anchor::LineAnnotations;
use crate::buffer::{RopeBuffer, TextBuffer};
use crate::editor::{MarkdownEditor, Notification};
use crate::events::{SelectionChanged, LinkActivated, LinkTooltip};
use crate::input::{EditorAction, KeyRepeatState, PointerTracker};
use crate::settings::EditorSettings;

/// Markdown editor plugin
pub struct MarkdownEditorPlugin {
    settings: EditorSettings,
    input_map: InputMap<EditorAction>,
}

impl MarkdownEditorPlugin {
    /// Create a new markdown editor plugin with the given input map
    ///
    /// # Example
    /// ```ignore
    /// use bevy::prelude::*;
    /// use bevy_markdown_editor::prelude::*;
    ///
    /// let input_map = default_input_map()
    ///     .with(EditorAction::ToggleStrong, ButtonlikeChord::new([KeyCode::SuperLeft, KeyCode::KeyB]));
    ///
    /// App::new()
    ///     .add_plugins(DefaultPlugins)
    ///     .add_plugins(MarkdownEditorPlugin::new(input_map))
    ///     .run();
    /// ```
    pub fn new(input_map: InputMap<EditorAction>) -> Self {
        Self {
            settings: EditorSettings::default(),
            input_map,
        }
    }

    /// Set custom editor settings
    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Default for MarkdownEditorPlugin {
    fn default() -> Self {
        Self::new(crate::input::default_input_map())
    }
}

/// Resource to hold the configured input map until it's spawned
#[derive(Resource)]
struct PendingInputMap(InputMap<EditorAction>);

impl Plugin for MarkdownEditorPlugin {
    fn build(&self, app: &mut App) {
        let (settings, editor) = match MarkdownEditor::with_settings(RopeBuffer::new(), &self.settings) {
            Ok(editor) => (self.settings.clone(), editor),
            Err(err) => {
                warn!("Invalid editor settings ({}), using defaults", err);
                (EditorSettings::default(), MarkdownEditor::default())
            }
        };

        app.insert_resource(settings);
        app.insert_resource(MarkdownEditorState::from_editor(editor));
        app.insert_resource(PointerTracker::default());
        app.insert_resource(KeyRepeatState::default());

        // Store the configured input map for the spawn system
        app.insert_resource(PendingInputMap(self.input_map.clone()));

        // Register leafwing-input-manager plugin for action-based input
        app.add_plugins(InputManagerPlugin::<EditorAction>::default());

        // Users can query and modify the InputMap component to customize bindings at runtime
        app.add_systems(Startup, spawn_input_manager);

        // Messages for the host application
        app.add_message::<LinkActivated>();
        app.add_message::<SelectionChanged>();
        app.add_message::<LinkTooltip>();

        app.add_systems(
            Update,
            (
                apply_settings_changes,
                crate::input::handle_keyboard_input,
                crate::input::handle_pointer_input,
                forward_notifications,
            )
                .chain(),
        );
    }
}

/// Marker component for the editor's input manager entity
#[derive(Component)]
pub struct EditorInputManager;

/// Spawn the input manager entity with configured keybindings
fn spawn_input_manager(mut commands: Commands, pending: Res<PendingInputMap>) {
    commands.spawn((
        EditorInputManager,
        pending.0.clone(),
        ActionState::<EditorAction>::default(),
        Name::new("EditorInputManager"),
    ));
}

/// The editor instance and the annotations it hit-tests links against
#[derive(Resource)]
pub struct MarkdownEditorState {
    pub editor: MarkdownEditor<RopeBuffer>,
    /// Link ranges per line, kept up to date by the host's highlighter
    pub annotations: LineAnnotations,
    /// Keyboard actions only run while focused
    pub is_focused: bool,
    notifications: Receiver<Notification>,
}

impl Default for MarkdownEditorState {
    fn default() -> Self {
        Self::from_editor(MarkdownEditor::default())
    }
}

impl MarkdownEditorState {
    pub fn from_editor(mut editor: MarkdownEditor<RopeBuffer>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        editor.add_observer(move |notification| {
            // The receiver lives as long as this resource
            let _ = tx.send(notification.clone());
        });
        Self {
            editor,
            annotations: LineAnnotations::new(),
            is_focused: true,
            notifications: rx,
        }
    }

    /// Replace the document, dropping history and annotations
    pub fn set_text(&mut self, text: &str) {
        self.editor.buffer_mut().set_text(text);
        self.annotations.clear();
        self.editor.refresh();
    }

    pub fn text(&self) -> String {
        self.editor.buffer().text()
    }

    /// Notifications raised since the last call
    pub fn drain_notifications(&self) -> impl Iterator<Item = Notification> + '_ {
        self.notifications.try_iter()
    }
}

/// Re-apply settings when the resource changes
fn apply_settings_changes(settings: Res<EditorSettings>, mut state: ResMut<MarkdownEditorState>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    if let Err(err) = state.editor.apply_settings(&settings) {
        warn!("Ignoring invalid editor settings: {}", err);
    }
}

/// Turn editor notifications into messages
fn forward_notifications(
    state: Res<MarkdownEditorState>,
    mut links: MessageWriter<LinkActivated>,
    mut selection_changes: MessageWriter<SelectionChanged>,
) {
    for notification in state.drain_notifications() {
        match notification {
            Notification::LinkActivated(target) => {
                links.write(LinkActivated { target });
            }
            Notification::CursorChanged(selection) => {
                selection_changes.write(SelectionChanged { selection });
            }
        }
    }
}
