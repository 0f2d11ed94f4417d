//! Editor settings
//!
//! Each concern has its own settings struct, composed into the
//! [`EditorSettings`] resource. Use [`EditorSettingsBuilder`] for convenient
//! initialization.

mod anchor;
mod cursor;
mod formatting;
mod indentation;
mod layout;

pub use anchor::*;
pub use cursor::*;
pub use formatting::*;
pub use indentation::*;
pub use layout::*;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FormatStyle;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("delimiter for {0:?} must not be empty")]
    EmptyDelimiter(FormatStyle),

    #[error("delimiter for {0:?} must not contain a line break")]
    DelimiterLineBreak(FormatStyle),

    #[error("indent string must be a tab or one or more spaces, got {0:?}")]
    InvalidIndentString(String),

    #[error("tab width must be at least 1")]
    ZeroTabWidth,
}

/// All editor configuration, inserted as a single resource by the plugin.
///
/// Changing this resource at runtime re-applies it to the editor.
#[derive(Clone, Debug, Default, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub indentation: IndentationSettings,
    pub formatting: FormattingSettings,
    pub anchor: AnchorSettings,
    pub cursor_line: CursorLineSettings,
    pub key_repeat: KeyRepeatSettings,
    pub layout: LayoutSettings,
}

impl EditorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.indentation.validate()?;
        self.formatting.validate()?;
        Ok(())
    }
}

/// Builder for configuring all editor settings at once
///
/// # Example
/// ```no_run
/// use bevy_markdown_editor::settings::EditorSettingsBuilder;
///
/// let settings = EditorSettingsBuilder::default()
///     .tab_width(2)
///     .emphasis_with_underscores(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct EditorSettingsBuilder {
    settings: EditorSettings,
}

impl EditorSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Indentation
    pub fn use_tabs(mut self, use_tabs: bool) -> Self {
        self.settings.indentation.use_tabs = use_tabs;
        self
    }

    pub fn tab_width(mut self, width: usize) -> Self {
        self.settings.indentation.tab_width = width;
        self
    }

    pub fn indent_width_hint(mut self, hint: usize) -> Self {
        self.settings.indentation.indent_width_hint = Some(hint);
        self
    }

    // Formatting
    pub fn emphasis_with_underscores(mut self, underscores: bool) -> Self {
        self.settings.formatting.set_emphasis_with_underscores(underscores);
        self
    }

    pub fn strong_with_underscores(mut self, underscores: bool) -> Self {
        self.settings.formatting.set_strong_with_underscores(underscores);
        self
    }

    // Links
    pub fn link_click_modifiers(mut self, modifiers: crate::types::Modifiers) -> Self {
        self.settings.anchor.click_modifiers = modifiers;
        self
    }

    // Custom settings
    pub fn indentation(mut self, indentation: IndentationSettings) -> Self {
        self.settings.indentation = indentation;
        self
    }

    pub fn formatting(mut self, formatting: FormattingSettings) -> Self {
        self.settings.formatting = formatting;
        self
    }

    pub fn anchor(mut self, anchor: AnchorSettings) -> Self {
        self.settings.anchor = anchor;
        self
    }

    pub fn cursor_line(mut self, cursor_line: CursorLineSettings) -> Self {
        self.settings.cursor_line = cursor_line;
        self
    }

    pub fn key_repeat(mut self, key_repeat: KeyRepeatSettings) -> Self {
        self.settings.key_repeat = key_repeat;
        self
    }

    pub fn layout(mut self, layout: LayoutSettings) -> Self {
        self.settings.layout = layout;
        self
    }

    /// Validate and return the settings resource
    pub fn build(self) -> Result<EditorSettings, SettingsError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Modifiers;

    #[test]
    fn test_builder_applies_overrides() {
        let settings = EditorSettingsBuilder::new()
            .use_tabs(true)
            .strong_with_underscores(true)
            .link_click_modifiers(Modifiers::ALT)
            .build()
            .unwrap();
        assert!(settings.indentation.use_tabs);
        assert_eq!(settings.formatting.delimiter(FormatStyle::Strong), "__");
        assert_eq!(settings.anchor.click_modifiers, Modifiers::ALT);
    }

    #[test]
    fn test_builder_rejects_zero_tab_width() {
        let result = EditorSettingsBuilder::new().tab_width(0).build();
        assert_eq!(result.unwrap_err(), SettingsError::ZeroTabWidth);
    }

    #[test]
    fn test_partial_settings_deserialize() {
        let json = r#"{ "indentation": { "use_tabs": true }, "anchor": { "click_modifiers": { "alt": true } } }"#;
        let settings: EditorSettings = serde_json::from_str(json).unwrap();
        assert!(settings.indentation.use_tabs);
        assert_eq!(settings.indentation.tab_width, 4);
        assert_eq!(settings.anchor.click_modifiers, Modifiers::ALT);
        assert!(settings.anchor.show_tooltips);
        assert_eq!(settings.formatting.delimiter(FormatStyle::Code), "`");
        assert_eq!(settings.key_repeat.initial_delay_ms, 500);
    }
}
