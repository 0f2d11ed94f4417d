//! Link (anchor) interaction settings

use serde::{Deserialize, Serialize};

use crate::types::Modifiers;

/// How links in the text react to the pointer
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorSettings {
    /// Modifiers that must be held, exactly, for a click to open a link
    pub click_modifiers: Modifiers,

    /// Report link targets for tooltips when hovering
    pub show_tooltips: bool,
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            click_modifiers: Modifiers::CONTROL,
            show_tooltips: true,
        }
    }
}
