//! Text layout metrics used to map pointer positions to document offsets

use serde::{Deserialize, Serialize};

/// Monospace layout metrics of the host's text view
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Character width in pixels
    pub char_width: f32,

    /// Line height in pixels
    pub line_height: f32,

    /// Left margin (pixels) - space between the view edge and the text
    pub margin_left: f32,

    /// Top margin (pixels)
    pub margin_top: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let size = 14.0;
        Self {
            char_width: size * 0.6,
            line_height: size * 1.5,
            margin_left: 10.0,
            margin_top: 10.0,
        }
    }
}
