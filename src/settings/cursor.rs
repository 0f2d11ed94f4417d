//! Cursor line highlighting and key repeat settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current-line highlighting
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorLineSettings {
    /// Enable cursor line highlighting
    pub enabled: bool,

    /// Background color as linear sRGBA components
    pub color: [f32; 4],
}

impl Default for CursorLineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [0.94, 0.94, 0.78, 1.0],
        }
    }
}

impl CursorLineSettings {
    pub fn color(&self) -> Color {
        let [r, g, b, a] = self.color;
        Color::srgba(r, g, b, a)
    }
}

/// Repeat timing for held editing actions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRepeatSettings {
    /// Initial delay before repeat starts (milliseconds)
    pub initial_delay_ms: u64,

    /// Delay between repeats (milliseconds)
    pub repeat_delay_ms: u64,
}

impl Default for KeyRepeatSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            repeat_delay_ms: 50,
        }
    }
}

impl KeyRepeatSettings {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_delay_ms)
    }
}
