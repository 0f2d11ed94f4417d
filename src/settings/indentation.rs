//! Indentation settings

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::indent::IndentPolicy;

/// Indentation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentationSettings {
    /// Indent with a tab character instead of spaces
    pub use_tabs: bool,

    /// Tab width in characters; also the number of spaces in one indent level
    pub tab_width: usize,

    /// Column width used to guess how many leading spaces one unindent removes.
    /// Falls back to `tab_width` when unset.
    pub indent_width_hint: Option<usize>,
}

impl Default for IndentationSettings {
    fn default() -> Self {
        Self {
            use_tabs: false,
            tab_width: 4,
            indent_width_hint: None,
        }
    }
}

impl IndentationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tab_width == 0 {
            return Err(SettingsError::ZeroTabWidth);
        }
        Ok(())
    }

    /// The indent policy these settings describe
    pub fn policy(&self) -> IndentPolicy {
        let indent_string = if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.tab_width.max(1))
        };
        IndentPolicy {
            indent_string,
            spaces_indent_width_hint: self.indent_width_hint.unwrap_or(self.tab_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_policy() {
        let policy = IndentationSettings::default().policy();
        assert_eq!(policy.indent_string, "    ");
        assert_eq!(policy.spaces_indent_width_hint, 4);
    }

    #[test]
    fn test_tabs_policy_keeps_width_hint() {
        let settings = IndentationSettings {
            use_tabs: true,
            tab_width: 8,
            indent_width_hint: None,
        };
        let policy = settings.policy();
        assert_eq!(policy.indent_string, "\t");
        assert_eq!(policy.spaces_indent_width_hint, 8);
    }

    #[test]
    fn test_zero_tab_width_is_rejected() {
        let settings = IndentationSettings {
            tab_width: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::ZeroTabWidth)));
    }
}
