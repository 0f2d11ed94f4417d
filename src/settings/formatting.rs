//! Inline formatting delimiters

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::types::FormatStyle;

/// Delimiter strings wrapped around a span for each [`FormatStyle`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingSettings {
    emphasized: String,
    strong: String,
    code: String,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            emphasized: "*".to_string(),
            strong: "**".to_string(),
            code: "`".to_string(),
        }
    }
}

impl FormattingSettings {
    /// The delimiter for `style`
    pub fn delimiter(&self, style: FormatStyle) -> &str {
        match style {
            FormatStyle::Emphasized => &self.emphasized,
            FormatStyle::Strong => &self.strong,
            FormatStyle::Code => &self.code,
        }
    }

    /// Set the delimiter for `style`. Rejects empty strings and line breaks.
    pub fn set_delimiter(&mut self, style: FormatStyle, delimiter: impl Into<String>) -> Result<(), SettingsError> {
        let delimiter = delimiter.into();
        validate_delimiter(style, &delimiter)?;
        *self.slot_mut(style) = delimiter;
        Ok(())
    }

    /// `_` instead of `*` for emphasis
    pub fn set_emphasis_with_underscores(&mut self, underscores: bool) {
        self.emphasized = if underscores { "_" } else { "*" }.to_string();
    }

    /// `__` instead of `**` for strong
    pub fn set_strong_with_underscores(&mut self, underscores: bool) {
        self.strong = if underscores { "__" } else { "**" }.to_string();
    }

    pub fn emphasis_with_underscores(&self) -> bool {
        self.emphasized == "_"
    }

    pub fn strong_with_underscores(&self) -> bool {
        self.strong == "__"
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for style in FormatStyle::ALL {
            validate_delimiter(style, self.delimiter(style))?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, style: FormatStyle) -> &mut String {
        match style {
            FormatStyle::Emphasized => &mut self.emphasized,
            FormatStyle::Strong => &mut self.strong,
            FormatStyle::Code => &mut self.code,
        }
    }
}

fn validate_delimiter(style: FormatStyle, delimiter: &str) -> Result<(), SettingsError> {
    if delimiter.is_empty() {
        return Err(SettingsError::EmptyDelimiter(style));
    }
    if delimiter.contains(crate::buffer::LINE_BREAK) {
        return Err(SettingsError::DelimiterLineBreak(style));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_toggles() {
        let mut settings = FormattingSettings::default();
        assert_eq!(settings.delimiter(FormatStyle::Emphasized), "*");
        settings.set_emphasis_with_underscores(true);
        settings.set_strong_with_underscores(true);
        assert_eq!(settings.delimiter(FormatStyle::Emphasized), "_");
        assert_eq!(settings.delimiter(FormatStyle::Strong), "__");
        assert!(settings.emphasis_with_underscores());
        settings.set_strong_with_underscores(false);
        assert_eq!(settings.delimiter(FormatStyle::Strong), "**");
    }

    #[test]
    fn test_invalid_delimiters_are_rejected() {
        let mut settings = FormattingSettings::default();
        assert!(matches!(
            settings.set_delimiter(FormatStyle::Code, ""),
            Err(SettingsError::EmptyDelimiter(FormatStyle::Code))
        ));
        assert!(matches!(
            settings.set_delimiter(FormatStyle::Code, "`\n"),
            Err(SettingsError::DelimiterLineBreak(FormatStyle::Code))
        ));
        assert_eq!(settings.delimiter(FormatStyle::Code), "`");

        settings.set_delimiter(FormatStyle::Code, "``").unwrap();
        assert_eq!(settings.delimiter(FormatStyle::Code), "``");
    }
}
