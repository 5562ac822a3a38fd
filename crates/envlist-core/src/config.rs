//! Editor configuration
//!
//! Options only matter when the tree gives no hint: an existing separator or
//! comma spacing in the list always wins over the configured fallback.
//!
//! ```toml
//! defaultSeparator = "comma-space"
//! collapseSingleAlternative = true
//! groupCommaSpace = false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EnvlistError;
use crate::result::Result;

/// Separator placed between entries when no neighbour shows one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorStyle {
    /// One entry per line
    #[default]
    Newline,
    /// `a,b`
    Comma,
    /// `a, b`
    CommaSpace,
}

impl SeparatorStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            SeparatorStyle::Newline => "\n",
            SeparatorStyle::Comma => ",",
            SeparatorStyle::CommaSpace => ", ",
        }
    }
}

/// Options for structural edits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditOptions {
    /// Separator for a new entry when the list has none to copy
    pub default_separator: SeparatorStyle,

    /// Replace a group left with one alternative by that alternative
    pub collapse_single_alternative: bool,

    /// Write `{a, b}` instead of `{a,b}` when no existing group shows spacing
    pub group_comma_space: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            default_separator: SeparatorStyle::Newline,
            collapse_single_alternative: true,
            group_comma_space: false,
        }
    }
}

impl EditOptions {
    /// Load options from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| EnvlistError::config(format!("Failed to parse TOML options: {e}")))
    }

    /// Load options from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| EnvlistError::config(format!("Failed to parse JSON options: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let options = EditOptions::default();
        assert_eq!(options.default_separator, SeparatorStyle::Newline);
        assert!(options.collapse_single_alternative);
        assert!(!options.group_comma_space);
    }

    #[test]
    fn test_from_toml() {
        let options = EditOptions::from_toml_str(
            r#"
defaultSeparator = "comma-space"
groupCommaSpace = true
"#,
        )
        .unwrap();
        assert_eq!(options.default_separator, SeparatorStyle::CommaSpace);
        assert!(options.group_comma_space);
        assert!(options.collapse_single_alternative);
    }

    #[test]
    fn test_from_json() {
        let options =
            EditOptions::from_json_str(r#"{"collapseSingleAlternative": false}"#).unwrap();
        assert!(!options.collapse_single_alternative);
        assert_eq!(options.default_separator, SeparatorStyle::Newline);
    }

    #[test]
    fn test_invalid_options() {
        let err = EditOptions::from_json_str(r#"{"defaultSeparator": "tab"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = EditOptions::from_toml_str("defaultSeparator = ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_round_trip_json() {
        let options = EditOptions {
            default_separator: SeparatorStyle::Comma,
            ..EditOptions::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains(r#""defaultSeparator":"comma""#));
        assert_eq!(EditOptions::from_json_str(&json).unwrap(), options);
    }
}
