//! src/services/display_name.rs

use tabstatus_common::models::{DisplayName, StatusConfig};
use crate::formatting::RESET;

/// Builds the bracketed `[status] name` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNameComposer {
    opening: String,
    closing: String,
}

impl DisplayNameComposer {
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }

    pub fn from_config(config: &StatusConfig) -> Self {
        Self::new(config.opening_character.clone(), config.closing_character.clone())
    }

    /// `rendered` is the status after rendering (and placeholder expansion).
    /// `None` or an empty status yields the bare name on both surfaces.
    pub fn compose(&self, name: &str, rendered: Option<&str>) -> DisplayName {
        match rendered {
            Some(status) if !status.is_empty() => {
                let label = self.bracket(status, name);
                DisplayName {
                    chat_prefix: label.clone(),
                    list_label: label,
                }
            }
            _ => DisplayName::bare(name),
        }
    }

    /// `open + status + reset + close + " " + tail`
    pub fn bracket(&self, status: &str, tail: &str) -> String {
        format!("{}{}{}{} {}", self.opening, status, RESET, self.closing, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_status() {
        let composer = DisplayNameComposer::from_config(&StatusConfig::default());
        let display = composer.compose("Steve", Some("§aAFK"));
        assert_eq!(display.list_label, "[§aAFK§r] Steve");
        assert_eq!(display.chat_prefix, display.list_label);
    }

    #[test]
    fn test_compose_without_status_is_bare() {
        let composer = DisplayNameComposer::new("<", ">");
        assert_eq!(composer.compose("Steve", None), DisplayName::bare("Steve"));
        assert_eq!(composer.compose("Steve", Some("")), DisplayName::bare("Steve"));
    }

    #[test]
    fn test_custom_brackets() {
        let composer = DisplayNameComposer::new("(", ")");
        assert_eq!(composer.compose("Alex", Some("hi")).list_label, "(hi§r) Alex");
    }
}
