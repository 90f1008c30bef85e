//! # Matcher Configuration
//!
//! Controls how failure messages are formatted. Configuration can come from a JSON
//! file (for example a checked-in `.exit_assert.json`) or from the environment:
//!
//! - `EXIT_ASSERT_COLOR`: `auto`, `always` or `never`.
//! - `NO_COLOR`: when set to a non-empty value and `EXIT_ASSERT_COLOR` is not set,
//!   color is disabled.
//!
//! `auto` colors messages only when stderr is a terminal.

use crate::error::ConfigError;
use crate::matcher::{ColorUtils, MatcherUtils, PlainUtils};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

pub const COLOR_ENV: &str = "EXIT_ASSERT_COLOR";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve `Auto` against the current stderr.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(ConfigError::InvalidColorMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    #[serde(default)]
    pub color: ColorMode,
}

impl MatcherConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Defaults overridden by `EXIT_ASSERT_COLOR` / `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides looked up through `lookup`.
    ///
    /// An unrecognized color value is logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(COLOR_ENV).map(|value| value.parse::<ColorMode>()) {
            Some(Ok(mode)) => self.color = mode,
            Some(Err(e)) => tracing::warn!("Ignoring {COLOR_ENV}: {e}"),
            None => {
                if lookup(NO_COLOR_ENV).is_some_and(|value| !value.is_empty()) {
                    self.color = ColorMode::Never;
                }
            }
        }
        self
    }

    /// The formatting capability this configuration selects.
    pub fn utils(&self) -> Arc<dyn MatcherUtils> {
        if self.color.enabled() {
            Arc::new(ColorUtils::new())
        } else {
            Arc::new(PlainUtils)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_auto() {
        assert_eq!(MatcherConfig::default().color, ColorMode::Auto);
        assert_eq!(MatcherConfig::from_json_str("{}").unwrap().color, ColorMode::Auto);
    }

    #[test]
    fn test_parses_color_mode_from_json() {
        let config = MatcherConfig::from_json_str(r#"{ "color": "never" }"#).unwrap();
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = MatcherConfig::from_json_str(r#"{ "colour": "never" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_color_env_wins_over_no_color() {
        let config = MatcherConfig::default()
            .with_overrides(lookup(&[(COLOR_ENV, "Always"), (NO_COLOR_ENV, "1")]));
        assert_eq!(config.color, ColorMode::Always);
    }

    #[test]
    fn test_no_color_disables_color() {
        let config = MatcherConfig::default().with_overrides(lookup(&[(NO_COLOR_ENV, "1")]));
        assert_eq!(config.color, ColorMode::Never);

        let config = MatcherConfig::default().with_overrides(lookup(&[(NO_COLOR_ENV, "")]));
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn test_invalid_color_env_is_ignored() {
        let config = MatcherConfig {
            color: ColorMode::Never,
        }
        .with_overrides(lookup(&[(COLOR_ENV, "sometimes")]));
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_invalid_color_mode_error_message() {
        let err = "sometimes".parse::<ColorMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown color mode 'sometimes' (expected one of: auto, always, never)"
        );
    }
}
