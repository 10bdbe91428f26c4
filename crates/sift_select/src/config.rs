//! Select configuration
//!
//! Every field has a default, so a host can start from
//! `SelectConfig::default()` or load a partial TOML table:
//!
//! ```toml
//! placeholder = "Pick a number"
//! visible_rows = 6
//! debounce_ms = 250
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_core::DEFAULT_DEBOUNCE_MS;
use thiserror::Error;

/// Default minimum number of rows the panel renders
pub const DEFAULT_VISIBLE_ROWS: usize = 4;

/// Default vertical gap between trigger and panel, in pixels
pub const DEFAULT_PANEL_OFFSET: f32 = 4.0;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("Failed to parse select config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `visible_rows` must be at least 1
    #[error("visible_rows must be at least 1, got {0}")]
    InvalidVisibleRows(usize),

    /// `debounce_ms` must be positive
    #[error("debounce_ms must be greater than 0")]
    InvalidDebounce,
}

/// Tunables for a select instance
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Text shown on the trigger when nothing is selected or typed
    pub placeholder: Option<String>,
    /// Minimum row count hint handed to the viewport
    pub visible_rows: usize,
    /// Quiet window before a search runs
    pub debounce_ms: u64,
    /// Gap between the trigger's bottom edge and the panel
    pub panel_offset: f32,
    /// Close the panel after a pick
    pub close_on_select: bool,
    /// Close the panel when the window is resized
    pub close_on_resize: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            visible_rows: DEFAULT_VISIBLE_ROWS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            panel_offset: DEFAULT_PANEL_OFFSET,
            close_on_select: true,
            close_on_resize: true,
        }
    }
}

impl SelectConfig {
    /// Parse and validate a TOML table
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visible_rows == 0 {
            return Err(ConfigError::InvalidVisibleRows(self.visible_rows));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidDebounce);
        }
        Ok(())
    }

    /// The debounce window as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectConfig::default();
        assert_eq!(config.placeholder, None);
        assert_eq!(config.visible_rows, 4);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.panel_offset, 4.0);
        assert!(config.close_on_select);
        assert!(config.close_on_resize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SelectConfig::from_toml_str(
            r#"
            placeholder = "Pick a number"
            visible_rows = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.placeholder.as_deref(), Some("Pick a number"));
        assert_eq!(config.visible_rows, 6);
        assert_eq!(config.debounce_ms, 300);
        assert!(config.close_on_resize);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            SelectConfig::from_toml_str("").unwrap(),
            SelectConfig::default()
        );
    }

    #[test]
    fn test_rejects_zero_rows() {
        let err = SelectConfig::from_toml_str("visible_rows = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVisibleRows(0)));
    }

    #[test]
    fn test_rejects_zero_debounce() {
        let err = SelectConfig::from_toml_str("debounce_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDebounce));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SelectConfig::from_toml_str("visible_rows = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let config = SelectConfig {
            placeholder: Some("Search".into()),
            ..SelectConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SelectConfig::from_toml_str(&text).unwrap(), config);
    }
}
