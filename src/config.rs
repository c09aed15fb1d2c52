// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::layout::{self, Layout, ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Keyboard configuration supplied by the host at startup.
///
/// Every field is optional in the JSON form; missing fields take the
/// defaults from `app_settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Hold time before long press kicks in.
    pub long_press_delay_ms: u64,
    /// Backspace repeat period while held.
    pub repeat_interval_ms: u64,
    /// Layout payload to load instead of the bundled one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_path: Option<String>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            long_press_delay_ms: app_settings::LONG_PRESS_DELAY_MS,
            repeat_interval_ms: app_settings::BACKSPACE_REPEAT_INTERVAL_MS,
            layout_path: None,
        }
    }
}

impl KeyboardConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Reads a configuration file.
    pub fn load(path: &str) -> Result<Self, ParseError> {
        let json = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;
        Self::from_json_str(&json).map_err(|e| e.with_path(path))
    }

    /// Loads the configured layout, or the bundled one if none is set.
    pub fn load_layout(&self) -> Result<ParseResult<Layout>, ParseError> {
        match &self.layout_path {
            Some(path) => {
                tracing::info!("Loading keyboard layout from {}", path);
                layout::parse_layout_file(path)
            }
            None => layout::default_layout(),
        }
    }

    /// Long-press delay as a `Duration`.
    #[must_use]
    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }

    /// Backspace repeat period as a `Duration`.
    #[must_use]
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    // A zero repeat period would spin; fall back to the default.
    fn normalized(mut self) -> Self {
        if self.repeat_interval_ms == 0 {
            tracing::warn!(
                "repeat_interval_ms must be positive, using {}",
                app_settings::BACKSPACE_REPEAT_INTERVAL_MS
            );
            self.repeat_interval_ms = app_settings::BACKSPACE_REPEAT_INTERVAL_MS;
        }
        self
    }
}
