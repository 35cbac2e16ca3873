use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// How long a pending `g` waits for its second key, in milliseconds.
    #[serde(default = "default_chord_timeout_ms")]
    pub chord_timeout_ms: u64,
    /// Wrap list cursors around at either end instead of stopping.
    #[serde(default)]
    pub wrap_lists: bool,
    /// Wrap the board cursor from the last column to the first.
    #[serde(default)]
    pub loop_columns: bool,
    /// Wrap the board cursor from the bottom of a column to its top.
    #[serde(default)]
    pub loop_rows: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        KeyboardConfig {
            chord_timeout_ms: default_chord_timeout_ms(),
            wrap_lists: false,
            loop_columns: false,
            loop_rows: false,
        }
    }
}

impl KeyboardConfig {
    pub fn chord_timeout(&self) -> Duration {
        Duration::from_millis(self.chord_timeout_ms)
    }
}

fn default_chord_timeout_ms() -> u64 {
    700
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show a key hint line in the status row.
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`).
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files. Defaults to the platform data directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
