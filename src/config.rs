//! Overlay configuration persistence.
//!
//! Stores the user's overlay preferences as JSON at
//! `~/.local/share/danmaku-overlay/config.json`. Loaded once on startup;
//! the settings UI persists changes with `save` so the file stays current.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default config file path.
fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("danmaku-overlay")
        .join("config.json")
}

/// Persisted overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Gate on spawning; the backlog keeps filling either way.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Scroll speed 1..=11; visible lifetime is `(12 - speed)` seconds.
    #[serde(default = "default_speed")]
    pub speed: u8,
    /// Backlog capacity; the oldest item is evicted beyond this.
    #[serde(default = "default_backlog")]
    pub max_backlog: usize,
    /// Decay tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    path: PathBuf,
}

fn default_true() -> bool { true }
fn default_speed() -> u8 { 5 }
fn default_backlog() -> usize { 50 }
fn default_tick_ms() -> u64 { 100 }

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            speed: default_speed(),
            max_backlog: default_backlog(),
            tick_ms: default_tick_ms(),
            path: default_path(),
        }
    }
}

impl OverlayConfig {
    /// Load from the default path, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(default_path())
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_from(path: PathBuf) -> Self {
        let mut config: Self = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        };
        config.speed = config.speed.clamp(1, 11);
        config.path = path;
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(&self.path, json);
        }
    }

    /// Decay tick period.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
