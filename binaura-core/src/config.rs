//! User preferences for Binaura
//!
//! Plain `key=value` lines; `#` starts a comment. A value that fails to
//! parse keeps that key's default.

use crate::controller::{DEFAULT_CARRIER_HZ, DEFAULT_VOLUME};
use crate::session::{DEFAULT_SESSION_MINUTES, SESSION_LENGTHS};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Carrier tone the beat rides on, in Hz
    pub carrier_hz: f32,
    /// Binaural volume (0.0 - 1.0)
    pub volume: f32,
    /// Journey tick interval in milliseconds
    pub tick_ms: u64,
    pub session_minutes: u32,
    /// Mix preset applied at startup
    pub mix_preset: Option<String>,
    /// How long to wait for the audio device to open
    pub ready_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            carrier_hz: DEFAULT_CARRIER_HZ,
            volume: DEFAULT_VOLUME,
            tick_ms: 1000,
            session_minutes: DEFAULT_SESSION_MINUTES,
            mix_preset: None,
            ready_timeout_ms: 2000,
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("binaura")
            .join("config.txt")
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "carrier_hz" => {
                    if let Some(hz) = value.parse::<f32>().ok().filter(|hz| *hz > 0.0 && hz.is_finite()) {
                        config.carrier_hz = hz;
                    }
                }
                "volume" => {
                    if let Some(v) = value.parse::<f32>().ok().filter(|v| (0.0..=1.0).contains(v)) {
                        config.volume = v;
                    }
                }
                "tick_ms" => {
                    if let Some(ms) = value.parse::<u64>().ok().filter(|ms| *ms > 0) {
                        config.tick_ms = ms;
                    }
                }
                "session_minutes" => {
                    if let Some(m) = value.parse::<u32>().ok().filter(|m| SESSION_LENGTHS.contains(m)) {
                        config.session_minutes = m;
                    }
                }
                "mix_preset" => {
                    config.mix_preset = match value {
                        "" | "none" => None,
                        name => Some(name.to_string()),
                    };
                }
                "ready_timeout_ms" => {
                    if let Some(ms) = value.parse::<u64>().ok().filter(|ms| *ms > 0) {
                        config.ready_timeout_ms = ms;
                    }
                }
                other => tracing::debug!(key = other, "ignoring unknown config key"),
            }
        }

        config
    }

    fn serialize(&self) -> String {
        let lines = [
            "# Binaura configuration".to_string(),
            format!("carrier_hz={}", self.carrier_hz),
            format!("volume={}", self.volume),
            format!("tick_ms={}", self.tick_ms),
            format!("session_minutes={}", self.session_minutes),
            format!("mix_preset={}", self.mix_preset.as_deref().unwrap_or("none")),
            format!("ready_timeout_ms={}", self.ready_timeout_ms),
        ];
        lines.join("\n")
    }
}
