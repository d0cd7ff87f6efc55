use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::difficulty::Difficulty;

pub const MIN_TICK_INTERVAL_MS: u64 = 10;
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HackSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Length of one countdown second, in milliseconds. Lower it for fast practice runs.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Fixed dice seed for reproducible hacks. `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for HackSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            difficulty: Difficulty::default(),
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

impl HackSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.tick_interval_ms = self
            .tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn default_version() -> u32 {
    1
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var_os(key).map(PathBuf::from))
    }

    fn resolve<F>(mut get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<PathBuf>,
    {
        if let Some(explicit) = get_env("HACKING_SETTINGS_PATH") {
            return Self { path: explicit };
        }

        let mut path = get_env("XDG_CONFIG_HOME")
            .or_else(|| get_env("HOME").map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("hacking");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load(&self) -> HackSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return HackSettings::default();
        };
        match serde_json::from_slice::<HackSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring malformed settings file");
                HackSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &HackSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
