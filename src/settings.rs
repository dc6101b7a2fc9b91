//! Session settings with persistence
//!
//! Settings are saved to `~/.config/verdant/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use verdant_game::WorldConfig;

/// All runner settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub world: WorldConfig,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("verdant"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if not found
    pub fn load() -> (Self, LoadOutcome) {
        let Some(path) = Self::settings_path() else {
            return (Self::default(), LoadOutcome::NoConfigDir);
        };
        Self::load_from(&path)
    }

    /// Load settings from a file, falling back to defaults on any problem
    ///
    /// Nothing is logged here; the caller reports the outcome once logging
    /// is set up.
    pub fn load_from(path: &Path) -> (Self, LoadOutcome) {
        if !path.exists() {
            return (Self::default(), LoadOutcome::Missing(path.to_path_buf()));
        }

        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::parse(&content));
        match parsed {
            Ok(settings) => (settings, LoadOutcome::Loaded(path.to_path_buf())),
            Err(e) => (
                Self::default(),
                LoadOutcome::Fallback {
                    path: path.to_path_buf(),
                    reason: format!("{e:#}"),
                },
            ),
        }
    }

    /// Parse a settings file, layering it over the defaults
    ///
    /// Tables are merged key by key, so any value left out keeps its
    /// default, including inside a single zone template.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let overrides: toml::Table = toml::from_str(content)?;
        let mut merged = match toml::Value::try_from(Self::default())? {
            toml::Value::Table(table) => table,
            _ => anyhow::bail!("Default settings did not serialize to a table"),
        };
        merge_tables(&mut merged, overrides);
        Ok(toml::Value::Table(merged).try_into::<Self>()?)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Where the settings came from, reported once logging is ready
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(PathBuf),
    Missing(PathBuf),
    NoConfigDir,
    Fallback { path: PathBuf, reason: String },
}

impl LoadOutcome {
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => info!("Loaded settings from {:?}", path),
            Self::Missing(path) => info!("No settings file at {:?}, using defaults", path),
            Self::NoConfigDir => warn!("Could not determine config directory, using defaults"),
            Self::Fallback { path, reason } => {
                warn!("Failed to load settings from {:?}: {}, using defaults", path, reason)
            }
        }
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, toml::Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

/// How the headless session runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Frames to simulate before exiting
    pub ticks: u64,
    /// Simulated frames per second
    pub frame_rate: f32,
    /// Most verbose log level: error, warn, info, debug, or trace
    pub log_level: String,
    /// Log a HUD line every this many frames (0 = never)
    pub hud_interval: u64,
    /// Write the defaults to the config directory when no settings file exists
    pub write_defaults: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ticks: 60 * 120,
            frame_rate: 60.0,
            log_level: "info".to_string(),
            hud_interval: 300,
            write_defaults: false,
        }
    }
}

impl SessionSettings {
    /// Seconds per simulated frame
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.frame_rate.max(1.0)
    }
}
