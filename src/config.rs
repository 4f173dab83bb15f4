//! User settings, read once at startup.
//!
//! Settings live in `<config dir>/physcalc/config.toml`. A missing file means
//! defaults; a malformed one is reported and ignored.

use crate::calculator::{AngleMode, SIGNIFICANT_DIGITS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest precision that still means something for an f64.
pub const MAX_PRECISION: usize = 17;

/// Calculator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Angle mode at startup.
    pub angle_mode: AngleMode,
    /// Significant digits for results.
    pub precision: usize,
    /// Prompt printed by the terminal shell.
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Degrees,
            precision: SIGNIFICANT_DIGITS,
            prompt: "> ".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// Never fails: unreadable or invalid files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "{:#}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        Ok(settings.normalized())
    }

    /// Clamp values into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.precision = self.precision.clamp(1, MAX_PRECISION);
        self
    }

    /// Default settings file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("physcalc").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("physcalc.toml"))
    }
}
