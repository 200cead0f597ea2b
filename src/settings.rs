//! Viewer settings with persistence
//!
//! Settings are saved to `~/.config/vantage/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vantage_view::{FramingConfig, HelperState};

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerSettings {
    pub framing: FramingSettings,
    pub display: DisplaySettings,
}

impl ViewerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vantage"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, writing defaults");
            let defaults = Self::default();
            if let Err(e) = defaults.save() {
                warn!("Failed to write default settings: {}", e);
            }
            return defaults;
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn framing_config(&self) -> FramingConfig {
        FramingConfig {
            canonical_size: self.framing.canonical_size,
            fov_y: self.framing.fov_degrees.to_radians(),
            padding: self.framing.padding,
        }
    }

    pub fn helper_state(&self) -> HelperState {
        HelperState {
            show_grid: self.display.show_grid,
            show_axes: self.display.show_axes,
        }
    }
}

/// Canonical framing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramingSettings {
    /// Edge length of the canonical viewing box
    pub canonical_size: f32,
    /// Camera vertical field of view, degrees
    pub fov_degrees: f32,
    /// Padding factor on the fitted camera distance
    pub padding: f32,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            canonical_size: 2.0,
            fov_degrees: 75.0,
            padding: 1.5,
        }
    }
}

/// Display and helper options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_grid: bool,
    pub show_axes: bool,
    /// Turntable speed in radians per second; 0 disables the spin
    pub turntable_speed: f32,
    /// Visualization mode selected at startup
    pub initial_mode: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_axes: true,
            turntable_speed: 0.6,
            initial_mode: "solid".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let settings = ViewerSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: ViewerSettings = toml::from_str(&text).unwrap();
        assert_eq!(back.framing.canonical_size, 2.0);
        assert_eq!(back.display.initial_mode, "solid");
    }

    #[test]
    fn framing_config_converts_degrees() {
        let settings = ViewerSettings::default();
        let config = settings.framing_config();
        assert!((config.fov_y - 75.0_f32.to_radians()).abs() < 1e-6);
    }
}
