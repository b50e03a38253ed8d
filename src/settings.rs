use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Motor step sizes applied per wheel notch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MotorSteps {
    /// Phi rotation step in degrees.
    #[serde(default = "default_phi_step")]
    pub phi: f64,
    /// Focus translation step in millimetres.
    #[serde(default = "default_focus_step")]
    pub focus: f64,
}

impl Default for MotorSteps {
    fn default() -> Self {
        Self {
            phi: default_phi_step(),
            focus: default_focus_step(),
        }
    }
}

fn default_phi_step() -> f64 {
    90.0
}

fn default_focus_step() -> f64 {
    0.05
}

/// Per-binding scroll direction inversion. The defaults keep the
/// instrument's historical mapping (positive delta steps "in"); operators
/// who prefer natural scrolling flip these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScrollBindings {
    #[serde(default)]
    pub invert_phi: bool,
    #[serde(default)]
    pub invert_focus: bool,
    #[serde(default)]
    pub invert_zoom: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub motor_steps: MotorSteps,
    #[serde(default)]
    pub scroll: ScrollBindings,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("beamview")
            .join("settings.json")
    }
}
