//! Motion settings
//!
//! Site-wide animation defaults, loadable from a `motion.toml`. Every
//! field has a default so an empty or missing file behaves like the
//! built-in configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Site-wide animation defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionSettings {
    /// Default trigger threshold as a fraction of viewport height
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,
    /// Default per-item stagger increment in milliseconds
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: f32,
    /// When set, sections mount directly in their end state with no
    /// scroll bindings at all
    #[serde(default)]
    pub reduced_motion: bool,
}

fn default_threshold() -> f32 {
    0.8
}

fn default_stagger_ms() -> f32 {
    100.0
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            stagger_ms: default_stagger_ms(),
            reduced_motion: false,
        }
    }
}

impl MotionSettings {
    /// Load settings from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: MotionSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize motion settings")
    }
}
