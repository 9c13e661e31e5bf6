//! Engine configuration with TOML preset support.
//!
//! Every tweakable setting (default spring, velocity hand-off, debug time
//! dilation) lives here. Options serialize to/from TOML so hosts can keep
//! named presets in a directory.

mod debug;
mod spring;
mod velocity;

use std::path::Path;

pub use debug::DebugOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use spring::SpringOptions;
pub use velocity::{VelocityOptions, DEFAULT_VELOCITY_MULTIPLIER};

use crate::error::TransitionError;

/// Top-level options container. All sections use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[debug]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct TransitionOptions {
    /// Spring used by instances without their own bounds transform.
    pub spring: SpringOptions,
    /// Gesture velocity hand-off.
    pub velocity: VelocityOptions,
    /// Debug toggles.
    pub debug: DebugOptions,
}

impl TransitionOptions {
    /// Generate JSON Schema describing the exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(TransitionOptions)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), TransitionError> {
        let scale = self.debug.duration_scale;
        if scale.is_nan() || scale < 0.0 {
            return Err(TransitionError::NegativeDurationScale(scale));
        }
        Ok(())
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, TransitionError> {
        let content = std::fs::read_to_string(path).map_err(TransitionError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| TransitionError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), TransitionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TransitionError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TransitionError::Io)?;
        }
        std::fs::write(path, content).map_err(TransitionError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
