use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCROLL_SENSITIVITY, ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::error::{NebulaError, Result};
use crate::reticle::ReticleConfig;
use crate::sync::SyncPolicy;
use crate::transform::ZoomLimits;

/// Everything a session needs to know up front. Every section is optional in TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub zoom: ZoomLimits,
    pub sync: SyncPolicy,
    pub reticle: ReticleConfig,
    pub input: InputConfig,
}

/// How raw input magnitudes become zoom factors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Exponent per scroll unit; positive scroll zooms in.
    pub scroll_sensitivity: f64,
    /// Magnification of one "zoom in" step.
    pub zoom_in_step: f64,
    /// Magnification of one "zoom out" step.
    pub zoom_out_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            scroll_sensitivity: DEFAULT_SCROLL_SENSITIVITY,
            zoom_in_step: ZOOM_IN_STEP,
            zoom_out_step: ZOOM_OUT_STEP,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SessionConfig =
            toml::from_str(text).map_err(|e| NebulaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NebulaError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.zoom.validate()?;
        let steps = [
            ("input.scroll_sensitivity", self.input.scroll_sensitivity),
            ("input.zoom_in_step", self.input.zoom_in_step),
            ("input.zoom_out_step", self.input.zoom_out_step),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value <= 0.0 {
                return Err(NebulaError::Config(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.reticle.opacity) {
            return Err(NebulaError::Config(format!(
                "reticle.opacity must be in [0, 1], got {}",
                self.reticle.opacity
            )));
        }
        if !self.reticle.opacity_step.is_finite() {
            return Err(NebulaError::Config(
                "reticle.opacity_step must be finite".into(),
            ));
        }
        Ok(())
    }
}
