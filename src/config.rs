use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};

pub const DEFAULT_CONTROLLER_SIZE: f32 = 20.0;

fn default_controller_size() -> f32 {
    DEFAULT_CONTROLLER_SIZE
}

fn default_hide_ik_handle() -> bool {
    true
}

/// Settings for one rig build. Loadable from JSON; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Radius of FK circles and edge length of the IK box.
    #[serde(default = "default_controller_size")]
    pub controller_size: f32,
    /// Starting value of the `ikfkBlend` attribute.
    #[serde(default)]
    pub initial_blend: f32,
    #[serde(default = "default_hide_ik_handle")]
    pub hide_ik_handle: bool,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            controller_size: DEFAULT_CONTROLLER_SIZE,
            initial_blend: 0.0,
            hide_ik_handle: true,
        }
    }
}

impl RigConfig {
    pub fn with_controller_size(controller_size: f32) -> Self {
        Self {
            controller_size,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RigError::Config(format!("parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RigError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RigError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        validate_controller_size(self.controller_size)?;
        if !(0.0..=1.0).contains(&self.initial_blend) {
            return Err(RigError::Config(format!(
                "initial_blend must be within [0, 1], got {}",
                self.initial_blend
            )));
        }
        Ok(())
    }
}

pub fn validate_controller_size(size: f32) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(RigError::InvalidControllerSize(size))
    }
}
