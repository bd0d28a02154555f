use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Display gamma used when applying white-balance coefficients.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Per-channel white-balance multipliers loaded from a small JSON file
/// (`{"r": .., "g": .., "b": ..}`). Missing channels stay at 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WbCoefficients {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for WbCoefficients {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

impl WbCoefficients {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// True when applying these coefficients would change any pixel.
    pub fn is_identity(&self) -> bool {
        self.r == 1.0 && self.g == 1.0 && self.b == 1.0
    }
}

/// Gamma-corrected white-balance transfer for a single 8-bit channel value.
///
/// Shared with the image collaborator so pixel application and previews use
/// one definition.
#[inline]
pub fn balance_channel(value: f32, coeff: f32, gamma: f32) -> f32 {
    (value * coeff / 255.0).powf(1.0 / gamma) * 255.0
}
