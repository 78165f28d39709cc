//! Configuration types for the map controller
//!
//! Defines:
//! - `Settings` - Root of `.fieldmap/config.toml`
//! - `CameraSettings` - Zoom/pitch/animation profile per follow mode
//! - `MarkerSettings` - Marker aggregation behaviour

use serde::{Deserialize, Serialize};

use fieldmap_core::prelude::*;
use fieldmap_core::{DEFAULT_SUGGESTION_ZOOM, ZOOM_RANGE};

/// Application settings (.fieldmap/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub markers: MarkerSettings,
}

/// Camera profile for locked (navigation) and unlocked (overview) following
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraSettings {
    #[serde(default = "default_locked_zoom")]
    pub locked_zoom: f64,

    #[serde(default = "default_locked_pitch")]
    pub locked_pitch: f64,

    #[serde(default = "default_locked_animation_ms")]
    pub locked_animation_ms: u32,

    #[serde(default = "default_unlocked_zoom")]
    pub unlocked_zoom: f64,

    #[serde(default = "default_unlocked_animation_ms")]
    pub unlocked_animation_ms: u32,

    /// Zoom used for a recommended center that carries none
    #[serde(default = "default_suggestion_zoom")]
    pub suggestion_zoom: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            locked_zoom: default_locked_zoom(),
            locked_pitch: default_locked_pitch(),
            locked_animation_ms: default_locked_animation_ms(),
            unlocked_zoom: default_unlocked_zoom(),
            unlocked_animation_ms: default_unlocked_animation_ms(),
            suggestion_zoom: default_suggestion_zoom(),
        }
    }
}

fn default_locked_zoom() -> f64 {
    16.0
}

fn default_locked_pitch() -> f64 {
    45.0
}

fn default_locked_animation_ms() -> u32 {
    500
}

fn default_unlocked_zoom() -> f64 {
    12.0
}

fn default_unlocked_animation_ms() -> u32 {
    1000
}

fn default_suggestion_zoom() -> f64 {
    DEFAULT_SUGGESTION_ZOOM
}

/// Marker aggregation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarkerSettings {
    /// Move the camera to the server's recommended center after the initial fetch
    #[serde(default = "default_true")]
    pub apply_recommended_center: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            apply_recommended_center: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl CameraSettings {
    /// Check the profile for values the map surface cannot honour
    pub fn validate(&self) -> Result<()> {
        for (name, zoom) in [
            ("locked_zoom", self.locked_zoom),
            ("unlocked_zoom", self.unlocked_zoom),
            ("suggestion_zoom", self.suggestion_zoom),
        ] {
            if !ZOOM_RANGE.contains(&zoom) {
                return Err(Error::config_invalid(format!(
                    "{name} must be between {} and {}, got {zoom}",
                    ZOOM_RANGE.start(),
                    ZOOM_RANGE.end()
                )));
            }
        }
        if !(0.0..=85.0).contains(&self.locked_pitch) {
            return Err(Error::config_invalid(format!(
                "locked_pitch must be between 0 and 85, got {}",
                self.locked_pitch
            )));
        }
        Ok(())
    }
}
