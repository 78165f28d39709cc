//! Camera commands issued to the map surface

use serde::{Deserialize, Serialize};

use crate::location::Fix;

/// Geographic point in the map surface's `(lon, lat)` order
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<Fix> for LngLat {
    fn from(fix: Fix) -> Self {
        Self {
            lon: fix.longitude,
            lat: fix.latitude,
        }
    }
}

/// A single camera move. Immutable once emitted and consumed exactly once
/// by the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraCommand {
    pub center: LngLat,
    pub zoom: f64,
    /// `None` leaves the current bearing untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    pub pitch: f64,
    pub animation_duration_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_from_fix_is_lon_lat() {
        let center = LngLat::from(Fix {
            latitude: 40.71,
            longitude: -74.0,
        });
        assert_eq!(center.lon, -74.0);
        assert_eq!(center.lat, 40.71);
    }

    #[test]
    fn test_missing_heading_is_omitted_on_the_wire() {
        let command = CameraCommand {
            center: LngLat::new(-74.0, 40.71),
            zoom: 16.0,
            heading: None,
            pitch: 45.0,
            animation_duration_ms: 500,
        };
        let value = serde_json::to_value(command).unwrap();
        assert!(value.get("heading").is_none());
        assert_eq!(value["animationDurationMs"], 500);
        assert_eq!(value["center"]["lon"], -74.0);
    }
}
