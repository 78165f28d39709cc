//! Initial map-data payload and tolerant recommended-center parsing

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::marker::Marker;

/// Zoom used when a recommended center carries no usable zoom
pub const DEFAULT_SUGGESTION_ZOOM: f64 = 12.0;

/// Zoom levels a map surface can render (0 is the whole world)
pub const ZOOM_RANGE: std::ops::RangeInclusive<f64> = 0.0..=24.0;

/// Result of one initial map-data fetch.
///
/// The recommended center is kept as raw JSON: the server has been seen to
/// send strings, nulls and partial objects, and a bad center must never cost
/// us the markers that came with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub markers: Vec<Marker>,
    pub recommended_center: Option<Value>,
}

impl MapData {
    /// Parse a `{"Data": {"MapMakerInfos": [...], "RecommendedCenter": {...}}}` body
    pub fn from_json(body: &str) -> Result<Self> {
        let response: MapDataResponse = serde_json::from_str(body)?;
        Ok(response.into())
    }
}

/// Wire shape of the map-data endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MapDataResponse {
    #[serde(rename = "Data")]
    pub data: MapDataPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapDataPayload {
    #[serde(rename = "MapMakerInfos", default)]
    pub map_maker_infos: Vec<Marker>,
    #[serde(rename = "RecommendedCenter", default)]
    pub recommended_center: Option<Value>,
}

impl From<MapDataResponse> for MapData {
    fn from(response: MapDataResponse) -> Self {
        Self {
            markers: response.data.map_maker_infos,
            recommended_center: response.data.recommended_center,
        }
    }
}

/// A validated server-suggested camera target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendedCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl RecommendedCenter {
    /// Validate a raw recommended-center object.
    ///
    /// Latitude and longitude must be numeric (numbers or numeric strings)
    /// and within range, otherwise the whole suggestion is rejected. A
    /// missing, unusable or out-of-range zoom falls back to `default_zoom`.
    pub fn parse(raw: &Value, default_zoom: f64) -> Result<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| Error::invalid_center("expected an object"))?;

        let latitude = field(obj, &["lat", "latitude"])
            .ok_or_else(|| Error::invalid_center("latitude missing or not numeric"))?;
        let longitude = field(obj, &["lon", "lng", "longitude"])
            .ok_or_else(|| Error::invalid_center("longitude missing or not numeric"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::invalid_center(format!(
                "latitude {latitude} out of range"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::invalid_center(format!(
                "longitude {longitude} out of range"
            )));
        }

        let zoom = field(obj, &["zoom", "zoomLevel"])
            .filter(|z| ZOOM_RANGE.contains(z))
            .unwrap_or(default_zoom);

        Ok(Self {
            latitude,
            longitude,
            zoom,
        })
    }
}

fn field(obj: &serde_json::Map<String, Value>, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| obj.get(*name)).and_then(numeric)
}

fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_center() {
        let center =
            RecommendedCenter::parse(&json!({"lat": 40.71, "lon": -74.0, "zoom": 14}), 12.0)
                .unwrap();
        assert_eq!(center.latitude, 40.71);
        assert_eq!(center.longitude, -74.0);
        assert_eq!(center.zoom, 14.0);
    }

    #[test]
    fn test_bad_latitude_rejects_suggestion() {
        let err = RecommendedCenter::parse(&json!({"lat": "bad", "lon": -74.0, "zoom": "12"}), 12.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRecommendedCenter { .. }));
    }

    #[test]
    fn test_missing_longitude_rejects_suggestion() {
        let err = RecommendedCenter::parse(&json!({"lat": 10.0}), 12.0).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let center =
            RecommendedCenter::parse(&json!({"lat": "40.5", "lng": " -73.9 ", "zoom": "15"}), 12.0)
                .unwrap();
        assert_eq!(center.latitude, 40.5);
        assert_eq!(center.longitude, -73.9);
        assert_eq!(center.zoom, 15.0);
    }

    #[test]
    fn test_bad_zoom_falls_back_to_default() {
        let center =
            RecommendedCenter::parse(&json!({"lat": 1.0, "lon": 2.0, "zoom": "wide"}), 12.0)
                .unwrap();
        assert_eq!(center.zoom, 12.0);

        let center = RecommendedCenter::parse(&json!({"lat": 1.0, "lon": 2.0}), 11.0).unwrap();
        assert_eq!(center.zoom, 11.0);

        let center =
            RecommendedCenter::parse(&json!({"lat": 1.0, "lon": 2.0, "zoom": -1}), 12.0).unwrap();
        assert_eq!(center.zoom, 12.0);
    }

    #[test]
    fn test_zoom_outside_map_range_falls_back_to_default() {
        for zoom in [json!(100000), json!(24.5), json!("1e9")] {
            let center = RecommendedCenter::parse(
                &json!({"lat": 40.0, "lon": -74.0, "zoom": zoom}),
                12.0,
            )
            .unwrap();
            assert_eq!(center.zoom, 12.0, "zoom {zoom} should be rejected");
        }
    }

    #[test]
    fn test_zoom_range_bounds_are_accepted() {
        let world = RecommendedCenter::parse(&json!({"lat": 0.0, "lon": 0.0, "zoom": 0}), 12.0)
            .unwrap();
        assert_eq!(world.zoom, 0.0);

        let street =
            RecommendedCenter::parse(&json!({"lat": 0.0, "lon": 0.0, "zoom": 24}), 12.0).unwrap();
        assert_eq!(street.zoom, 24.0);
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(RecommendedCenter::parse(&json!({"lat": 95.0, "lon": 2.0}), 12.0).is_err());
        assert!(RecommendedCenter::parse(&json!({"lat": 5.0, "lon": -200.0}), 12.0).is_err());
    }

    #[test]
    fn test_non_object_is_invalid() {
        assert!(RecommendedCenter::parse(&json!([1, 2]), 12.0).is_err());
        assert!(RecommendedCenter::parse(&Value::Null, 12.0).is_err());
    }

    #[test]
    fn test_map_data_from_json() {
        let body = r#"{
            "Data": {
                "MapMakerInfos": [
                    {"id": "1", "latitude": 40.7, "longitude": -74.0, "title": "Station 1"},
                    {"id": "2", "latitude": 40.8, "longitude": -73.9, "title": "Station 2"}
                ],
                "RecommendedCenter": {"lat": 40.75, "lon": -73.95, "zoom": 13}
            }
        }"#;
        let data = MapData::from_json(body).unwrap();
        assert_eq!(data.markers.len(), 2);
        assert_eq!(data.markers[1].title, "Station 2");
        assert!(data.recommended_center.is_some());
    }

    #[test]
    fn test_map_data_without_center_or_markers() {
        let data = MapData::from_json(r#"{"Data": {"RecommendedCenter": null}}"#).unwrap();
        assert!(data.markers.is_empty());
        assert!(data.recommended_center.is_none());
    }

    #[test]
    fn test_map_data_rejects_garbage() {
        assert!(matches!(MapData::from_json("<html>"), Err(Error::Json(_))));
    }
}
