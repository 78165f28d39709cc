//! Headless mode - NDJSON event output for scenario replay
//!
//! Replays a scenario file through the engine and writes what the controller
//! did to stdout, one JSON object per line. Each event has an "event" field
//! indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"replay_started","scenario":"drive.ndjson","steps":7,"timestamp":1704700001000}
//! {"event":"camera_command","command":{"center":{"lon":-74.0,"lat":40.71},"zoom":12.0,"heading":0.0,"pitch":0.0,"animationDurationMs":1000},"timestamp":1704700001001}
//! {"event":"camera_mode","from":"idle","to":"following_unlocked","timestamp":1704700001001}
//! {"event":"markers","count":3,"source":"push","revision":1,"ids":["a","b","c"],"timestamp":1704700001020}
//! ```

pub mod fixture;
pub mod runner;
pub mod scenario;

pub use runner::{run_headless, ReplayOptions};

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use fieldmap_app::{CameraMode, EngineEvent};
use fieldmap_core::{CameraCommand, Marker, MarkerSource};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Scenario parsed, replay about to begin
    ReplayStarted {
        scenario: String,
        steps: usize,
        timestamp: i64,
    },

    /// Command handed to the map surface
    CameraCommand {
        command: CameraCommand,
        timestamp: i64,
    },

    /// Camera follow mode changed
    CameraMode {
        from: CameraMode,
        to: CameraMode,
        timestamp: i64,
    },

    /// The readiness gate flipped
    Readiness { ready: bool, timestamp: i64 },

    /// Marker set replaced
    Markers {
        count: usize,
        source: Option<MarkerSource>,
        revision: u64,
        ids: Vec<String>,
        timestamp: i64,
    },

    /// Initial fetch started
    FetchStarted { session_id: u64, timestamp: i64 },

    /// Initial fetch failed
    FetchFailed {
        session_id: u64,
        error: String,
        timestamp: i64,
    },

    /// Pin tapped; the full marker as the detail sheet would receive it
    PinSelected { marker: Marker, timestamp: i64 },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// Replay finished
    ReplayFinished {
        markers: usize,
        mode: CameraMode,
        timestamp: i64,
    },

    /// Engine shut down
    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // NDJSON: one event per line
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn replay_started(scenario: &str, steps: usize) -> Self {
        Self::ReplayStarted {
            scenario: scenario.to_string(),
            steps,
            timestamp: Self::now(),
        }
    }

    pub fn replay_finished(markers: usize, mode: CameraMode) -> Self {
        Self::ReplayFinished {
            markers,
            mode,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event into its NDJSON form
    pub fn from_engine(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::CameraCommandIssued { command } => Self::CameraCommand {
                command: *command,
                timestamp,
            },
            EngineEvent::CameraModeChanged { old, new } => Self::CameraMode {
                from: *old,
                to: *new,
                timestamp,
            },
            EngineEvent::ReadinessChanged { ready } => Self::Readiness {
                ready: *ready,
                timestamp,
            },
            EngineEvent::MarkersChanged {
                markers,
                source,
                revision,
            } => Self::Markers {
                count: markers.len(),
                source: *source,
                revision: *revision,
                ids: markers.iter().map(|m| m.id.clone()).collect(),
                timestamp,
            },
            EngineEvent::MapDataFetchStarted { session_id } => Self::FetchStarted {
                session_id: session_id.value(),
                timestamp,
            },
            EngineEvent::MapDataFetchFailed { session_id, error } => Self::FetchFailed {
                session_id: session_id.value(),
                error: error.clone(),
                timestamp,
            },
            EngineEvent::PinSelected { marker } => Self::PinSelected {
                marker: marker.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::LngLat;

    fn to_value(event: &HeadlessEvent) -> serde_json::Value {
        let json = serde_json::to_string(event).expect("serialization failed");
        serde_json::from_str(&json).expect("invalid JSON")
    }

    #[test]
    fn test_camera_command_serialization() {
        let event = HeadlessEvent::from_engine(&EngineEvent::CameraCommandIssued {
            command: CameraCommand {
                center: LngLat::new(-74.0, 40.71),
                zoom: 16.0,
                heading: Some(90.0),
                pitch: 45.0,
                animation_duration_ms: 500,
            },
        });
        let value = to_value(&event);

        assert_eq!(value["event"], "camera_command");
        assert_eq!(value["command"]["zoom"], 16.0);
        assert_eq!(value["command"]["heading"], 90.0);
        assert_eq!(value["command"]["animationDurationMs"], 500);
        assert_eq!(value["command"]["center"]["lon"], -74.0);
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_camera_mode_serialization() {
        let event = HeadlessEvent::from_engine(&EngineEvent::CameraModeChanged {
            old: CameraMode::FollowingUnlocked,
            new: CameraMode::UserOverridden,
        });
        let value = to_value(&event);

        assert_eq!(value["event"], "camera_mode");
        assert_eq!(value["from"], "following_unlocked");
        assert_eq!(value["to"], "user_overridden");
    }

    #[test]
    fn test_markers_serialization_lists_ids() {
        let event = HeadlessEvent::from_engine(&EngineEvent::MarkersChanged {
            markers: vec![Marker::new("a", 0.0, 0.0), Marker::new("b", 0.0, 0.0)],
            source: Some(MarkerSource::InitialFetch),
            revision: 2,
        });
        let value = to_value(&event);

        assert_eq!(value["event"], "markers");
        assert_eq!(value["count"], 2);
        assert_eq!(value["source"], "initial_fetch");
        assert_eq!(value["ids"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_error_serialization() {
        let value = to_value(&HeadlessEvent::error("bad scenario".to_string(), true));

        assert_eq!(value["event"], "error");
        assert_eq!(value["message"], "bad scenario");
        assert_eq!(value["fatal"], true);
    }

    #[test]
    fn test_replay_started_serialization() {
        let value = to_value(&HeadlessEvent::replay_started("drive.ndjson", 4));

        assert_eq!(value["event"], "replay_started");
        assert_eq!(value["scenario"], "drive.ndjson");
        assert_eq!(value["steps"], 4);
    }
}
