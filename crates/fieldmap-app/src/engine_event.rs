//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use fieldmap_core::{CameraCommand, Marker, MarkerSource};

use crate::camera::CameraMode;
use crate::markers::FetchSessionId;

/// Domain events emitted by the Engine for external consumers.
///
/// Subscribers see a consistent view: events for one message are sent after
/// the whole update cycle for that message has run.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Camera
    // ─────────────────────────────────────────────────────────
    /// A command was handed to the map surface
    CameraCommandIssued { command: CameraCommand },

    /// The follow mode changed
    CameraModeChanged { old: CameraMode, new: CameraMode },

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// The derived readiness gate flipped
    ReadinessChanged { ready: bool },

    // ─────────────────────────────────────────────────────────
    // Markers
    // ─────────────────────────────────────────────────────────
    /// The marker set was replaced
    MarkersChanged {
        markers: Vec<Marker>,
        source: Option<MarkerSource>,
        revision: u64,
    },

    /// The initial fetch was started for a new session
    MapDataFetchStarted { session_id: FetchSessionId },

    /// The initial fetch failed; markers were left as they were
    MapDataFetchFailed {
        session_id: FetchSessionId,
        error: String,
    },

    /// A pin was tapped; forwarded unmodified for the detail sheet
    PinSelected { marker: Marker },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CameraCommandIssued { .. } => "camera_command_issued",
            Self::CameraModeChanged { .. } => "camera_mode_changed",
            Self::ReadinessChanged { .. } => "readiness_changed",
            Self::MarkersChanged { .. } => "markers_changed",
            Self::MapDataFetchStarted { .. } => "map_data_fetch_started",
            Self::MapDataFetchFailed { .. } => "map_data_fetch_failed",
            Self::PinSelected { .. } => "pin_selected",
            Self::Shutdown => "shutdown",
        }
    }
}
