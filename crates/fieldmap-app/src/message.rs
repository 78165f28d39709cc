//! Message types for the map screen (TEA pattern)

use crate::gesture::CameraChangedEvent;
use crate::lifecycle::ReadinessFlag;
use crate::markers::FetchSessionId;
use fieldmap_core::{LocationSample, MapData, Marker};

/// Every external or internal event the map screen reacts to
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Location Messages
    // ─────────────────────────────────────────────────────────
    /// New reading from the location collaborator
    LocationUpdated(LocationSample),
    /// Lock/navigation mode toggled by the user
    LockToggled { locked: bool },
    /// User pressed the recenter button
    RecenterRequested,

    // ─────────────────────────────────────────────────────────
    // Map Surface Messages
    // ─────────────────────────────────────────────────────────
    /// The map surface finished loading
    SurfaceReady,
    /// The map surface reported a camera change
    CameraChanged(CameraChangedEvent),
    /// A pin was tapped on the map
    PinSelected { marker_id: String },

    // ─────────────────────────────────────────────────────────
    // Lifecycle Messages
    // ─────────────────────────────────────────────────────────
    /// One readiness input changed (auth, core init, foreground, surface)
    ReadinessChanged { flag: ReadinessFlag, value: bool },
    /// The map screen is being torn down
    Unmount,

    // ─────────────────────────────────────────────────────────
    // Marker Data Messages
    // ─────────────────────────────────────────────────────────
    /// Complete marker batch from the push channel
    PushMarkers { markers: Vec<Marker> },
    /// Initial fetch succeeded
    MapDataFetched {
        session_id: FetchSessionId,
        data: MapData,
    },
    /// Initial fetch failed (network or parse)
    MapDataFetchFailed {
        session_id: FetchSessionId,
        error: String,
    },
    /// Initial fetch was cancelled before it resolved
    MapDataFetchAborted { session_id: FetchSessionId },
}

impl Message {
    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Message::LocationUpdated(_) => "location_updated",
            Message::LockToggled { .. } => "lock_toggled",
            Message::RecenterRequested => "recenter_requested",
            Message::SurfaceReady => "surface_ready",
            Message::CameraChanged(_) => "camera_changed",
            Message::PinSelected { .. } => "pin_selected",
            Message::ReadinessChanged { .. } => "readiness_changed",
            Message::Unmount => "unmount",
            Message::PushMarkers { .. } => "push_markers",
            Message::MapDataFetched { .. } => "map_data_fetched",
            Message::MapDataFetchFailed { .. } => "map_data_fetch_failed",
            Message::MapDataFetchAborted { .. } => "map_data_fetch_aborted",
        }
    }
}
