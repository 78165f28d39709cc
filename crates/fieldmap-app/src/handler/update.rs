//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in:
//! - `camera`: location samples, lock toggle, gestures, recenter
//! - `markers`: push batches and initial-fetch results
//! - `lifecycle`: readiness inputs and unmount

use crate::lifecycle::ReadinessFlag;
use crate::message::Message;
use crate::state::MapScreenState;
use tracing::{trace, warn};

use super::{camera, lifecycle, markers, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut MapScreenState, message: Message) -> UpdateResult {
    if state.is_unmounted() {
        trace!("Ignoring {} after unmount", message.kind());
        return UpdateResult::none();
    }

    match message {
        // ─────────────────────────────────────────────────────────
        // Location Messages
        // ─────────────────────────────────────────────────────────
        Message::LocationUpdated(sample) => camera::handle_location_updated(state, sample),
        Message::LockToggled { locked } => camera::handle_lock_toggled(state, locked),
        Message::RecenterRequested => camera::handle_recenter(state),

        // ─────────────────────────────────────────────────────────
        // Map Surface Messages
        // ─────────────────────────────────────────────────────────
        Message::SurfaceReady => UpdateResult::message(Message::ReadinessChanged {
            flag: ReadinessFlag::SurfaceLoaded,
            value: true,
        }),
        Message::CameraChanged(event) => camera::handle_camera_changed(state, event),
        Message::PinSelected { marker_id } => match state.markers.markers().get(&marker_id) {
            Some(marker) => UpdateResult::action(UpdateAction::ForwardPinSelection {
                marker: marker.clone(),
            }),
            None => {
                warn!("Pin selected for unknown marker {}", marker_id);
                UpdateResult::none()
            }
        },

        // ─────────────────────────────────────────────────────────
        // Lifecycle Messages
        // ─────────────────────────────────────────────────────────
        Message::ReadinessChanged { flag, value } => {
            lifecycle::handle_readiness_changed(state, flag, value)
        }
        Message::Unmount => lifecycle::handle_unmount(state),

        // ─────────────────────────────────────────────────────────
        // Marker Data Messages
        // ─────────────────────────────────────────────────────────
        Message::PushMarkers { markers } => markers::handle_push_markers(state, markers),
        Message::MapDataFetched { session_id, data } => {
            markers::handle_fetch_result(state, session_id, Ok(data))
        }
        Message::MapDataFetchFailed { session_id, error } => markers::handle_fetch_result(
            state,
            session_id,
            Err(fieldmap_core::Error::fetch_failed(error)),
        ),
        Message::MapDataFetchAborted { session_id } => {
            markers::handle_fetch_result(state, session_id, Err(fieldmap_core::Error::FetchAborted))
        }
    }
}
