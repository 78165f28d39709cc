//! Camera handlers: location samples, lock toggle, gestures, recenter

use crate::gesture::{CameraChangedEvent, GestureKind};
use crate::state::MapScreenState;
use fieldmap_core::LocationSample;
use tracing::debug;

use super::UpdateResult;

pub(crate) fn handle_location_updated(
    state: &mut MapScreenState,
    sample: LocationSample,
) -> UpdateResult {
    UpdateResult::camera(state.camera.on_sample(sample))
}

pub(crate) fn handle_lock_toggled(state: &mut MapScreenState, locked: bool) -> UpdateResult {
    UpdateResult::camera(state.camera.set_locked(locked))
}

pub(crate) fn handle_recenter(state: &mut MapScreenState) -> UpdateResult {
    UpdateResult::camera(state.camera.recenter())
}

/// Classify the change and suspend automatic follow on a user gesture
pub(crate) fn handle_camera_changed(
    state: &mut MapScreenState,
    event: CameraChangedEvent,
) -> UpdateResult {
    let kind = state.gestures.classify(&event, state.camera.is_locked());
    if kind == GestureKind::UserInitiated && state.camera.on_gesture(kind) {
        debug!("User gesture took over the camera");
    }
    UpdateResult::none()
}
