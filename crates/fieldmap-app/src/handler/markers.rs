//! Marker handlers: push batches and initial-fetch results

use crate::markers::{FetchOutcome, FetchSessionId};
use crate::state::MapScreenState;
use fieldmap_core::prelude::Result;
use fieldmap_core::{MapData, Marker};
use tracing::debug;

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_push_markers(state: &mut MapScreenState, markers: Vec<Marker>) -> UpdateResult {
    state.markers.on_push_update(markers);
    UpdateResult::none()
}

/// Route a fetch result through the aggregator. A fresh recommended center
/// is offered to the camera, which only takes it while following unlocked.
pub(crate) fn handle_fetch_result(
    state: &mut MapScreenState,
    session_id: FetchSessionId,
    result: Result<MapData>,
) -> UpdateResult {
    match state.markers.on_fetch_result(session_id, result) {
        FetchOutcome::Applied {
            suggestion: Some(center),
            ..
        } => {
            if !state.settings.markers.apply_recommended_center {
                debug!("Recommended center ignored by configuration");
                return UpdateResult::none();
            }
            UpdateResult::camera(state.camera.apply_suggestion(center))
        }
        FetchOutcome::Failed { error } => {
            UpdateResult::action(UpdateAction::ReportFetchFailure { session_id, error })
        }
        FetchOutcome::Applied { .. } | FetchOutcome::Stale | FetchOutcome::Aborted => {
            UpdateResult::none()
        }
    }
}
