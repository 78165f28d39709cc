//! Lifecycle handlers: readiness inputs and unmount

use crate::lifecycle::{GateTransition, ReadinessFlag};
use crate::state::{MapScreenState, ScreenPhase};
use tracing::{debug, info};

use super::{UpdateAction, UpdateResult};

/// Update one readiness input and start or cancel the fetch on gate edges
pub(crate) fn handle_readiness_changed(
    state: &mut MapScreenState,
    flag: ReadinessFlag,
    value: bool,
) -> UpdateResult {
    match state.gate.set(flag, value) {
        GateTransition::BecameReady => {
            info!("Map screen ready ({} set)", flag);
            match state.markers.start(true) {
                Some((session_id, cancel)) => {
                    UpdateResult::action(UpdateAction::FetchMapData { session_id, cancel })
                }
                None => UpdateResult::none(),
            }
        }
        GateTransition::BecameNotReady => {
            info!("Map screen no longer ready ({} cleared)", flag);
            state.markers.start(false);
            UpdateResult::none()
        }
        GateTransition::Unchanged => {
            debug!(
                flag = %flag,
                value,
                missing = ?state.gate.missing(),
                "Readiness input changed"
            );
            UpdateResult::none()
        }
    }
}

/// Tear the screen down: abort the fetch and discard samples and markers
pub(crate) fn handle_unmount(state: &mut MapScreenState) -> UpdateResult {
    info!("Map screen unmounting");
    state.markers.reset();
    state.camera.reset();
    state.gate = Default::default();
    state.phase = ScreenPhase::Unmounted;
    UpdateResult::none()
}
