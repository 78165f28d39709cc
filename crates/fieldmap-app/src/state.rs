//! Map screen state (Model in TEA pattern)

use crate::camera::{CameraController, CameraMode};
use crate::config::Settings;
use crate::gesture::GestureTracker;
use crate::lifecycle::LifecycleGate;
use crate::markers::MarkerAggregator;
use fieldmap_core::Marker;

/// Whether the screen is still alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    #[default]
    Mounted,
    Unmounted,
}

/// Everything the map screen owns.
///
/// The camera state and the marker set are each mutated only by their own
/// component; the update function is the single entry point.
#[derive(Debug)]
pub struct MapScreenState {
    pub settings: Settings,
    pub phase: ScreenPhase,
    pub gate: LifecycleGate,
    pub camera: CameraController,
    pub gestures: GestureTracker,
    pub markers: MarkerAggregator,
}

impl MapScreenState {
    pub fn new(settings: Settings) -> Self {
        Self {
            camera: CameraController::new(settings.camera.clone()),
            markers: MarkerAggregator::new(settings.camera.suggestion_zoom),
            gate: LifecycleGate::new(),
            gestures: GestureTracker::new(),
            phase: ScreenPhase::Mounted,
            settings,
        }
    }

    pub fn is_unmounted(&self) -> bool {
        self.phase == ScreenPhase::Unmounted
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    /// Current markers for the pin layer
    pub fn markers(&self) -> &[Marker] {
        self.markers.markers().as_slice()
    }

    pub fn marker_revision(&self) -> u64 {
        self.markers.markers().revision()
    }
}

impl Default for MapScreenState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
