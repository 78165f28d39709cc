//! Classification of camera-change events reported by the map surface

use serde::{Deserialize, Serialize};
use tracing::trace;

use fieldmap_core::LngLat;

/// Camera-change notification from the map surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraChangedEvent {
    #[serde(default)]
    pub center: Option<LngLat>,
    #[serde(default)]
    pub zoom: Option<f64>,
    /// Set by the surface when the change came from a touch gesture
    #[serde(default)]
    pub is_user_interaction: bool,
}

impl CameraChangedEvent {
    pub fn user() -> Self {
        Self {
            is_user_interaction: true,
            ..Self::default()
        }
    }

    pub fn programmatic() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    UserInitiated,
    Programmatic,
}

/// Splits camera changes into user gestures and our own camera moves
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    user_events: u64,
    programmatic_events: u64,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change counts as user-initiated only when the surface flags it as
    /// interactive and the camera is unlocked. Gestures are disabled on the
    /// surface while locked, so a locked interactive change is treated as
    /// programmatic.
    pub fn classify(&mut self, event: &CameraChangedEvent, locked: bool) -> GestureKind {
        let kind = if event.is_user_interaction && !locked {
            self.user_events += 1;
            GestureKind::UserInitiated
        } else {
            self.programmatic_events += 1;
            GestureKind::Programmatic
        };
        trace!(?kind, locked, "Classified camera change");
        kind
    }

    pub fn user_events(&self) -> u64 {
        self.user_events
    }

    pub fn programmatic_events(&self) -> u64 {
        self.programmatic_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_unlocked_is_user_initiated() {
        let mut tracker = GestureTracker::new();
        assert_eq!(
            tracker.classify(&CameraChangedEvent::user(), false),
            GestureKind::UserInitiated
        );
        assert_eq!(tracker.user_events(), 1);
    }

    #[test]
    fn test_interactive_while_locked_is_programmatic() {
        let mut tracker = GestureTracker::new();
        assert_eq!(
            tracker.classify(&CameraChangedEvent::user(), true),
            GestureKind::Programmatic
        );
        assert_eq!(tracker.user_events(), 0);
        assert_eq!(tracker.programmatic_events(), 1);
    }

    #[test]
    fn test_non_interactive_is_programmatic() {
        let mut tracker = GestureTracker::new();
        for locked in [false, true] {
            assert_eq!(
                tracker.classify(&CameraChangedEvent::programmatic(), locked),
                GestureKind::Programmatic
            );
        }
        assert_eq!(tracker.programmatic_events(), 2);
    }

    #[test]
    fn test_event_deserializes_from_surface_payload() {
        let event: CameraChangedEvent = serde_json::from_str(
            r#"{"center":{"lon":-74.0,"lat":40.7},"zoom":13.5,"isUserInteraction":true}"#,
        )
        .unwrap();
        assert!(event.is_user_interaction);
        assert_eq!(event.zoom, Some(13.5));
    }
}
