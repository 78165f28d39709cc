//! Scenario files: one JSON event per line
//!
//! ```text
//! # comments and blank lines are skipped
//! {"type":"location","latitude":40.71,"longitude":-74.0,"heading":null,"isLocked":false}
//! {"type":"readiness","flag":"authenticated","value":true}
//! {"type":"surface_ready"}
//! {"type":"push","markers":[{"id":"a","latitude":40.7,"longitude":-74.0}]}
//! {"type":"wait","ms":200}
//! ```

use serde::Deserialize;

use fieldmap_app::{CameraChangedEvent, Message, ReadinessFlag};
use fieldmap_core::prelude::*;
use fieldmap_core::{LocationSample, Marker};

/// One step of a replay
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Location sample, in the location collaborator's wire shape
    Location(LocationSample),
    /// Explicit lock toggle
    Lock { locked: bool },
    /// Camera change reported by the surface
    Gesture(CameraChangedEvent),
    /// Recenter button
    Recenter,
    /// One readiness input
    Readiness { flag: ReadinessFlag, value: bool },
    /// Map surface finished loading
    SurfaceReady,
    /// Complete batch from the push channel
    Push { markers: Vec<Marker> },
    /// Pin tap
    PinSelected { marker_id: String },
    /// Let background work (the initial fetch) run for a while
    Wait { ms: u64 },
    /// Tear the screen down
    Unmount,
}

impl ScenarioEvent {
    /// The engine message for this step; `None` for `wait`
    pub fn into_message(self) -> Option<Message> {
        let msg = match self {
            ScenarioEvent::Location(sample) => Message::LocationUpdated(sample),
            ScenarioEvent::Lock { locked } => Message::LockToggled { locked },
            ScenarioEvent::Gesture(event) => Message::CameraChanged(event),
            ScenarioEvent::Recenter => Message::RecenterRequested,
            ScenarioEvent::Readiness { flag, value } => Message::ReadinessChanged { flag, value },
            ScenarioEvent::SurfaceReady => Message::SurfaceReady,
            ScenarioEvent::Push { markers } => Message::PushMarkers { markers },
            ScenarioEvent::PinSelected { marker_id } => Message::PinSelected { marker_id },
            ScenarioEvent::Wait { .. } => return None,
            ScenarioEvent::Unmount => Message::Unmount,
        };
        Some(msg)
    }
}

/// Parse a whole scenario. Line numbers in errors are 1-based.
pub fn parse_scenario(text: &str) -> Result<Vec<ScenarioEvent>> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str::<ScenarioEvent>(trimmed)
            .map_err(|e| Error::scenario(idx + 1, e.to_string()))?;
        events.push(event);
    }
    debug!("Parsed {} scenario step(s)", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::Heading;

    #[test]
    fn test_parse_location_with_null_heading() {
        let events = parse_scenario(
            r#"{"type":"location","latitude":40.71,"longitude":-74.0,"heading":null,"isLocked":false}"#,
        )
        .unwrap();

        match &events[0] {
            ScenarioEvent::Location(sample) => {
                assert_eq!(sample.latitude, Some(40.71));
                assert_eq!(sample.heading, Heading::NoHeading);
                assert!(!sample.is_locked);
            }
            other => panic!("expected location, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let text = "# warm up\n\n{\"type\":\"surface_ready\"}\n   \n{\"type\":\"wait\",\"ms\":50}\n";
        let events = parse_scenario(text).unwrap();

        assert_eq!(
            events,
            vec![ScenarioEvent::SurfaceReady, ScenarioEvent::Wait { ms: 50 }]
        );
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let text = "{\"type\":\"recenter\"}\n{\"type\":\"teleport\"}\n";
        let err = parse_scenario(text).unwrap_err();

        assert!(matches!(err, Error::Scenario { line: 2, .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_readiness_and_gesture_map_to_messages() {
        let events = parse_scenario(
            "{\"type\":\"readiness\",\"flag\":\"foregrounded\",\"value\":false}\n\
             {\"type\":\"gesture\",\"isUserInteraction\":true}\n",
        )
        .unwrap();
        let messages: Vec<Message> = events
            .into_iter()
            .filter_map(ScenarioEvent::into_message)
            .collect();

        assert!(matches!(
            messages[0],
            Message::ReadinessChanged {
                flag: ReadinessFlag::Foregrounded,
                value: false
            }
        ));
        assert!(matches!(
            messages[1],
            Message::CameraChanged(CameraChangedEvent {
                is_user_interaction: true,
                ..
            })
        ));
    }

    #[test]
    fn test_wait_has_no_message() {
        assert!(ScenarioEvent::Wait { ms: 10 }.into_message().is_none());
    }
}
