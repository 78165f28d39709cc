//! Collaborator traits injected into the engine
//!
//! The engine never reaches for ambient state: the map-data endpoint and the
//! map surface are handed to [`crate::Engine::new`].

use fieldmap_core::prelude::*;
use fieldmap_core::{CameraCommand, MapData};

use crate::markers::FetchCancel;

/// Source of the initial marker data.
///
/// Implementations should watch `cancel` and give up early when it fires;
/// the engine also races the call against the same token, so an
/// implementation that ignores it is still safe.
#[trait_variant::make(MapDataFetch: Send)]
pub trait LocalMapDataFetch {
    async fn fetch(&self, cancel: FetchCancel) -> Result<MapData>;
}

/// Consumer of camera commands
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send {
    /// Apply one camera move. Errors are logged and never retried.
    fn set_camera(&mut self, command: &CameraCommand) -> Result<()>;
}

/// Surface that only records what it was told, for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<CameraCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&CameraCommand> {
        self.commands.last()
    }
}

impl MapSurface for RecordingSurface {
    fn set_camera(&mut self, command: &CameraCommand) -> Result<()> {
        trace!(zoom = command.zoom, "Recording camera command");
        self.commands.push(*command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::LngLat;

    #[test]
    fn test_recording_surface_keeps_order() {
        let mut surface = RecordingSurface::new();
        for zoom in [12.0, 16.0] {
            let command = CameraCommand {
                center: LngLat::new(-74.0, 40.71),
                zoom,
                heading: None,
                pitch: 0.0,
                animation_duration_ms: 1000,
            };
            surface.set_camera(&command).unwrap();
        }

        assert_eq!(surface.commands.len(), 2);
        assert_eq!(surface.last().map(|c| c.zoom), Some(16.0));
    }

    #[test]
    fn test_mock_surface_sees_command() {
        let mut surface = MockMapSurface::new();
        surface
            .expect_set_camera()
            .withf(|command| command.zoom == 16.0)
            .times(1)
            .returning(|_| Ok(()));

        let command = CameraCommand {
            center: LngLat::new(0.0, 0.0),
            zoom: 16.0,
            heading: Some(90.0),
            pitch: 45.0,
            animation_duration_ms: 500,
        };
        assert!(surface.set_camera(&command).is_ok());
    }
}
