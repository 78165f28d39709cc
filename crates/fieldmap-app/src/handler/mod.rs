//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `camera`: Location, lock, gesture and recenter handlers
//! - `markers`: Push-channel and fetch-result handlers
//! - `lifecycle`: Readiness and unmount handlers

pub(crate) mod camera;
pub(crate) mod lifecycle;
pub(crate) mod markers;
pub(crate) mod update;


use crate::markers::{FetchCancel, FetchSessionId};
use crate::message::Message;
use fieldmap_core::{CameraCommand, Marker};

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Send a camera command to the map surface
    SetCamera(CameraCommand),

    /// Spawn the initial map-data fetch for a freshly opened session.
    ///
    /// The task races the fetch against `cancel` and reports back with a
    /// `MapDataFetched` / `MapDataFetchFailed` / `MapDataFetchAborted`
    /// message tagged with `session_id`.
    FetchMapData {
        session_id: FetchSessionId,
        cancel: FetchCancel,
    },

    /// Hand a tapped pin to the detail-sheet collaborator, unmodified
    ForwardPinSelection { marker: Marker },

    /// Surface a non-fatal fetch failure to subscribers
    ReportFetchFailure {
        session_id: FetchSessionId,
        error: String,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Wrap an optional camera command
    pub fn camera(command: Option<CameraCommand>) -> Self {
        match command {
            Some(command) => Self::action(UpdateAction::SetCamera(command)),
            None => Self::none(),
        }
    }
}
