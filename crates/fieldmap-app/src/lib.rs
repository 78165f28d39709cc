//! fieldmap-app - Camera follow and marker reconciliation for the field map
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the map
//! screen: one `handler::update` transition function over `MapScreenState`,
//! the `Engine` that drives it, configuration loading, collaborator traits
//! and the forwarder tasks that bridge external feeds.

pub mod actions;
pub mod camera;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod gesture;
pub mod handler;
pub mod lifecycle;
pub mod markers;
pub mod message;
pub mod process;
pub mod services;
pub mod signals;
pub mod spawn;
pub mod state;

// Re-export primary types
pub use camera::{CameraController, CameraMode};
pub use config::Settings;
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use gesture::{CameraChangedEvent, GestureKind, GestureTracker};
pub use handler::{UpdateAction, UpdateResult};
pub use lifecycle::{GateTransition, LifecycleGate, ReadinessFlag};
pub use markers::{FetchCancel, FetchOutcome, FetchSessionId, MarkerAggregator};
pub use message::Message;
pub use services::{LocalMapDataFetch, MapDataFetch, MapSurface, RecordingSurface};
pub use state::{MapScreenState, ScreenPhase};
