//! Engine - owns the map screen state and drives the TEA loop
//!
//! The engine owns the message channel, the event broadcaster, the shutdown
//! signal and the injected collaborators. Frontends (the headless replay
//! runner, tests) feed it messages and subscribe to its events.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use fieldmap_core::{LocationSample, Marker};

use crate::camera::CameraMode;
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::services::{MapDataFetch, MapSurface};
use crate::spawn;
use crate::state::MapScreenState;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StateSnapshot {
    mode: CameraMode,
    ready: bool,
    marker_revision: u64,
}

impl StateSnapshot {
    fn capture(state: &MapScreenState) -> Self {
        Self {
            mode: state.camera_mode(),
            ready: state.gate.ready(),
            marker_revision: state.marker_revision(),
        }
    }
}

/// Map screen engine.
///
/// Generic over the map-data fetcher so tests and the replay binary can
/// inject their own; the map surface is a trait object since it is only
/// called synchronously from the update loop.
pub struct Engine<F> {
    /// TEA state (the Model)
    pub state: MapScreenState,

    /// Sender half of the message channel; clone it for input sources
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the message channel
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to stop forwarders.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    fetcher: Arc<F>,
    surface: Box<dyn MapSurface>,

    /// Forwarder tasks started via `attach_*`
    forwarders: Vec<JoinHandle<()>>,

    /// Event broadcaster for external consumers
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<F> Engine<F>
where
    F: MapDataFetch + Sync + 'static,
{
    /// Create an engine with explicitly injected collaborators.
    ///
    /// - Creates MapScreenState from settings
    /// - Creates message channel (capacity 256)
    /// - Creates shutdown signal channel
    /// - Creates broadcast channel for engine events (capacity 256)
    pub fn new(settings: Settings, fetcher: F, surface: Box<dyn MapSurface>) -> Self {
        let state = MapScreenState::new(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            fetcher: Arc::new(fetcher),
            surface,
            forwarders: Vec::new(),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Bridge a location source into the engine
    pub fn attach_location_source(&mut self, location_rx: watch::Receiver<LocationSample>) {
        let handle = spawn::spawn_location_forwarder(
            location_rx,
            self.msg_tx.clone(),
            self.shutdown_rx.clone(),
        );
        self.forwarders.push(handle);
    }

    /// Bridge the push channel into the engine
    pub fn attach_push_channel(&mut self, push_rx: mpsc::Receiver<Vec<Marker>>) {
        let handle =
            spawn::spawn_push_forwarder(push_rx, self.msg_tx.clone(), self.shutdown_rx.clone());
        self.forwarders.push(handle);
    }

    /// Whether the screen has been unmounted
    pub fn is_unmounted(&self) -> bool {
        self.state.is_unmounted()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Runs the update loop, dispatches resulting actions, then emits
    /// EngineEvents for state changes detected by comparing snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.fetcher,
            self.surface.as_mut(),
            &self.event_tx,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Process messages until the screen unmounts or every sender is gone
    pub async fn run(&mut self) {
        while !self.state.is_unmounted() {
            let Some(msg) = self.msg_rx.recv().await else {
                debug!("Message channel closed");
                break;
            };
            self.process_message(msg);
        }
    }

    /// Cancel the live fetch, stop forwarders and notify subscribers
    pub async fn shutdown(&mut self) {
        info!("Shutting down map engine");
        self.emit(EngineEvent::Shutdown);

        if let Some(id) = self.state.markers.cancel() {
            debug!("Cancelled {} on shutdown", id);
        }

        let _ = self.shutdown_tx.send(true);

        for handle in self.forwarders.drain(..) {
            match tokio::time::timeout(std::time::Duration::from_secs(2), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Forwarder task panicked: {}", e),
                Err(_) => warn!("Forwarder task shutdown timed out"),
            }
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.ready != post.ready {
            self.emit(EngineEvent::ReadinessChanged { ready: post.ready });
        }

        if pre.mode != post.mode {
            self.emit(EngineEvent::CameraModeChanged {
                old: pre.mode,
                new: post.mode,
            });
        }

        if pre.marker_revision != post.marker_revision {
            let set = self.state.markers.markers();
            self.emit(EngineEvent::MarkersChanged {
                markers: set.as_slice().to_vec(),
                source: set.source(),
                revision: set.revision(),
            });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers; that is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::FetchCancel;
    use crate::services::RecordingSurface;
    use fieldmap_core::prelude::Result;
    use fieldmap_core::{MapData, MarkerSource};

    /// Fetcher that never resolves on its own
    struct PendingFetch;

    impl MapDataFetch for PendingFetch {
        async fn fetch(&self, mut cancel: FetchCancel) -> Result<MapData> {
            cancel.cancelled().await;
            Err(fieldmap_core::Error::FetchAborted)
        }
    }

    fn engine() -> Engine<PendingFetch> {
        Engine::new(
            Settings::default(),
            PendingFetch,
            Box::new(RecordingSurface::new()),
        )
    }

    #[test]
    fn test_state_snapshot_capture() {
        let state = MapScreenState::default();
        let snapshot = StateSnapshot::capture(&state);

        assert_eq!(snapshot.mode, CameraMode::Idle);
        assert!(!snapshot.ready);
        assert_eq!(snapshot.marker_revision, 0);
    }

    #[tokio::test]
    async fn test_subscribe_receives_shutdown_event() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.shutdown().await;

        match tokio::time::timeout(std::time::Duration::from_millis(100), rx.recv()).await {
            Ok(Ok(event)) => assert!(matches!(event, EngineEvent::Shutdown)),
            _ => panic!("Should have received shutdown event"),
        }
    }

    #[tokio::test]
    async fn test_no_subscribers_no_error() {
        let mut engine = engine();
        engine.process_message(Message::LocationUpdated(LocationSample::at(1.0, 2.0)));
    }

    #[tokio::test]
    async fn test_first_fix_emits_mode_change_and_command() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.process_message(Message::LocationUpdated(LocationSample::at(40.71, -74.0)));

        let first = rx.try_recv().unwrap();
        assert!(matches!(first, EngineEvent::CameraCommandIssued { .. }));
        match rx.try_recv().unwrap() {
            EngineEvent::CameraModeChanged { old, new } => {
                assert_eq!(old, CameraMode::Idle);
                assert_eq!(new, CameraMode::FollowingUnlocked);
            }
            other => panic!("Expected CameraModeChanged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_push_emits_markers_changed() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        engine.process_message(Message::PushMarkers {
            markers: vec![Marker::new("a", 0.0, 0.0), Marker::new("b", 0.0, 0.0)],
        });

        match rx.try_recv().unwrap() {
            EngineEvent::MarkersChanged {
                markers,
                source,
                revision,
            } => {
                assert_eq!(markers.len(), 2);
                assert_eq!(source, Some(MarkerSource::Push));
                assert_eq!(revision, 1);
            }
            other => panic!("Expected MarkersChanged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_cancels_live_fetch() {
        let mut engine = engine();
        engine.process_message(Message::SurfaceReady);
        for flag in [
            crate::lifecycle::ReadinessFlag::Authenticated,
            crate::lifecycle::ReadinessFlag::CoreInitialized,
            crate::lifecycle::ReadinessFlag::Foregrounded,
        ] {
            engine.process_message(Message::ReadinessChanged { flag, value: true });
        }
        assert!(engine.state.markers.in_flight().is_some());

        engine.shutdown().await;

        assert!(engine.state.markers.in_flight().is_none());
    }
}
