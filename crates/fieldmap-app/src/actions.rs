//! Action handlers: side effects requested by the update function

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, warn};

use fieldmap_core::Error;

use crate::engine_event::EngineEvent;
use crate::handler::UpdateAction;
use crate::markers::{FetchCancel, FetchSessionId};
use crate::message::Message;
use crate::services::{MapDataFetch, MapSurface};

/// Execute an action returned by `handler::update`
pub fn handle_action<F>(
    action: UpdateAction,
    msg_tx: &mpsc::Sender<Message>,
    fetcher: &Arc<F>,
    surface: &mut dyn MapSurface,
    event_tx: &broadcast::Sender<EngineEvent>,
) where
    F: MapDataFetch + Sync + 'static,
{
    match action {
        UpdateAction::SetCamera(command) => match surface.set_camera(&command) {
            Ok(()) => {
                let _ = event_tx.send(EngineEvent::CameraCommandIssued { command });
            }
            Err(e) if e.is_recoverable() => warn!("Map surface rejected camera command: {}", e),
            Err(e) => error!("Map surface failed: {}", e),
        },

        UpdateAction::FetchMapData { session_id, cancel } => {
            let _ = event_tx.send(EngineEvent::MapDataFetchStarted { session_id });
            spawn_map_data_fetch(session_id, cancel, Arc::clone(fetcher), msg_tx.clone());
        }

        UpdateAction::ForwardPinSelection { marker } => {
            let _ = event_tx.send(EngineEvent::PinSelected { marker });
        }

        UpdateAction::ReportFetchFailure { session_id, error } => {
            let _ = event_tx.send(EngineEvent::MapDataFetchFailed { session_id, error });
        }
    }
}

/// Spawn the initial fetch for one session.
///
/// Races the fetch against the session's cancel token and always reports
/// back with exactly one message tagged by `session_id`.
pub(crate) fn spawn_map_data_fetch<F>(
    session_id: FetchSessionId,
    cancel: FetchCancel,
    fetcher: Arc<F>,
    msg_tx: mpsc::Sender<Message>,
) where
    F: MapDataFetch + Sync + 'static,
{
    tokio::spawn(async move {
        let mut cancelled = cancel.clone();

        let msg = tokio::select! {
            biased;

            _ = cancelled.cancelled() => {
                debug!("Map data fetch {} cancelled before it resolved", session_id);
                Message::MapDataFetchAborted { session_id }
            }

            result = fetcher.fetch(cancel) => match result {
                Ok(data) => Message::MapDataFetched { session_id, data },
                Err(e) if e.is_aborted() => Message::MapDataFetchAborted { session_id },
                Err(Error::FetchFailed { message }) => {
                    Message::MapDataFetchFailed { session_id, error: message }
                }
                Err(e) => Message::MapDataFetchFailed {
                    session_id,
                    error: e.to_string(),
                },
            },
        };

        // Engine gone means the screen is gone; nothing left to tell
        let _ = msg_tx.send(msg).await;
    });
}
