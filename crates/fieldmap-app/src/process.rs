//! Message processing through the TEA update loop

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::trace;

use crate::actions::handle_action;
use crate::engine_event::EngineEvent;
use crate::handler;
use crate::message::Message;
use crate::services::{MapDataFetch, MapSurface};
use crate::state::MapScreenState;

/// Process a message through the TEA update function.
///
/// Follow-up messages are handled in the same call, so a message and the
/// chain it triggers are applied as one step.
pub fn process_message<F>(
    state: &mut MapScreenState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    fetcher: &Arc<F>,
    surface: &mut dyn MapSurface,
    event_tx: &broadcast::Sender<EngineEvent>,
) where
    F: MapDataFetch + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        trace!("Processing {}", m.kind());
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx, fetcher, surface, event_tx);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
