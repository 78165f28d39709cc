//! Forwarder tasks that bridge external feeds into the engine's message channel

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use fieldmap_core::{LocationSample, Marker};

use crate::message::Message;

/// Forward the latest location sample whenever it changes.
///
/// A `watch` channel only keeps the newest value, so a burst of samples that
/// arrives while the engine is busy collapses to the most recent one; samples
/// are never reordered.
pub fn spawn_location_forwarder(
    mut location_rx: watch::Receiver<LocationSample>,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = location_rx.changed() => {
                    if changed.is_err() {
                        debug!("Location source closed");
                        break;
                    }
                    let sample = *location_rx.borrow_and_update();
                    if !deliver(&msg_tx, Message::LocationUpdated(sample), &mut shutdown_rx).await {
                        break;
                    }
                }
                stop = shutdown_rx.changed() => {
                    if stop.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

/// Forward every batch delivered by the push channel, in order
pub fn spawn_push_forwarder(
    mut push_rx: mpsc::Receiver<Vec<Marker>>,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                batch = push_rx.recv() => {
                    let Some(markers) = batch else {
                        debug!("Push channel closed");
                        break;
                    };
                    if !deliver(&msg_tx, Message::PushMarkers { markers }, &mut shutdown_rx).await {
                        break;
                    }
                }
                stop = shutdown_rx.changed() => {
                    if stop.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

/// Send one message, waiting for room in the engine's queue unless shutdown
/// is signalled first. Returns false once the forwarder should stop.
async fn deliver(
    msg_tx: &mpsc::Sender<Message>,
    msg: Message,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> bool {
    let kind = msg.kind();
    tokio::select! {
        biased;

        _ = shutdown_rx.wait_for(|stop| *stop) => {
            debug!("Shutdown while waiting to forward {}", kind);
            false
        }
        sent = msg_tx.send(msg) => sent.is_ok(),
    }
}
