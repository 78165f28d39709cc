//! Headless replay runner - feeds a scenario through the engine
//!
//! Each step becomes one engine message. After every step the runner drains
//! whatever background tasks reported (fetch results) and prints the engine
//! events produced so far. `wait` steps keep pumping messages until their
//! deadline so a delayed fetch can land mid-scenario.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{info, warn};

use fieldmap_app::{signals, Engine, EngineEvent, MapDataFetch, RecordingSurface, Settings};
use fieldmap_core::prelude::*;

use super::fixture::FixtureFetch;
use super::scenario::{parse_scenario, ScenarioEvent};
use super::HeadlessEvent;

/// How the replay's initial fetch behaves
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub map_data: Option<PathBuf>,
    pub fetch_error: Option<String>,
    pub fetch_delay_ms: u64,
}

/// Replay a scenario file, writing NDJSON events to stdout
pub async fn run_headless(scenario: &Path, settings: Settings, options: ReplayOptions) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("fieldmap starting in HEADLESS replay mode");
    info!("Scenario: {}", scenario.display());
    info!("═══════════════════════════════════════════════════════");

    let text = std::fs::read_to_string(scenario)
        .with_context(|| format!("Failed to read scenario {}", scenario.display()))?;
    let steps = parse_scenario(&text)?;

    let fetcher = FixtureFetch::load(
        options.map_data.as_deref(),
        options.fetch_error.as_deref(),
        Duration::from_millis(options.fetch_delay_ms),
    )?;

    let mut engine = Engine::new(settings, fetcher, Box::new(RecordingSurface::new()));
    let mut events_rx = engine.subscribe();
    signals::spawn_signal_handler(engine.msg_sender());

    HeadlessEvent::replay_started(&scenario.display().to_string(), steps.len()).emit();

    replay(&mut engine, &mut events_rx, steps).await;

    HeadlessEvent::replay_finished(engine.state.markers().len(), engine.state.camera_mode()).emit();

    engine.shutdown().await;
    forward_events(&mut events_rx);

    info!("Replay finished");
    Ok(())
}

/// Run every step in order; stops early once the screen unmounts
async fn replay<F>(
    engine: &mut Engine<F>,
    events_rx: &mut broadcast::Receiver<EngineEvent>,
    steps: Vec<ScenarioEvent>,
) where
    F: MapDataFetch + Sync + 'static,
{
    for step in steps {
        match step {
            ScenarioEvent::Wait { ms } => {
                pump_until(engine, events_rx, Instant::now() + Duration::from_millis(ms)).await
            }
            other => {
                if let Some(msg) = other.into_message() {
                    engine.process_message(msg);
                }
                engine.drain_pending_messages();
            }
        }
        forward_events(events_rx);

        if engine.is_unmounted() {
            info!("Screen unmounted, skipping remaining steps");
            break;
        }
    }
}

/// Process background messages as they arrive until `deadline`
async fn pump_until<F>(
    engine: &mut Engine<F>,
    events_rx: &mut broadcast::Receiver<EngineEvent>,
    deadline: Instant,
) where
    F: MapDataFetch + Sync + 'static,
{
    while !engine.is_unmounted() {
        let msg = match tokio::time::timeout_at(deadline, engine.msg_rx.recv()).await {
            Ok(Some(msg)) => msg,
            Ok(None) | Err(_) => break,
        };
        engine.process_message(msg);
        forward_events(events_rx);
    }
}

/// Print every engine event received so far
fn forward_events(events_rx: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events_rx.try_recv() {
            Ok(event) => HeadlessEvent::from_engine(&event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} event(s) dropped", skipped);
            }
            Err(_) => break,
        }
    }
}
