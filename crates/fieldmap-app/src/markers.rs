//! Marker aggregation: one cancelable initial fetch plus the push channel
//!
//! The marker set has two writers. The initial fetch runs once each time the
//! lifecycle gate opens; the push channel delivers complete marker batches at
//! any time. Each fetch runs under a [`FetchSession`] with a monotonically
//! increasing [`FetchSessionId`]. A fetch result is applied only if its id is
//! still the live session, so a result from a cancelled or superseded session
//! can never overwrite newer data.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

use fieldmap_core::prelude::Result;
use fieldmap_core::{MapData, Marker, MarkerSet, MarkerSource, RecommendedCenter};

/// Identity of one initial-fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FetchSessionId(u64);

impl FetchSessionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FetchSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch-{}", self.0)
    }
}

/// Aggregator-side handle of the in-flight fetch
#[derive(Debug)]
pub struct FetchSession {
    id: FetchSessionId,
    cancel_tx: watch::Sender<bool>,
}

impl FetchSession {
    fn open(id: FetchSessionId) -> (Self, FetchCancel) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (Self { id, cancel_tx }, FetchCancel { rx: cancel_rx })
    }

    pub fn id(&self) -> FetchSessionId {
        self.id
    }

    fn abort(self) {
        // No receivers left just means the task already finished
        let _ = self.cancel_tx.send(true);
    }
}

/// Cancellation token handed to the fetch task and the fetch collaborator.
///
/// Dropping the owning [`FetchSession`] also counts as cancellation.
#[derive(Debug, Clone)]
pub struct FetchCancel {
    rx: watch::Receiver<bool>,
}

impl FetchCancel {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the session is cancelled
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// What happened to a fetch result handed to the aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Markers replaced; carries the validated suggestion, if any
    Applied {
        count: usize,
        suggestion: Option<RecommendedCenter>,
    },
    /// Result belonged to a cancelled or superseded session
    Stale,
    /// The live session reported a cancellation
    Aborted,
    /// The live session failed; markers untouched
    Failed { error: String },
}

/// Owner of the marker set and the fetch session
#[derive(Debug)]
pub struct MarkerAggregator {
    markers: MarkerSet,
    session: Option<FetchSession>,
    next_session: u64,
    ready: bool,
    suggestion_zoom: f64,
}

impl MarkerAggregator {
    pub fn new(suggestion_zoom: f64) -> Self {
        Self {
            markers: MarkerSet::new(),
            session: None,
            next_session: 0,
            ready: false,
            suggestion_zoom,
        }
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn in_flight(&self) -> Option<FetchSessionId> {
        self.session.as_ref().map(FetchSession::id)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Feed the gate's `ready` value.
    ///
    /// Opens a new session only on a false -> true edge with nothing in
    /// flight; the returned token goes to the fetch task. Repeating the same
    /// value is a no-op. Dropping to false cancels the live session.
    pub fn start(&mut self, ready: bool) -> Option<(FetchSessionId, FetchCancel)> {
        let was_ready = std::mem::replace(&mut self.ready, ready);

        if !ready {
            if was_ready {
                self.cancel();
            }
            return None;
        }
        if was_ready {
            return None;
        }
        if let Some(live) = self.in_flight() {
            debug!("Fetch {} already in flight, not starting another", live);
            return None;
        }

        self.next_session += 1;
        let id = FetchSessionId(self.next_session);
        let (session, cancel) = FetchSession::open(id);
        self.session = Some(session);
        info!("Starting map data fetch {}", id);
        Some((id, cancel))
    }

    /// Abort the live session, if any
    pub fn cancel(&mut self) -> Option<FetchSessionId> {
        let session = self.session.take()?;
        let id = session.id();
        session.abort();
        debug!("Cancelled map data fetch {}", id);
        Some(id)
    }

    /// Replace the marker set with a pushed batch.
    ///
    /// Each push is complete and authoritative, so a fetch still in flight
    /// is superseded and its result will be discarded.
    pub fn on_push_update(&mut self, markers: Vec<Marker>) {
        if let Some(id) = self.cancel() {
            debug!("Push update superseded {}", id);
        }
        self.markers.replace(markers, MarkerSource::Push);
        debug!(
            count = self.markers.len(),
            revision = self.markers.revision(),
            "Applied pushed markers"
        );
    }

    /// Apply a fetch result if it belongs to the live session
    pub fn on_fetch_result(&mut self, id: FetchSessionId, result: Result<MapData>) -> FetchOutcome {
        if self.in_flight() != Some(id) {
            debug!("Discarding result of stale {}", id);
            return FetchOutcome::Stale;
        }
        self.session = None;

        match result {
            Ok(data) => {
                let suggestion = data
                    .recommended_center
                    .as_ref()
                    .and_then(|raw| match RecommendedCenter::parse(raw, self.suggestion_zoom) {
                        Ok(center) => Some(center),
                        Err(e) => {
                            debug!("Discarding recommended center: {}", e);
                            None
                        }
                    });
                self.markers.replace(data.markers, MarkerSource::InitialFetch);
                info!(
                    "Map data fetch {} applied {} marker(s)",
                    id,
                    self.markers.len()
                );
                FetchOutcome::Applied {
                    count: self.markers.len(),
                    suggestion,
                }
            }
            Err(e) if e.is_aborted() => {
                debug!("Map data fetch {} aborted", id);
                FetchOutcome::Aborted
            }
            Err(e) => {
                error!("{} ({})", e, id);
                FetchOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Drop markers and cancel any fetch (screen unmount)
    pub fn reset(&mut self) {
        self.cancel();
        self.ready = false;
        self.markers.clear();
    }
}

impl Default for MarkerAggregator {
    fn default() -> Self {
        Self::new(fieldmap_core::DEFAULT_SUGGESTION_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::Error;
    use serde_json::json;

    fn markers(ids: &[&str]) -> Vec<Marker> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Marker::new(*id, 40.0 + i as f64, -74.0))
            .collect()
    }

    fn data(ids: &[&str]) -> MapData {
        MapData {
            markers: markers(ids),
            recommended_center: None,
        }
    }

    #[test]
    fn test_start_opens_one_session_per_ready_edge() {
        let mut agg = MarkerAggregator::default();

        let (id, _cancel) = agg.start(true).expect("session");
        assert_eq!(agg.in_flight(), Some(id));

        assert!(agg.start(true).is_none());
        assert_eq!(agg.in_flight(), Some(id));
    }

    #[test]
    fn test_start_false_is_noop_when_never_ready() {
        let mut agg = MarkerAggregator::default();
        assert!(agg.start(false).is_none());
        assert!(agg.in_flight().is_none());
    }

    #[test]
    fn test_ready_drop_cancels_session() {
        let mut agg = MarkerAggregator::default();
        let (_, cancel) = agg.start(true).unwrap();

        agg.start(false);

        assert!(agg.in_flight().is_none());
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_ready_again_starts_fresh_session() {
        let mut agg = MarkerAggregator::default();
        let (first, _) = agg.start(true).unwrap();
        agg.start(false);
        let (second, _) = agg.start(true).unwrap();

        assert!(second > first);
        assert_eq!(agg.in_flight(), Some(second));
    }

    #[test]
    fn test_cancel_twice_is_safe() {
        let mut agg = MarkerAggregator::default();
        assert!(agg.cancel().is_none());

        let (id, cancel) = agg.start(true).unwrap();
        assert_eq!(agg.cancel(), Some(id));
        assert!(agg.cancel().is_none());
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_fetch_success_replaces_markers() {
        let mut agg = MarkerAggregator::default();
        let (id, _) = agg.start(true).unwrap();

        let outcome = agg.on_fetch_result(id, Ok(data(&["a", "b"])));

        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                count: 2,
                suggestion: None
            }
        );
        assert_eq!(agg.markers().len(), 2);
        assert_eq!(agg.markers().source(), Some(MarkerSource::InitialFetch));
        assert!(agg.in_flight().is_none());
    }

    #[test]
    fn test_fetch_success_surfaces_valid_suggestion() {
        let mut agg = MarkerAggregator::new(12.0);
        let (id, _) = agg.start(true).unwrap();

        let outcome = agg.on_fetch_result(
            id,
            Ok(MapData {
                markers: markers(&["a"]),
                recommended_center: Some(json!({"lat": 40.7, "lon": -74.0})),
            }),
        );

        let FetchOutcome::Applied { suggestion, .. } = outcome else {
            panic!("expected Applied, got {outcome:?}");
        };
        let center = suggestion.expect("suggestion");
        assert_eq!(center.zoom, 12.0);
    }

    #[test]
    fn test_malformed_suggestion_is_dropped_but_markers_kept() {
        let mut agg = MarkerAggregator::default();
        let (id, _) = agg.start(true).unwrap();

        let outcome = agg.on_fetch_result(
            id,
            Ok(MapData {
                markers: markers(&["a", "b"]),
                recommended_center: Some(json!({"lat": "bad", "lon": -74.0, "zoom": "12"})),
            }),
        );

        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                count: 2,
                suggestion: None
            }
        );
    }

    #[test]
    fn test_push_then_stale_fetch_keeps_push() {
        let mut agg = MarkerAggregator::default();
        let (id, cancel) = agg.start(true).unwrap();

        agg.on_push_update(markers(&["p1", "p2", "p3"]));
        assert!(cancel.is_cancelled());

        let outcome = agg.on_fetch_result(id, Ok(data(&["f1", "f2"])));

        assert_eq!(outcome, FetchOutcome::Stale);
        let ids: Vec<&str> = agg.markers().as_slice().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(agg.markers().source(), Some(MarkerSource::Push));
    }

    #[test]
    fn test_aborted_result_does_not_touch_markers() {
        let mut agg = MarkerAggregator::default();
        agg.on_push_update(markers(&["p1"]));
        let revision = agg.markers().revision();

        let (id, _) = agg.start(true).unwrap();
        let outcome = agg.on_fetch_result(id, Err(Error::FetchAborted));

        assert_eq!(outcome, FetchOutcome::Aborted);
        assert_eq!(agg.markers().revision(), revision);
        assert_eq!(agg.markers().len(), 1);
    }

    #[test]
    fn test_failed_result_does_not_touch_markers() {
        let mut agg = MarkerAggregator::default();
        agg.on_push_update(markers(&["p1", "p2"]));
        let revision = agg.markers().revision();

        let (id, _) = agg.start(true).unwrap();
        let outcome = agg.on_fetch_result(id, Err(Error::fetch_failed("HTTP 500")));

        assert!(matches!(outcome, FetchOutcome::Failed { ref error } if error.contains("HTTP 500")));
        assert_eq!(agg.markers().revision(), revision);
        assert_eq!(agg.markers().len(), 2);
        assert!(agg.in_flight().is_none());
    }

    #[test]
    fn test_result_after_cancel_is_stale() {
        let mut agg = MarkerAggregator::default();
        let (id, _) = agg.start(true).unwrap();
        agg.cancel();

        assert_eq!(agg.on_fetch_result(id, Ok(data(&["x"]))), FetchOutcome::Stale);
        assert!(agg.markers().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut agg = MarkerAggregator::default();
        agg.on_push_update(markers(&["p1"]));
        let (_, cancel) = agg.start(true).unwrap();

        agg.reset();

        assert!(agg.markers().is_empty());
        assert!(!agg.is_ready());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_abort() {
        let mut agg = MarkerAggregator::default();
        let (_, mut cancel) = agg.start(true).unwrap();

        let waiter = tokio::spawn(async move {
            cancel.cancelled().await;
        });
        agg.cancel();

        tokio_test::assert_ok!(waiter.await);
    }

    #[tokio::test]
    async fn test_dropping_session_counts_as_cancel() {
        let (session, mut cancel) = FetchSession::open(FetchSessionId(1));
        drop(session);
        cancel.cancelled().await;
        assert!(cancel.is_cancelled());
    }
}
