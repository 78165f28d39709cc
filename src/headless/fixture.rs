//! Fixture-backed map-data fetcher for replays

use std::path::Path;
use std::time::Duration;

use fieldmap_app::{FetchCancel, MapDataFetch};
use fieldmap_core::prelude::*;
use fieldmap_core::MapData;

/// Serves one canned response after a fixed delay, honouring cancellation
#[derive(Debug, Clone)]
pub struct FixtureFetch {
    response: std::result::Result<MapData, String>,
    delay: Duration,
}

impl FixtureFetch {
    pub fn new(response: std::result::Result<MapData, String>, delay: Duration) -> Self {
        Self { response, delay }
    }

    /// Build from CLI options. The response file is parsed up front so a
    /// broken fixture fails the replay before any step runs.
    pub fn load(
        map_data: Option<&Path>,
        fetch_error: Option<&str>,
        delay: Duration,
    ) -> Result<Self> {
        let response = match (map_data, fetch_error) {
            (_, Some(message)) => Err(message.to_string()),
            (Some(path), None) => {
                let body = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read map data {}", path.display()))?;
                Ok(MapData::from_json(&body)
                    .with_context(|| format!("Failed to parse map data {}", path.display()))?)
            }
            (None, None) => Ok(MapData::default()),
        };
        Ok(Self::new(response, delay))
    }
}

impl MapDataFetch for FixtureFetch {
    async fn fetch(&self, mut cancel: FetchCancel) -> Result<MapData> {
        tokio::select! {
            _ = cancel.cancelled() => Err(Error::FetchAborted),
            _ = tokio::time::sleep(self.delay) => {
                self.response.clone().map_err(Error::fetch_failed)
            }
        }
    }
}
