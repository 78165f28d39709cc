//! Map markers and the in-memory marker set

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A pin on the map. Identity is `id`; everything the pin layer or the
/// detail sheet needs beyond the basics rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Marker {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            title: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Where the current marker set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSource {
    InitialFetch,
    Push,
}

impl std::fmt::Display for MarkerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerSource::InitialFetch => write!(f, "initial fetch"),
            MarkerSource::Push => write!(f, "push"),
        }
    }
}

/// The full set of markers currently shown.
///
/// Every replacement bumps `revision`, so observers can tell whether the
/// set changed without diffing it.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    revision: u64,
    source: Option<MarkerSource>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with `batch`.
    ///
    /// Duplicate ids inside the batch resolve last-write-wins: the marker
    /// keeps the position of its first occurrence and the value of its last.
    pub fn replace(&mut self, batch: Vec<Marker>, source: MarkerSource) {
        self.markers = dedup_last_write_wins(batch);
        self.revision += 1;
        self.source = Some(source);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.revision += 1;
        self.source = None;
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn source(&self) -> Option<MarkerSource> {
        self.source
    }
}

fn dedup_last_write_wins(batch: Vec<Marker>) -> Vec<Marker> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(batch.len());
    let mut out: Vec<Marker> = Vec::with_capacity(batch.len());

    for marker in batch {
        match positions.get(&marker.id) {
            Some(&idx) => out[idx] = marker,
            None => {
                positions.insert(marker.id.clone(), out.len());
                out.push(marker);
            }
        }
    }

    out
}
