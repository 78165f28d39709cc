//! # fieldmap-core - Core Domain Types
//!
//! Foundation crate for the field map controller. Provides the value types
//! shared by the camera state machine and the marker aggregator, error
//! handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Location (`location`)
//! - [`LocationSample`] - One reading from the location collaborator
//! - [`Heading`] - Explicit present/absent compass heading
//! - [`Fix`] - A usable latitude/longitude pair
//!
//! ### Camera (`camera`)
//! - [`CameraCommand`] - A single camera move for the map surface
//! - [`LngLat`] - `(lon, lat)` center point
//!
//! ### Markers (`marker`, `map_data`)
//! - [`Marker`], [`MarkerSet`], [`MarkerSource`]
//! - [`MapData`] - Initial fetch payload
//! - [`RecommendedCenter`] - Validated server camera suggestion
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use fieldmap_core::prelude::*;
//! ```

pub mod camera;
pub mod error;
pub mod location;
pub mod logging;
pub mod map_data;
pub mod marker;

/// Prelude for common imports used throughout the fieldmap crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, trace, warn};
}

pub use camera::{CameraCommand, LngLat};
pub use error::{Error, Result, ResultExt};
pub use location::{Fix, Heading, LocationSample};
pub use map_data::{MapData, MapDataResponse, RecommendedCenter, DEFAULT_SUGGESTION_ZOOM, ZOOM_RANGE};
pub use marker::{Marker, MarkerSet, MarkerSource};
