//! Configuration file parsing for the map controller
//!
//! Supports:
//! - `.fieldmap/config.toml` - Camera profile and marker settings

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings};
pub use types::*;
