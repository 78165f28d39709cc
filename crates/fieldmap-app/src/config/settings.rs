//! Settings parser for .fieldmap/config.toml

use super::types::Settings;
use fieldmap_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const FIELDMAP_DIR: &str = ".fieldmap";

/// Load settings from `.fieldmap/config.toml` beneath `base_path`.
///
/// A missing, unreadable, unparsable or invalid file yields the defaults;
/// the map screen must come up regardless of local configuration.
pub fn load_settings(base_path: &Path) -> Settings {
    let config_path = base_path.join(FIELDMAP_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => match settings.camera.validate() {
                Ok(()) => {
                    debug!("Loaded settings from {:?}", config_path);
                    settings
                }
                Err(reason) => {
                    warn!("Ignoring {:?}: {}", config_path, reason);
                    Settings::default()
                }
            },
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config in `.fieldmap/`
pub fn init_config_dir(base_path: &Path) -> Result<()> {
    let fieldmap_dir = base_path.join(FIELDMAP_DIR);

    if !fieldmap_dir.exists() {
        std::fs::create_dir_all(&fieldmap_dir)
            .map_err(|e| Error::config(format!("Failed to create .fieldmap dir: {}", e)))?;
    }

    let config_path = fieldmap_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# fieldmap configuration

[camera]
locked_zoom = 16.0          # Navigation (locked) zoom
locked_pitch = 45.0         # Navigation tilt in degrees
locked_animation_ms = 500
unlocked_zoom = 12.0        # Overview (unlocked) zoom
unlocked_animation_ms = 1000
suggestion_zoom = 12.0      # Used when the server's recommended center has no zoom

[markers]
apply_recommended_center = true
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    }

    Ok(())
}
