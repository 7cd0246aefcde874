// server/src/config.rs
//
// Plugin configuration. Parsed once at load and never reloaded; the host
// keeps the file at configs/plugins/SnowPlugin/SnowPlugin.json.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "SnowPlugin.json";
pub const DEFAULT_PARTICLE_NAME: &str = "particles/snow.vpcf";
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// Particle asset spawned on each player.
    #[serde(rename = "particle_name")]
    pub particle_name: String,
    /// Parsed and kept for compatibility with existing config files.
    /// Effects are still decided at spawn time from the stored preference.
    #[serde(rename = "CreateSnowOnConnect")]
    pub create_snow_on_connect: bool,
    #[serde(rename = "ConfigVersion")]
    pub config_version: u32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            particle_name: DEFAULT_PARTICLE_NAME.to_string(),
            create_snow_on_connect: false,
            config_version: CURRENT_CONFIG_VERSION,
        }
    }
}

impl SnowConfig {
    /// Reads the config at `path`.
    ///
    /// A missing file gets the defaults written out. A malformed file is
    /// logged and replaced in memory by the defaults; the file itself is
    /// left untouched.
    pub fn load_or_default(path: &Path) -> SnowConfig {
        if !path.exists() {
            let config = SnowConfig::default();
            log::info!("[SnowConfig] No config at {}, writing defaults.", path.display());
            if let Err(e) = config.write(path) {
                log::error!("[SnowConfig] Failed to write default config: {}", e);
            }
            return config;
        }

        match Self::read(path) {
            Ok(config) => {
                if config.config_version != CURRENT_CONFIG_VERSION {
                    log::warn!(
                        "[SnowConfig] Config version {} differs from expected {}.",
                        config.config_version,
                        CURRENT_CONFIG_VERSION
                    );
                }
                config
            }
            Err(e) => {
                log::warn!("[SnowConfig] Error loading config, using defaults: {}", e);
                SnowConfig::default()
            }
        }
    }

    fn read(path: &Path) -> Result<SnowConfig, String> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("read {}: {}", path.display(), e))?;
        serde_json::from_str(&json).map_err(|e| format!("parse {}: {}", path.display(), e))
    }

    fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }
}
