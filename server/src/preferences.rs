/******************************************************************************
 *                                                                            *
 * Snow Preference Store                                                      *
 * Remembers whether each player wants the snow effect, keyed by Steam ID.   *
 * The whole mapping lives in one JSON file that is rewritten on every       *
 * change. Entries are never removed.                                         *
 *                                                                            *
 ******************************************************************************/

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::host::SteamId;

pub const DATA_FILE_NAME: &str = "snow_data.json";

/// Players who never toggled get the effect.
pub const DEFAULT_SNOW_ENABLED: bool = true;

/// On-disk layout of `snow_data.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnowData {
    #[serde(rename = "PlayerPreferences", default)]
    pub player_preferences: BTreeMap<SteamId, bool>,
}

pub struct PreferenceStore {
    path: PathBuf,
    data: SnowData,
}

impl PreferenceStore {
    /// Loads the store from `path`.
    ///
    /// A missing file is a fresh store. An unreadable or malformed file is
    /// logged and also treated as a fresh store.
    pub fn load(path: impl Into<PathBuf>) -> PreferenceStore {
        let path = path.into();
        let data = if path.exists() {
            match read_data(&path) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("[Snow] Error loading data: {}", e);
                    SnowData::default()
                }
            }
        } else {
            log::debug!("[Snow] No preference file at {}, starting empty.", path.display());
            SnowData::default()
        };

        log::info!(
            "[Snow] Loaded {} stored snow preference(s).",
            data.player_preferences.len()
        );
        PreferenceStore { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the full mapping over the data file.
    ///
    /// Failures are logged and otherwise ignored; the in-memory mapping stays
    /// authoritative for the rest of the process.
    pub fn save(&self) {
        if let Err(e) = write_data(&self.path, &self.data) {
            log::error!("[Snow] Error saving data: {}", e);
        }
    }

    pub fn get_preference(&self, steam_id: SteamId) -> bool {
        self.data
            .player_preferences
            .get(&steam_id)
            .copied()
            .unwrap_or(DEFAULT_SNOW_ENABLED)
    }

    /// Stores an explicit preference and saves immediately.
    pub fn set_preference(&mut self, steam_id: SteamId, enabled: bool) {
        self.data.player_preferences.insert(steam_id, enabled);
        self.save();
    }

    /// Flips the effective preference, persists it and returns the new value.
    pub fn toggle(&mut self, steam_id: SteamId) -> bool {
        let enabled = !self.get_preference(steam_id);
        self.set_preference(steam_id, enabled);
        enabled
    }

    /// Explicitly stored value, without the default applied.
    pub fn stored(&self, steam_id: SteamId) -> Option<bool> {
        self.data.player_preferences.get(&steam_id).copied()
    }

    pub fn len(&self) -> usize {
        self.data.player_preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.player_preferences.is_empty()
    }
}

fn read_data(path: &Path) -> Result<SnowData, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    serde_json::from_str(&json).map_err(|e| format!("parse {}: {}", path.display(), e))
}

fn write_data(path: &Path, data: &SnowData) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("create {}: {}", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(data).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| format!("write {}: {}", path.display(), e))
}
