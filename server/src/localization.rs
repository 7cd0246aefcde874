// server/src/localization.rs
//
// Chat phrases. The host's translation files win; the built-in English
// table (mirrors lang/en.json) covers keys the host doesn't know.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::host::{HostContext, PlayerSlot};

pub const SNOW_ENABLED_KEY: &str = "snow.enabled";
pub const SNOW_DISABLED_KEY: &str = "snow.disabled";

lazy_static! {
    static ref FALLBACK_PHRASES: HashMap<&'static str, &'static str> = {
        let mut phrases = HashMap::new();
        phrases.insert(SNOW_ENABLED_KEY, "[Snow] Snow effect enabled.");
        phrases.insert(SNOW_DISABLED_KEY, "[Snow] Snow effect disabled.");
        phrases
    };
}

/// Resolves `key` for the player in `slot`. Unknown keys come back verbatim.
pub fn phrase(ctx: &HostContext<'_>, slot: PlayerSlot, key: &str) -> String {
    if let Some(text) = ctx.host.localize(slot, key) {
        return text;
    }
    match FALLBACK_PHRASES.get(key) {
        Some(text) => text.to_string(),
        None => {
            log::warn!("[Localization] Missing phrase '{}'.", key);
            key.to_string()
        }
    }
}

pub fn toggle_phrase_key(enabled: bool) -> &'static str {
    if enabled {
        SNOW_ENABLED_KEY
    } else {
        SNOW_DISABLED_KEY
    }
}
