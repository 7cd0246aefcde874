use std::path::Path;

use crate::config::SnowConfig;
use crate::host::{HostContext, PlayerSlot};
use crate::preferences::{PreferenceStore, DATA_FILE_NAME};
use crate::schedule::ScheduledTask;
use crate::snow_effect::EffectController;

pub mod config;
pub mod host;
pub mod localization;
pub mod player_spawn; // Spawn-time effect creation
pub mod preferences;
pub mod schedule;
pub mod snow_command; // css_snow toggle
pub mod snow_effect;

#[cfg(test)]
mod test_support;

pub use host::{EntityHandle, HostRuntime, PlayerController, SteamId};
pub use schedule::{ScheduleAt, Scheduler, TaskQueue};
pub use snow_command::CommandOutcome;

// --- Plugin Metadata ---
pub const MODULE_NAME: &str = "Snow Plugin";
pub const MODULE_VERSION: &str = "1.2.0";
pub const MODULE_AUTHOR: &str = "ALBAN1776";
pub const MODULE_DESCRIPTION: &str = "Creates snow particle with localization support";

/// Plugin state for one load of the module.
///
/// The host calls into this from its simulation thread only: lifecycle
/// listeners, game events, console commands and due scheduled tasks.
pub struct SnowPlugin {
    pub(crate) config: SnowConfig,
    pub(crate) preferences: PreferenceStore,
    pub(crate) effects: EffectController,
}

impl SnowPlugin {
    /// Called by the host when the module is loaded.
    ///
    /// `module_directory` is where the plugin binary lives; the preference
    /// file is kept next to it.
    pub fn load(module_directory: &Path, config: SnowConfig, hot_reload: bool) -> SnowPlugin {
        log::info!(
            "[Snow] Loading {} v{} (hot reload: {}).",
            MODULE_NAME,
            MODULE_VERSION,
            hot_reload
        );
        log::info!(
            "[Snow] Particle '{}', create on connect: {}.",
            config.particle_name,
            config.create_snow_on_connect
        );

        let preferences = PreferenceStore::load(module_directory.join(DATA_FILE_NAME));

        SnowPlugin {
            config,
            preferences,
            effects: EffectController::new(),
        }
    }

    /// Called by the host before the module is dropped. Every tracked
    /// particle is destroyed so none outlive the plugin.
    pub fn unload(&mut self, ctx: &mut HostContext<'_>, hot_reload: bool) {
        log::info!(
            "[Snow] Unloading (hot reload: {}), removing {} effect(s).",
            hot_reload,
            self.effects.active_count()
        );
        self.effects.remove_all(ctx);
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn effects(&self) -> &EffectController {
        &self.effects
    }

    /// Client connected listener. Nothing to do until the player spawns.
    pub fn on_client_connected(&mut self, _ctx: &mut HostContext<'_>, slot: PlayerSlot) {
        log::debug!("[Connect] Slot {} connected.", slot);
    }

    /// Client disconnect listener. Drops the slot's effect right away.
    pub fn on_client_disconnect(&mut self, ctx: &mut HostContext<'_>, slot: PlayerSlot) {
        log::debug!("[Disconnect] Slot {} disconnected, removing snow.", slot);
        self.effects.remove_effect(ctx, slot);
    }

    /// Runs a task that the scheduler reports as due.
    ///
    /// The world may have moved on since the task was queued, so every task
    /// re-checks the player and entities it refers to.
    pub fn process_scheduled_task(&mut self, ctx: &mut HostContext<'_>, task: ScheduledTask) {
        match task {
            ScheduledTask::CreateSnow { slot, steam_id } => {
                let player = match ctx.human_player(slot) {
                    Some(player) if player.steam_id == steam_id => player,
                    _ => {
                        log::debug!("[SnowSchedule] Player {} left slot {}, skipping create.", steam_id, slot);
                        return;
                    }
                };
                if !self.preferences.get_preference(steam_id) {
                    log::debug!("[SnowSchedule] Player {} turned snow off meanwhile.", steam_id);
                    return;
                }
                self.effects.create_effect(ctx, &player, &self.config.particle_name);
            }
            ScheduledTask::AttachSnow { slot, entity, pawn } => {
                self.effects.attach_effect(ctx, slot, entity, pawn);
            }
        }
    }
}
