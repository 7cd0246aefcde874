/******************************************************************************
 *                                                                            *
 * Player Spawn Handling                                                      *
 * Every spawn starts from a clean slate: the previous life's particle is    *
 * removed, and players who want snow get a fresh one shortly after the      *
 * pawn has settled.                                                          *
 *                                                                            *
 ******************************************************************************/

use std::time::Duration;

use crate::host::{HostContext, PlayerSlot};
use crate::schedule::{ScheduleAt, ScheduledTask};
use crate::SnowPlugin;

/// Delay between the spawn event and effect creation, letting the pawn finish
/// initializing.
pub const SPAWN_CREATE_DELAY: Duration = Duration::from_millis(300);

impl SnowPlugin {
    /// `player_spawn` game event handler.
    pub fn on_player_spawn(&mut self, ctx: &mut HostContext<'_>, slot: PlayerSlot) {
        // Bots and half-connected controllers never get snow
        let player = match ctx.human_player(slot) {
            Some(player) => player,
            None => return,
        };

        self.effects.remove_effect(ctx, slot);

        if !self.preferences.get_preference(player.steam_id) {
            log::debug!("[SnowSpawn] Player {} has snow disabled.", player.steam_id);
            return;
        }

        ctx.scheduler.schedule(
            ScheduleAt::After(SPAWN_CREATE_DELAY),
            ScheduledTask::CreateSnow {
                slot,
                steam_id: player.steam_id,
            },
        );
    }
}
