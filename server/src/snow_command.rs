// server/src/snow_command.rs
//
// The css_snow console command: flips the caller's stored preference,
// applies it straight away and confirms in chat.

use std::time::Duration;

use crate::host::{HostContext, PlayerSlot};
use crate::localization;
use crate::schedule::{ScheduleAt, ScheduledTask};
use crate::SnowPlugin;

pub const SNOW_COMMAND_NAME: &str = "css_snow";
pub const SNOW_COMMAND_DESCRIPTION: &str = "Toggle snow effect";

/// Delay before re-creating the effect after it was switched back on.
pub const TOGGLE_CREATE_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Toggled { enabled: bool },
    /// Issued from the server console; only clients may run it.
    ClientOnly,
    /// The calling slot no longer holds a valid controller.
    PlayerNotFound,
}

impl SnowPlugin {
    /// Console command handler. `caller` is `None` for the server console.
    pub fn on_snow_command(
        &mut self,
        ctx: &mut HostContext<'_>,
        caller: Option<PlayerSlot>,
    ) -> CommandOutcome {
        let slot = match caller {
            Some(slot) => slot,
            None => {
                log::info!("[SnowCommand] {} can only be used by clients.", SNOW_COMMAND_NAME);
                return CommandOutcome::ClientOnly;
            }
        };
        let player = match ctx.host.player(slot).filter(|player| player.is_valid) {
            Some(player) => player,
            None => return CommandOutcome::PlayerNotFound,
        };

        let enabled = self.preferences.toggle(player.steam_id);
        log::info!(
            "[SnowCommand] Player {} turned snow {}.",
            player.steam_id,
            if enabled { "on" } else { "off" }
        );

        self.effects.remove_effect(ctx, slot);
        if enabled {
            ctx.scheduler.schedule(
                ScheduleAt::After(TOGGLE_CREATE_DELAY),
                ScheduledTask::CreateSnow {
                    slot,
                    steam_id: player.steam_id,
                },
            );
        }

        let message = localization::phrase(ctx, slot, localization::toggle_phrase_key(enabled));
        ctx.host.print_to_chat(slot, &message);

        CommandOutcome::Toggled { enabled }
    }
}
