/******************************************************************************
 *                                                                            *
 * Snow Effect Controller                                                     *
 * Owns the one-particle-per-slot rule. Spawns the snow particle system at   *
 * the player's pawn, defers parenting to the next frame, and tears effects  *
 * down on disconnect, respawn or toggle.                                     *
 *                                                                            *
 ******************************************************************************/

use std::collections::HashMap;

use crate::host::{EntityHandle, EntityProperty, HostContext, PlayerController, PlayerSlot, Vector};
use crate::schedule::{ScheduleAt, ScheduledTask};

pub const PARTICLE_CLASS_NAME: &str = "info_particle_system";

// Entity inputs understood by info_particle_system
const INPUT_SET_PARENT: &str = "SetParent";
const INPUT_START: &str = "Start";
const INPUT_STOP: &str = "Stop";
const ACTIVATOR_TARGET: &str = "!activator";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectState {
    /// Spawn dispatched, waiting for the next-frame attach.
    Pending,
    /// Parented to the pawn and started.
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSnowEffect {
    pub entity: EntityHandle,
    pub state: EffectState,
}

#[derive(Debug, Default)]
pub struct EffectController {
    active_effects: HashMap<PlayerSlot, ActiveSnowEffect>,
}

impl EffectController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a fresh snow particle on `player`, replacing any tracked one.
    ///
    /// Returns `false` without touching anything when the player has no valid
    /// pawn. The particle is tracked as `Pending` until the scheduled
    /// `AttachSnow` task runs.
    pub fn create_effect(
        &mut self,
        ctx: &mut HostContext<'_>,
        player: &PlayerController,
        particle_name: &str,
    ) -> bool {
        if !player.is_valid {
            return false;
        }
        let pawn = match ctx.valid_pawn(player) {
            Some(pawn) => pawn,
            None => {
                log::debug!("[SnowEffect] Slot {} has no valid pawn, skipping.", player.slot);
                return false;
            }
        };
        let (origin, angles) = match ctx.host.entity_transform(pawn) {
            Some(transform) => transform,
            None => {
                log::debug!("[SnowEffect] Pawn of slot {} has no transform, skipping.", player.slot);
                return false;
            }
        };

        self.remove_effect(ctx, player.slot);

        let particle = match ctx.host.create_entity_by_name(PARTICLE_CLASS_NAME) {
            Some(entity) => entity,
            None => {
                log::warn!("[SnowEffect] Host refused to create {} for slot {}.", PARTICLE_CLASS_NAME, player.slot);
                return false;
            }
        };

        ctx.host
            .set_entity_property(particle, EntityProperty::EffectName(particle_name.to_string()));
        ctx.host.teleport(particle, origin, angles, Vector::ZERO);
        ctx.host.dispatch_spawn(particle);

        // The particle can't take inputs until the host finishes spawning it.
        ctx.scheduler.schedule(
            ScheduleAt::NextFrame,
            ScheduledTask::AttachSnow {
                slot: player.slot,
                entity: particle,
                pawn,
            },
        );

        self.active_effects.insert(
            player.slot,
            ActiveSnowEffect {
                entity: particle,
                state: EffectState::Pending,
            },
        );
        log::debug!("[SnowEffect] Spawned {:?} for slot {}.", particle, player.slot);
        true
    }

    /// Next-frame half of [`create_effect`](Self::create_effect).
    ///
    /// Skips silently if the particle or the pawn died in the meantime.
    pub fn attach_effect(
        &mut self,
        ctx: &mut HostContext<'_>,
        slot: PlayerSlot,
        entity: EntityHandle,
        pawn: EntityHandle,
    ) {
        if !ctx.host.is_entity_valid(entity) || !ctx.host.is_entity_valid(pawn) {
            log::debug!("[SnowEffect] Attach for slot {} dropped, entity gone.", slot);
            return;
        }

        ctx.host
            .accept_input(entity, INPUT_SET_PARENT, Some(pawn), Some(ACTIVATOR_TARGET));
        ctx.host.accept_input(entity, INPUT_START, None, None);

        if let Some(effect) = self.active_effects.get_mut(&slot) {
            if effect.entity == entity {
                effect.state = EffectState::Active;
            }
        }
    }

    /// Stops and destroys whatever is tracked for `slot`.
    ///
    /// The tracked entry is dropped even when the entity is already gone.
    pub fn remove_effect(&mut self, ctx: &mut HostContext<'_>, slot: PlayerSlot) {
        let effect = match self.active_effects.remove(&slot) {
            Some(effect) => effect,
            None => return,
        };

        if ctx.host.is_entity_valid(effect.entity) {
            ctx.host.accept_input(effect.entity, INPUT_STOP, None, None);
            ctx.host.remove_entity(effect.entity);
            log::debug!("[SnowEffect] Removed {:?} from slot {}.", effect.entity, slot);
        } else {
            log::debug!("[SnowEffect] Forgot stale {:?} for slot {}.", effect.entity, slot);
        }
    }

    pub fn remove_all(&mut self, ctx: &mut HostContext<'_>) {
        let slots: Vec<PlayerSlot> = self.active_effects.keys().copied().collect();
        for slot in slots {
            self.remove_effect(ctx, slot);
        }
    }

    pub fn effect_for(&self, slot: PlayerSlot) -> Option<&ActiveSnowEffect> {
        self.active_effects.get(&slot)
    }

    pub fn state_for(&self, slot: PlayerSlot) -> Option<EffectState> {
        self.active_effects.get(&slot).map(|effect| effect.state)
    }

    pub fn active_count(&self) -> usize {
        self.active_effects.len()
    }
}
