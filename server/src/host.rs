/******************************************************************************
 *                                                                            *
 * Host Runtime Boundary                                                      *
 * Everything the plugin needs from the game server it is loaded into.       *
 * Entity handles are opaque indices owned by the host; the plugin never      *
 * dereferences them, it only hands them back through HostRuntime.            *
 *                                                                            *
 ******************************************************************************/

use crate::schedule::Scheduler;

/// Transient session slot assigned by the host. Reused after a disconnect.
pub type PlayerSlot = i32;

/// Stable 64-bit player identifier. Used as the preference store key.
pub type SteamId = u64;

/// Opaque reference to a host-managed entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(u32);

impl EntityHandle {
    /// Wraps a raw host entity index. Only host adapters should call this.
    pub fn from_raw(index: u32) -> Self {
        EntityHandle(index)
    }

    /// Raw host index, for handing back across the host boundary.
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector { x, y, z }
    }
}

/// Pitch / yaw / roll in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QAngle {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl QAngle {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        QAngle { pitch, yaw, roll }
    }
}

/// Snapshot of a player controller as the host sees it right now.
/// Never cached across callbacks: slots get reused and pawns get replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerController {
    pub slot: PlayerSlot,
    pub steam_id: SteamId,
    pub is_valid: bool,
    pub is_bot: bool,
    pub pawn: Option<EntityHandle>,
}

/// Entity properties the plugin writes before spawning.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityProperty {
    EffectName(String),
}

/// Capability interface onto the host game server.
///
/// All calls happen on the host's simulation thread. Lookups return `None`
/// (or `false`) for anything that no longer exists instead of failing.
pub trait HostRuntime {
    /// Controller currently occupying `slot`, if any.
    fn player(&self, slot: PlayerSlot) -> Option<PlayerController>;

    /// Absolute origin and rotation of an entity.
    fn entity_transform(&self, entity: EntityHandle) -> Option<(Vector, QAngle)>;

    fn is_entity_valid(&self, entity: EntityHandle) -> bool;

    /// Allocates an entity of `class_name` without spawning it.
    fn create_entity_by_name(&mut self, class_name: &str) -> Option<EntityHandle>;

    fn set_entity_property(&mut self, entity: EntityHandle, property: EntityProperty);

    fn teleport(&mut self, entity: EntityHandle, origin: Vector, angles: QAngle, velocity: Vector);

    fn dispatch_spawn(&mut self, entity: EntityHandle);

    /// Fires an entity input (`"SetParent"`, `"Start"`, `"Stop"`, ...).
    fn accept_input(
        &mut self,
        entity: EntityHandle,
        input: &str,
        activator: Option<EntityHandle>,
        value: Option<&str>,
    );

    fn remove_entity(&mut self, entity: EntityHandle);

    /// Looks up a translated phrase for the player's language.
    fn localize(&self, slot: PlayerSlot, key: &str) -> Option<String>;

    fn print_to_chat(&mut self, slot: PlayerSlot, message: &str);
}

/// Per-callback access to the host, in the spirit of a reducer context.
pub struct HostContext<'a> {
    pub host: &'a mut dyn HostRuntime,
    pub scheduler: &'a mut dyn Scheduler,
}

impl<'a> HostContext<'a> {
    pub fn new(host: &'a mut dyn HostRuntime, scheduler: &'a mut dyn Scheduler) -> Self {
        HostContext { host, scheduler }
    }

    /// Resolves `slot` to a controller that is connected, valid and human.
    pub fn human_player(&self, slot: PlayerSlot) -> Option<PlayerController> {
        self.host
            .player(slot)
            .filter(|player| player.is_valid && !player.is_bot)
    }

    /// The player's pawn, only if the host still considers it valid.
    pub fn valid_pawn(&self, player: &PlayerController) -> Option<EntityHandle> {
        player
            .pawn
            .filter(|pawn| self.host.is_entity_valid(*pawn))
    }
}
