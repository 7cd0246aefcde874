//! In-memory stand-in for the game server, used by unit tests.

use std::collections::HashMap;

use crate::host::{
    EntityHandle, EntityProperty, HostRuntime, PlayerController, PlayerSlot, QAngle, SteamId,
    Vector,
};
use crate::snow_effect::PARTICLE_CLASS_NAME;

const PAWN_CLASS_NAME: &str = "cs_player_pawn";

/// Mutating host calls, recorded in order.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    Create(String),
    SetProperty(EntityHandle, EntityProperty),
    Teleport(EntityHandle, Vector, QAngle),
    DispatchSpawn(EntityHandle),
    Input(EntityHandle, String, Option<EntityHandle>, Option<String>),
    Remove(EntityHandle),
    Chat(PlayerSlot, String),
}

struct FakeEntity {
    class_name: String,
    origin: Vector,
    angles: QAngle,
    alive: bool,
}

pub struct FakeHost {
    players: HashMap<PlayerSlot, PlayerController>,
    entities: HashMap<u32, FakeEntity>,
    next_index: u32,
    phrases: HashMap<String, String>,
    refuse_create: bool,
    calls: Vec<HostCall>,
}

impl FakeHost {
    pub fn new() -> Self {
        FakeHost {
            players: HashMap::new(),
            entities: HashMap::new(),
            next_index: 64,
            phrases: HashMap::new(),
            refuse_create: false,
            calls: Vec::new(),
        }
    }

    pub fn connect(&mut self, slot: PlayerSlot, steam_id: SteamId) {
        self.players.insert(
            slot,
            PlayerController {
                slot,
                steam_id,
                is_valid: true,
                is_bot: false,
                pawn: None,
            },
        );
    }

    pub fn connect_bot(&mut self, slot: PlayerSlot) {
        self.connect(slot, 0);
        if let Some(player) = self.players.get_mut(&slot) {
            player.is_bot = true;
        }
    }

    pub fn disconnect(&mut self, slot: PlayerSlot) {
        if let Some(pawn) = self.players.remove(&slot).and_then(|player| player.pawn) {
            self.destroy_entity(pawn);
        }
    }

    pub fn invalidate_player(&mut self, slot: PlayerSlot) {
        if let Some(player) = self.players.get_mut(&slot) {
            player.is_valid = false;
        }
    }

    /// Gives the player a fresh pawn, killing any previous one.
    pub fn spawn_pawn(&mut self, slot: PlayerSlot) -> EntityHandle {
        let pawn = self.allocate(PAWN_CLASS_NAME);
        let previous = self
            .players
            .get_mut(&slot)
            .and_then(|player| player.pawn.replace(pawn));
        if let Some(previous) = previous {
            self.destroy_entity(previous);
        }
        pawn
    }

    pub fn set_transform(&mut self, entity: EntityHandle, origin: Vector, angles: QAngle) {
        if let Some(fake) = self.entities.get_mut(&entity.raw()) {
            fake.origin = origin;
            fake.angles = angles;
        }
    }

    /// Kills an entity behind the plugin's back. Not recorded as a call.
    pub fn destroy_entity(&mut self, entity: EntityHandle) {
        if let Some(fake) = self.entities.get_mut(&entity.raw()) {
            fake.alive = false;
        }
    }

    pub fn set_phrase(&mut self, key: &str, text: &str) {
        self.phrases.insert(key.to_string(), text.to_string());
    }

    pub fn refuse_entity_creation(&mut self) {
        self.refuse_create = true;
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn chat_messages(&self, slot: PlayerSlot) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Chat(to, message) if *to == slot => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn live_particles(&self) -> usize {
        self.entities
            .values()
            .filter(|fake| fake.alive && fake.class_name == PARTICLE_CLASS_NAME)
            .count()
    }

    fn allocate(&mut self, class_name: &str) -> EntityHandle {
        let index = self.next_index;
        self.next_index += 1;
        self.entities.insert(
            index,
            FakeEntity {
                class_name: class_name.to_string(),
                origin: Vector::ZERO,
                angles: QAngle::default(),
                alive: true,
            },
        );
        EntityHandle::from_raw(index)
    }
}

impl HostRuntime for FakeHost {
    fn player(&self, slot: PlayerSlot) -> Option<PlayerController> {
        self.players.get(&slot).cloned()
    }

    fn entity_transform(&self, entity: EntityHandle) -> Option<(Vector, QAngle)> {
        self.entities
            .get(&entity.raw())
            .filter(|fake| fake.alive)
            .map(|fake| (fake.origin, fake.angles))
    }

    fn is_entity_valid(&self, entity: EntityHandle) -> bool {
        self.entities
            .get(&entity.raw())
            .map_or(false, |fake| fake.alive)
    }

    fn create_entity_by_name(&mut self, class_name: &str) -> Option<EntityHandle> {
        self.calls.push(HostCall::Create(class_name.to_string()));
        if self.refuse_create {
            return None;
        }
        Some(self.allocate(class_name))
    }

    fn set_entity_property(&mut self, entity: EntityHandle, property: EntityProperty) {
        self.calls.push(HostCall::SetProperty(entity, property));
    }

    fn teleport(&mut self, entity: EntityHandle, origin: Vector, angles: QAngle, _velocity: Vector) {
        self.set_transform(entity, origin, angles);
        self.calls.push(HostCall::Teleport(entity, origin, angles));
    }

    fn dispatch_spawn(&mut self, entity: EntityHandle) {
        self.calls.push(HostCall::DispatchSpawn(entity));
    }

    fn accept_input(
        &mut self,
        entity: EntityHandle,
        input: &str,
        activator: Option<EntityHandle>,
        value: Option<&str>,
    ) {
        self.calls.push(HostCall::Input(
            entity,
            input.to_string(),
            activator,
            value.map(str::to_string),
        ));
    }

    fn remove_entity(&mut self, entity: EntityHandle) {
        self.destroy_entity(entity);
        self.calls.push(HostCall::Remove(entity));
    }

    fn localize(&self, _slot: PlayerSlot, key: &str) -> Option<String> {
        self.phrases.get(key).cloned()
    }

    fn print_to_chat(&mut self, slot: PlayerSlot, message: &str) {
        self.calls.push(HostCall::Chat(slot, message.to_string()));
    }
}

/// Plugin wired to a fake host, a virtual clock and a throwaway data dir.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub host: FakeHost,
    pub queue: crate::schedule::TaskQueue,
    pub plugin: crate::SnowPlugin,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(crate::config::SnowConfig::default())
    }

    pub fn with_config(config: crate::config::SnowConfig) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let plugin = crate::SnowPlugin::load(dir.path(), config, false);
        Harness {
            dir,
            host: FakeHost::new(),
            queue: crate::schedule::TaskQueue::new(),
            plugin,
        }
    }

    pub fn with_ctx<R>(
        &mut self,
        f: impl FnOnce(&mut crate::SnowPlugin, &mut crate::host::HostContext<'_>) -> R,
    ) -> R {
        let mut ctx = crate::host::HostContext::new(&mut self.host, &mut self.queue);
        f(&mut self.plugin, &mut ctx)
    }

    /// Advances the virtual clock in 50 ms frames, running due tasks.
    pub fn run_for_secs(&mut self, secs: f32) {
        let frame = std::time::Duration::from_millis(50);
        let frames = (secs / 0.05).ceil() as u32;
        for _ in 0..frames {
            for task in self.queue.tick(frame) {
                self.with_ctx(|plugin, ctx| plugin.process_scheduled_task(ctx, task));
            }
        }
    }
}
