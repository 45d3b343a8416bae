//! The simulation context.
//!
//! [`Simulation`] owns everything one running game needs: the entity
//! registry, the loaded room, the held spell and bullet throttle, the
//! in-memory save, the random generator, and the outputs (render batch and
//! mixer). Every behavior receives it by `&mut`, so there is no global state.

use std::path::PathBuf;

use crate::components::boxcollider::BoxCollider;
use crate::resources::audio::{ChannelHandle, Mixer, SoundId};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameMode, Spell};
use crate::resources::input::InputSnapshot;
use crate::resources::registry::EntityRegistry;
use crate::resources::renderframe::RenderFrame;
use crate::resources::room::Room;
use crate::resources::roomstore::RoomStore;
use crate::resources::savegame::SaveGame;
use crate::resources::tilemap::{TILE_ANY_BIT, TileHit, TileMap, TileType};
use crate::resources::worldtime::WorldTime;

pub const INITIAL_ROOM: &str = "data/room/intro0.rm";

static EMPTY_MAP: TileMap = TileMap::new();

pub struct Simulation {
    pub registry: EntityRegistry,
    pub rng: fastrand::Rng,
    /// Loaded room, `None` until the first load.
    pub room: Option<Room>,
    pub room_name: String,
    pub rooms: RoomStore,
    pub spell: Spell,
    /// Live room-authored bullets.
    pub bullet_count: u32,
    /// Last valid save, if any.
    pub save: Option<SaveGame>,
    /// Where saves are flushed; `None` keeps them in memory only.
    pub save_path: Option<PathBuf>,
    pub write_on_trigger: bool,
    pub initial_room: String,
    pub debug_keys: bool,
    pub mode: GameMode,
    /// Set when the entity list was rebuilt during the current pass.
    pub reset_tick: bool,
    pub input: InputSnapshot,
    pub audio: Mixer,
    pub frame: RenderFrame,
    pub time: WorldTime,
}

impl Simulation {
    /// A title-screen simulation with no save file and default settings.
    pub fn new(rooms: RoomStore, audio: Mixer, seed: u64) -> Self {
        Simulation {
            registry: EntityRegistry::default(),
            rng: fastrand::Rng::with_seed(seed),
            room: None,
            room_name: String::new(),
            rooms,
            spell: Spell::None,
            bullet_count: 0,
            save: None,
            save_path: None,
            write_on_trigger: true,
            initial_room: INITIAL_ROOM.to_string(),
            debug_keys: false,
            mode: GameMode::Title,
            reset_tick: false,
            input: InputSnapshot::default(),
            audio,
            frame: RenderFrame::new(),
            time: WorldTime::default(),
        }
    }

    pub fn from_config(config: &GameConfig, audio: Mixer, seed: u64) -> Self {
        let mut sim = Self::new(RoomStore::new(&config.data_dir), audio, seed);
        sim.save_path = Some(config.save_path());
        sim.write_on_trigger = config.write_on_trigger;
        sim.initial_room = config.initial_room.clone();
        sim.debug_keys = config.debug_keys;
        sim.time = WorldTime::with_fps(config.target_fps);
        sim
    }

    /// Collision layer of the loaded room, or an empty map before any load.
    pub fn map(&self) -> &TileMap {
        self.room.as_ref().map_or(&EMPTY_MAP, |r| &r.map)
    }

    pub fn tile_at(&self, bbox: BoxCollider, ty: TileType) -> Option<TileHit> {
        self.map().query(bbox, ty, TILE_ANY_BIT)
    }

    pub fn play_sound(&self, sound: SoundId) -> ChannelHandle {
        self.audio.play_sound(sound)
    }

    pub fn stop_sound(&self, sound: SoundId) {
        self.audio.stop_sound(sound);
    }

    /// Next raw value of the simulation RNG, masked to 16 bits.
    pub fn random16(&mut self) -> u32 {
        self.rng.u32(..) & 0xffff
    }
}
