//! Room transitions.
//!
//! [`load_room`] swaps the loaded room, and in play mode tears the entity
//! list down and rebuilds it from the room's spawn records.

use log::{error, info};

use crate::resources::gamestate::{GameMode, Spell};
use crate::resources::simulation::Simulation;
use crate::systems::spawn::{clear_entities, spawn};

pub const ENDING_ROOM: &str = "data/room/ending.rm";
pub const CLEAR_ROOM: &str = "data/room/clear.rm";
/// Target of the quick-reset chord.
pub const QUICK_RESET_ROOM: &str = "data/room/11.rm";
/// Room that shows the spell caption.
pub const TUTORIAL_ROOM: &str = "data/room/12.rm";

/// Background color for a room, chosen by name prefix.
pub fn room_clear_color(name: &str) -> [f32; 3] {
    if name.starts_with("data/room/intro") {
        [0.0, 0.0, 0.0]
    } else if name.starts_with("data/room/2") {
        [0.04, 0.091, 0.1]
    } else if name.starts_with("data/room/3") {
        [0.2, 0.037, 0.0]
    } else if name.starts_with("data/room/clear") {
        [0.0, 1.0, 1.0]
    } else {
        [0.996, 0.561, 0.231]
    }
}

/// Make `name` the current room.
///
/// The room is only read again when it differs from the loaded one. In play
/// mode the entity list is always rebuilt, running destroy hooks for every
/// entity first. The held spell is dropped.
///
/// # Panics
///
/// Panics when the room cannot be read; the game cannot continue without it.
pub fn load_room(sim: &mut Simulation, name: &str) {
    if sim.room.is_none() || sim.room_name != name {
        let [r, g, b] = room_clear_color(name);
        sim.frame.set_clear_color(r, g, b);
        sim.room_name = name.to_string();

        let room = match sim.rooms.load(name) {
            Ok(room) => room,
            Err(err) => {
                error!("failed to load room {name}: {err}");
                panic!("failed to load room {name}: {err}");
            }
        };
        info!(
            "loaded room {name}: {} spawns, {} quads, page {}",
            room.spawns.len(),
            room.quads.len(),
            room.page
        );
        sim.frame.set_active_page(room.page);
        sim.room = Some(room);
    }

    if sim.mode == GameMode::Play {
        clear_entities(sim);
        let spawns = sim
            .room
            .as_ref()
            .map(|room| room.spawns.clone())
            .unwrap_or_default();
        for record in &spawns {
            spawn(sim, record);
        }
    }

    let bgm = sim
        .room
        .as_ref()
        .map(|room| room.bgm.to_string())
        .unwrap_or_default();
    sim.audio.play_bgm(&bgm);
    sim.spell = Spell::None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use crate::components::mapposition::Vec4;
    use crate::resources::audio::Mixer;
    use crate::resources::room::Room;
    use crate::resources::roomstore::RoomStore;
    use crate::resources::spawnrecord::SpawnRecord;

    fn room_with_warp() -> Room {
        Room {
            spawns: vec![
                SpawnRecord::new(EntityKind::Warp)
                    .with_vec4(0, Vec4::xy(64.0, 64.0))
                    .with_text("data/room/12.rm"),
            ],
            ..Room::default()
        }
    }

    #[test]
    fn test_clear_color_prefixes() {
        assert_eq!(room_clear_color("data/room/intro3.rm"), [0.0, 0.0, 0.0]);
        assert_eq!(room_clear_color("data/room/21.rm"), [0.04, 0.091, 0.1]);
        assert_eq!(room_clear_color("data/room/clear.rm"), [0.0, 1.0, 1.0]);
        assert_eq!(room_clear_color("data/room/11.rm"), [0.996, 0.561, 0.231]);
    }

    #[test]
    fn test_reload_same_room_rebuilds_entities() {
        let mut rooms = RoomStore::new("/nonexistent");
        rooms.insert("data/room/11.rm", &room_with_warp());
        let mut sim = Simulation::new(rooms, Mixer::silent(), 0);
        sim.mode = GameMode::Play;
        sim.spell = Spell::Jump;

        load_room(&mut sim, "data/room/11.rm");
        let first = sim.registry.head();
        load_room(&mut sim, "data/room/11.rm");
        assert_eq!(sim.registry.len(), 1);
        assert_ne!(sim.registry.head(), first);
        assert_eq!(sim.spell, Spell::None);
        assert_eq!(sim.frame.page_changes(), 1);
    }

    #[test]
    fn test_title_mode_loads_without_spawning() {
        let mut rooms = RoomStore::new("/nonexistent");
        rooms.insert("data/room/11.rm", &room_with_warp());
        let mut sim = Simulation::new(rooms, Mixer::silent(), 0);
        load_room(&mut sim, "data/room/11.rm");
        assert!(sim.registry.is_empty());
        assert!(sim.room.is_some());
    }

    #[test]
    #[should_panic]
    fn test_missing_room_is_fatal() {
        let mut sim = Simulation::new(RoomStore::new("/nonexistent"), Mixer::silent(), 0);
        load_room(&mut sim, "data/room/99.rm");
    }
}
