//! Save flow.
//!
//! The game keeps one save in memory: the kid's spawn record plus the room
//! it stood in. [`write_save`] captures it, [`flush_save`] writes it to the
//! save file, [`load_save`] restores it (or starts from the initial room).

use log::{debug, info, warn};

use crate::components::entity::EntityKind;
use crate::resources::savegame::{SaveError, SaveGame};
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::systems::room::load_room;
use crate::systems::spawn::spawn;

/// Record the kid's position, facing and room.
///
/// Without a kid this is a no-op. The Y coordinate is rounded so that the
/// kid respawns standing on whole pixels.
pub fn write_save(sim: &mut Simulation) {
    let Some(kid) = sim
        .registry
        .first_of_kind(EntityKind::Kid)
        .and_then(|id| sim.registry.get(id))
    else {
        debug!("no kid to save");
        return;
    };

    let mut pos = kid.pos;
    pos.y = (pos.y + 0.5) as i32 as f32;
    let record = SpawnRecord::new(EntityKind::Kid)
        .with_vec4(0, pos)
        .with_vec4(1, kid.scale);

    match SaveGame::new(record, &sim.room_name) {
        Ok(save) => {
            info!("game saved in {} at ({}, {})", sim.room_name, pos.x, pos.y);
            sim.save = Some(save);
            if sim.write_on_trigger
                && let Err(err) = flush_save(sim)
            {
                warn!("{err}");
            }
        }
        Err(err) => warn!("save refused: {err}"),
    }
}

/// Write the in-memory save to the save file, if there is both a save and a
/// file to write it to.
pub fn flush_save(sim: &Simulation) -> Result<(), SaveError> {
    let (Some(save), Some(path)) = (&sim.save, &sim.save_path) else {
        return Ok(());
    };
    save.write_file(path)?;
    debug!("save written to {}", path.display());
    Ok(())
}

/// Restore the last save, reading the save file if nothing is in memory.
/// Without any valid save the initial room is loaded instead.
pub fn load_save(sim: &mut Simulation) {
    if sim.save.is_none()
        && let Some(path) = &sim.save_path
    {
        match SaveGame::read_file(path) {
            Ok(save) => {
                info!("save loaded from {}", path.display());
                sim.save = Some(save);
            }
            Err(err @ SaveError::Io { .. }) => debug!("no save: {err}"),
            Err(err) => warn!("ignoring save: {err}"),
        }
    }

    let Some(save) = sim.save else {
        let initial = sim.initial_room.clone();
        load_room(sim, &initial);
        return;
    };

    load_room(sim, &save.room_name);
    spawn(sim, &save.kid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mapposition::Vec4;
    use crate::resources::audio::Mixer;
    use crate::resources::gamestate::GameMode;
    use crate::resources::room::Room;
    use crate::resources::roomstore::RoomStore;

    fn sim_with_rooms() -> Simulation {
        let mut rooms = RoomStore::new("/nonexistent");
        rooms.insert("data/room/intro0.rm", &Room::default());
        rooms.insert("data/room/21.rm", &Room::default());
        let mut sim = Simulation::new(rooms, Mixer::silent(), 5);
        sim.mode = GameMode::Play;
        sim
    }

    #[test]
    fn test_load_without_save_starts_initial_room() {
        let mut sim = sim_with_rooms();
        load_save(&mut sim);
        assert_eq!(sim.room_name, "data/room/intro0.rm");
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn test_save_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = sim_with_rooms();
        sim.save_path = Some(dir.path().join("save.dat"));
        sim.room_name = "data/room/21.rm".to_string();
        let kid = SpawnRecord::new(EntityKind::Kid)
            .with_vec4(0, Vec4::xy(200.0, 99.7))
            .with_vec4(1, Vec4::new(-1.0, 1.0, 1.0, 1.0));
        spawn(&mut sim, &kid);
        write_save(&mut sim);
        assert!(dir.path().join("save.dat").is_file());

        let mut fresh = sim_with_rooms();
        fresh.save_path = sim.save_path.clone();
        load_save(&mut fresh);
        assert_eq!(fresh.room_name, "data/room/21.rm");
        let id = fresh.registry.first_of_kind(EntityKind::Kid).unwrap();
        let restored = fresh.registry.get(id).unwrap();
        assert_eq!(restored.pos.y, 100.0);
        assert_eq!(restored.scale.x, -1.0);
    }

    #[test]
    fn test_write_without_kid_keeps_old_save() {
        let mut sim = sim_with_rooms();
        write_save(&mut sim);
        assert!(sim.save.is_none());
    }
}
