//! Save points.
//!
//! Shooting a save point (or touching one with a saving bullet) records the
//! game. The point then lights up and ignores further triggers for a while.

use crate::components::entity::{EntityData, SavePointState};
use crate::components::sprite::ImageId;
use crate::resources::audio::SoundId;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::systems::save::write_save;

/// Ticks before a save point can fire again.
pub const SAVE_COOLDOWN: i32 = 30;
/// Ticks the lit image stays up.
pub const SAVE_LIGHT_TIME: i32 = 60;

pub fn init_save_point(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.data = EntityData::SavePoint(SavePointState::default());
    me.sprite.show(ImageId::SAVE);
}

pub fn update_save_point(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let EntityData::SavePoint(state) = &mut me.data else {
        return;
    };
    state.idle.tick();
    state.light.tick();
    if me.sprite.image == ImageId::SAVEHIT && !state.light.active() {
        me.sprite.show(ImageId::SAVE);
    }
}

/// Trigger the save point `id`: light it up and write the save.
///
/// Does nothing while the point is cooling down.
pub fn save_game(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let EntityData::SavePoint(state) = &mut me.data else {
        return;
    };
    if state.idle.active() {
        return;
    }
    state.idle.set(SAVE_COOLDOWN);
    state.light.set(SAVE_LIGHT_TIME);
    me.sprite.show(ImageId::SAVEHIT);

    sim.play_sound(SoundId::Save);
    write_save(sim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use crate::components::mapposition::Vec4;
    use crate::resources::audio::Mixer;
    use crate::resources::roomstore::RoomStore;
    use crate::systems::spawn::spawn;

    #[test]
    fn test_cooldown_blocks_retrigger() {
        let mut sim = Simulation::new(RoomStore::default(), Mixer::silent(), 3);
        sim.room_name = "data/room/11.rm".to_string();
        let kid = SpawnRecord::new(EntityKind::Kid)
            .with_vec4(0, Vec4::xy(48.0, 40.6))
            .with_vec4(1, Vec4::ONE);
        spawn(&mut sim, &kid);
        let point = spawn(
            &mut sim,
            &SpawnRecord::new(EntityKind::SavePoint).with_vec4(0, Vec4::xy(32.0, 63.0)),
        )
        .unwrap();

        save_game(&mut sim, point);
        let first = sim.save.expect("saved");
        assert_eq!(first.kid.vec4_at(0).y, 41.0);
        assert_eq!(sim.registry.get(point).unwrap().sprite.image, ImageId::SAVEHIT);

        sim.save = None;
        save_game(&mut sim, point);
        assert!(sim.save.is_none());

        for _ in 0..SAVE_COOLDOWN {
            update_save_point(&mut sim, point);
        }
        save_game(&mut sim, point);
        assert!(sim.save.is_some());
    }

    #[test]
    fn test_light_goes_out() {
        let mut sim = Simulation::new(RoomStore::default(), Mixer::silent(), 3);
        let point = spawn(&mut sim, &SpawnRecord::new(EntityKind::SavePoint)).unwrap();
        save_game(&mut sim, point);
        for _ in 0..SAVE_LIGHT_TIME {
            update_save_point(&mut sim, point);
        }
        assert_eq!(sim.registry.get(point).unwrap().sprite.image, ImageId::SAVE);
    }
}
