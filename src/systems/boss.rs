//! The dragon and its defeat sequence.
//!
//! The defeat actor runs a fixed timeline keyed on its own tick counter:
//!
//! | tick      | event                                          |
//! |-----------|------------------------------------------------|
//! | 11        | defeat cry                                     |
//! | 255       | splits into two drifting halves and hides      |
//! | 400..500  | background fades toward cyan                   |
//! | 500       | loads the clear room                           |
//!
//! Throughout, it shakes around its spawn point with a growing amplitude.

use crate::components::entity::{DragonDefeatState, EntityData, EntityKind};
use crate::components::mapposition::Vec4;
use crate::components::sprite::ImageId;
use crate::resources::audio::SoundId;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::systems::room::{CLEAR_ROOM, load_room};
use crate::systems::spawn::spawn;

pub const DEFEAT_CRY_TICK: u32 = 11;
pub const DEFEAT_SPLIT_TICK: u32 = 255;
pub const DEFEAT_FADE_TICK: u32 = 400;
pub const DEFEAT_END_TICK: u32 = 500;
/// Amplitude added to the shake every tick.
pub const SHAKE_STEP: f32 = 0.333;
/// Per-tick change of the clear color during the fade.
pub const FADE_STEP: [f32; 3] = [-0.00996, 0.00439, 0.00769];
pub const DRAGON_CLEAR_COLOR: [f32; 3] = [0.996, 0.561, 0.231];
pub const PART_SPEED: f32 = 16.0;
/// Vertical distance between the two halves.
pub const PART_GAP: f32 = 167.0;

pub fn init_dragon(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.sprite.show(ImageId::DRAGON);
    sim.play_sound(SoundId::Dragon);
}

pub fn init_dragon_defeat(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let pos = record.vec4_at(0);
    me.pos = pos;
    me.data = EntityData::DragonDefeat(DragonDefeatState {
        anchor: pos,
        shake: 0.0,
        timer: 0,
        clear_color: DRAGON_CLEAR_COLOR,
    });
    me.sprite.show(ImageId::WHITEDRAGON);
    sim.stop_sound(SoundId::Dragon);
}

/// Signed shake offset in `[-shake, shake)`.
fn shake_offset(sim: &mut Simulation, shake: f32) -> f32 {
    (sim.random16() as i32 - 32767) as f32 * shake / 32768.0
}

pub fn update_dragon_defeat(sim: &mut Simulation, id: EntityId) {
    let Some(mut me) = sim.registry.get(id).cloned() else {
        return;
    };
    let EntityData::DragonDefeat(mut state) = me.data else {
        return;
    };

    state.timer += 1;
    if state.timer == DEFEAT_SPLIT_TICK {
        let upper = SpawnRecord::new(EntityKind::DragonPart)
            .with_vec4(0, me.pos)
            .with_f32(4, PART_SPEED)
            .with_u32(5, ImageId::WHITEDRAGON1.0 as u32);
        let lower = SpawnRecord::new(EntityKind::DragonPart)
            .with_vec4(0, me.pos - Vec4::xy(0.0, PART_GAP))
            .with_f32(4, -PART_SPEED)
            .with_u32(5, ImageId::WHITEDRAGON2.0 as u32);
        spawn(sim, &upper);
        spawn(sim, &lower);
        me.sprite.hide();
    }

    state.shake += SHAKE_STEP;
    let dx = shake_offset(sim, state.shake);
    let dy = shake_offset(sim, state.shake);
    me.pos = state.anchor + Vec4::xy(dx, dy);

    if state.timer == DEFEAT_CRY_TICK {
        sim.play_sound(SoundId::DragonDefeated);
    } else if state.timer == DEFEAT_END_TICK {
        load_room(sim, CLEAR_ROOM);
        sim.reset_tick = true;
        return;
    } else if state.timer >= DEFEAT_FADE_TICK {
        for (channel, step) in state.clear_color.iter_mut().zip(FADE_STEP) {
            *channel += step;
        }
        let [r, g, b] = state.clear_color;
        sim.frame.set_clear_color(r, g, b);
    }

    me.data = EntityData::DragonDefeat(state);
    sim.registry.put(id, me);
}

pub fn init_dragon_part(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.data = EntityData::DragonPart {
        speed: record.f32_at(4),
    };
    me.sprite.show(ImageId(record.u32_at(5) as u8));
}

pub fn update_dragon_part(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    if let EntityData::DragonPart { speed } = me.data {
        me.pos.y += speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::audio::Mixer;
    use crate::resources::gamestate::GameMode;
    use crate::resources::room::Room;
    use crate::resources::roomstore::RoomStore;

    #[test]
    fn test_defeat_timeline() {
        let mut rooms = RoomStore::new("/nonexistent");
        rooms.insert(CLEAR_ROOM, &Room::default());
        let mut sim = Simulation::new(rooms, Mixer::silent(), 11);
        sim.mode = GameMode::Play;

        let anchor = Vec4::xy(400.0, 300.0);
        let id = spawn(
            &mut sim,
            &SpawnRecord::new(EntityKind::DragonDefeat).with_vec4(0, anchor),
        )
        .unwrap();

        for _ in 0..DEFEAT_SPLIT_TICK {
            update_dragon_defeat(&mut sim, id);
        }
        assert_eq!(sim.registry.len(), 3);
        assert_eq!(sim.registry.get(id).unwrap().sprite.image, ImageId::NONE);
        let shake = DEFEAT_SPLIT_TICK as f32 * SHAKE_STEP;
        let pos = sim.registry.get(id).unwrap().pos;
        assert!((pos.x - anchor.x).abs() <= shake + 0.01);

        for _ in DEFEAT_SPLIT_TICK..DEFEAT_END_TICK - 1 {
            update_dragon_defeat(&mut sim, id);
        }
        let c = sim.frame.clear_color;
        assert!(c[0] < 0.02 && c[1] > 0.99 && c[2] > 0.99);
        assert!(sim.room.is_none());

        update_dragon_defeat(&mut sim, id);
        assert_eq!(sim.room_name, CLEAR_ROOM);
        assert!(sim.reset_tick);
        assert!(!sim.registry.contains(id));
    }

    #[test]
    fn test_part_drifts() {
        let mut sim = Simulation::new(RoomStore::default(), Mixer::silent(), 0);
        let record = SpawnRecord::new(EntityKind::DragonPart)
            .with_f32(4, -16.0)
            .with_u32(5, ImageId::WHITEDRAGON2.0 as u32);
        let id = spawn(&mut sim, &record).unwrap();
        update_dragon_part(&mut sim, id);
        let part = sim.registry.get(id).unwrap();
        assert_eq!(part.pos.y, -16.0);
        assert_eq!(part.sprite.image, ImageId::WHITEDRAGON2);
    }
}
