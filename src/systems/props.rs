//! Simple room actors: warps, pickups, blockers, cards and flashes.
//!
//! Most of these only need an initializer; the game-over banner and the
//! thunder flash also count ticks.

use log::warn;

use crate::components::entity::EntityData;
use crate::components::mapposition::Vec4;
use crate::components::sprite::{Animation, ImageId};
use crate::components::ttl::Ttl;
use crate::resources::audio::SoundId;
use crate::resources::gamestate::Spell;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::systems::spawn::destroy;

/// Ticks before the game-over banner appears.
pub const GAME_OVER_DELAY: u32 = 30;
pub const THUNDER_LIFETIME: u32 = 50;

const INTRO_PREFIX: &str = "data/room/intro";

pub fn init_warp(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.data = EntityData::Warp {
        destination: record.text,
    };
    me.sprite.hide();
}

pub fn init_game_over(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = Vec4::new(400.0, 304.0, -1.0, 0.0);
    me.data = EntityData::GameOver { timer: 0 };
    me.sprite.hide();
}

pub fn update_game_over(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let EntityData::GameOver { timer } = &mut me.data else {
        return;
    };
    let elapsed = *timer;
    *timer += 1;
    if elapsed >= GAME_OVER_DELAY {
        me.sprite.show(ImageId::GAMEOVER);
    }
}

/// Intro card; the image follows the digit after `data/room/intro`.
pub fn init_intro(sim: &mut Simulation, id: EntityId) {
    let page = sim
        .room_name
        .strip_prefix(INTRO_PREFIX)
        .and_then(|rest| rest.bytes().next())
        .and_then(|digit| digit.checked_sub(b'0'))
        .filter(|&n| n <= ImageId::INTRO5.0 - ImageId::INTRO0.0);
    let image = match page {
        Some(n) => ImageId(ImageId::INTRO0.0 + n),
        None => {
            warn!("intro card in non-intro room {}", sim.room_name);
            ImageId::NONE
        }
    };

    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = Vec4::new(0.0, 576.0, 0.0, 0.0);
    me.scale = Vec4::ONE;
    me.sprite.show(image);
}

pub fn init_spell_pickup(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let spell = Spell::from_u32(record.u32_at(4));
    me.pos = record.vec4_at(0);
    me.data = EntityData::SpellPickup { spell };
    me.sprite.show(spell.image());
}

pub fn init_spell_blocker(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.sprite.show(ImageId::SBKILLER);
}

/// A kid standing still, used in cutscenes.
pub fn init_idle_kid(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.scale = Vec4::ONE;
    me.sprite.restart(Animation::Stand);
}

pub fn init_thunder(sim: &mut Simulation, id: EntityId) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = Vec4::new(0.0, 608.0, -0.99, 0.0);
    me.data = EntityData::Thunder {
        ttl: Ttl::new(THUNDER_LIFETIME),
    };
    me.sprite.restart(Animation::Thunder);
    sim.play_sound(SoundId::Thunder);
}

pub fn update_thunder(sim: &mut Simulation, id: EntityId) {
    let expired = match sim.registry.get_mut(id).map(|e| &mut e.data) {
        Some(EntityData::Thunder { ttl }) => ttl.tick(),
        _ => return,
    };
    if expired {
        destroy(sim, id);
    }
}
