//! The player character.
//!
//! [`update_kid`] turns one tick of input into movement, jumps, spell casts,
//! vine clinging, platform landing, pickups, warps and death. Collision with
//! the tile map is resolved by [`move_kid`] one axis at a time.

use crate::components::entity::{EntityData, EntityKind, KID_BBOX, KidState};
use crate::components::mapposition::Vec4;
use crate::components::sprite::Animation;
use crate::resources::audio::SoundId;
use crate::resources::gamestate::Spell;
use crate::resources::input::Buttons;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::resources::tilemap::{
    GAME_HEIGHT, GAME_WIDTH, TILE_ANY_BIT, TILE_LVINE_BIT, TILE_RVINE_BIT, TILE_SIZE, TileMap,
    TileType,
};
use crate::systems::room::{ENDING_ROOM, load_room};
use crate::systems::save::write_save;
use crate::systems::savepoint::save_game;
use crate::systems::spawn::{destroy, spawn};

pub const KID_SPEED: f32 = 3.0;
pub const KID_JUMP_HEIGHT: f32 = 8.5;
pub const KID_DJUMP_HEIGHT: f32 = 7.0;
pub const KID_GRAVITY: f32 = -0.4;
/// Terminal falling speed.
pub const KID_MAX_VSPEED: f32 = -9.4;
/// Jump speed kept when the jump button is released early.
pub const KID_FALL_CHANGE: f32 = 0.45;
pub const KID_VINE_VSPEED: f32 = -2.0;
pub const KID_VINE_JUMP_SPEED: f32 = 15.0;
pub const KID_VINE_JUMP_HEIGHT: f32 = 9.0;
pub const KID_JUMP_SPELL_HEIGHT: f32 = 12.0;
pub const KID_BOOST_TIME: u32 = 15;
pub const KID_BOOST_SPEED: f32 = 4.0;
/// Shots are refused while this many bullets are alive.
pub const BULLET_CAP: u32 = 4;
pub const SPELL_BULLET_SPEED: f32 = 16.0;

const fn align_up(x: i32) -> i32 {
    (x + (TILE_SIZE - 1)) & !(TILE_SIZE - 1)
}

const fn align_down(x: i32) -> i32 {
    x & !(TILE_SIZE - 1)
}

fn blocked(map: &TileMap, pos: Vec4) -> bool {
    map.query(KID_BBOX.around(pos), TileType::Block, TILE_ANY_BIT)
        .is_some()
}

pub fn init_kid(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let others: Vec<EntityId> = sim
        .registry
        .iter()
        .filter(|&(other, e)| other != id && e.kind() == EntityKind::Kid)
        .map(|(other, _)| other)
        .collect();
    for other in others {
        destroy(sim, other);
    }

    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.scale = record.vec4_at(1);
    me.data = EntityData::Kid(KidState {
        djump: true,
        ..KidState::default()
    });
    me.sprite.restart(Animation::Stand);
}

/// Move the kid by `(ox, oy)` against the block tiles of `map` and return
/// the resolved position.
///
/// The whole move is tried first. On a hit the horizontal part is applied
/// alone and snapped to the tile edge, then the vertical part is applied and
/// snapped the same way, keeping the starting sub-pixel offset. Afterwards
/// the position is clamped to the play field and the ground flags are
/// refreshed from a probe one pixel below the kid.
pub fn move_kid(map: &TileMap, pos: Vec4, kid: &mut KidState, ox: f32, oy: f32) -> Vec4 {
    kid.on_ground = false;

    let mut new_pos = pos + Vec4::xy(ox, oy);
    if blocked(map, new_pos) {
        new_pos = pos + Vec4::xy(ox, 0.0);
        let frac = pos.fract();

        if blocked(map, new_pos) {
            new_pos.x = if ox > 0.0 {
                (align_up(new_pos.x as i32 - KID_BBOX.right) - KID_BBOX.right) as f32
            } else {
                (align_down(new_pos.x as i32 - KID_BBOX.left) - KID_BBOX.left) as f32
            };
        }

        new_pos.y += oy;
        if blocked(map, new_pos) {
            new_pos.y = if oy > 0.0 {
                (align_up(new_pos.y as i32) - KID_BBOX.top) as f32 + frac.y
            } else {
                (align_down(new_pos.y as i32 + TILE_SIZE / 2) - KID_BBOX.bottom) as f32 + frac.y
            };
            if frac.y > 0.5 {
                new_pos.y -= 1.0;
            }
            kid.vspeed = 0.0;
        }
    }

    let min_x = -KID_BBOX.left as f32;
    let max_x = (GAME_WIDTH - KID_BBOX.right) as f32;
    let max_y = (GAME_HEIGHT - KID_BBOX.top) as f32;
    if new_pos.x < min_x {
        new_pos.x = min_x;
    } else if new_pos.x > max_x {
        new_pos.x = max_x;
    }
    if new_pos.y > max_y {
        new_pos.y = max_y;
        kid.vspeed = 0.0;
    }

    // Checked here and not during the vertical snap: a short hop that lands
    // on the same tick it starts would otherwise keep the double jump.
    let probe = KID_BBOX.around(new_pos).grow(0, -1, 0, 0);
    if map.query(probe, TileType::Block, TILE_ANY_BIT).is_some() {
        kid.on_ground = true;
        kid.djump = true;
    } else if map.query(probe, TileType::Platform, TILE_ANY_BIT).is_some() {
        kid.on_ground = true;
    }

    new_pos
}

pub fn update_kid(sim: &mut Simulation, id: EntityId) {
    let Some(mut me) = sim.registry.get(id).cloned() else {
        return;
    };
    let Some(mut k) = me.kid().copied() else {
        return;
    };
    let input = sim.input;
    let god_mode = sim.debug_keys && input.is_down(Buttons::DOWN);

    let mut dest = Animation::Stand;
    let mut ox = 0.0;

    if input.is_down(Buttons::RIGHT) {
        ox = KID_SPEED;
        me.scale.x = 1.0;
        dest = Animation::Walk;
    } else if input.is_down(Buttons::LEFT) {
        ox = -KID_SPEED;
        me.scale.x = -1.0;
        dest = Animation::Walk;
    }

    if k.boost_timer > 0 {
        k.boost_timer -= 1;
        ox += k.boost_speed;
    }

    if input.is_pressed(Buttons::JUMP) {
        if k.on_ground {
            k.vspeed = KID_JUMP_HEIGHT;
            sim.play_sound(SoundId::Jump);
            k.djump = true;
        } else if k.djump || god_mode {
            k.vspeed = KID_DJUMP_HEIGHT;
            k.djump = false;
            sim.play_sound(SoundId::DoubleJump);
        }
    }

    if input.is_pressed(Buttons::SHOOT) && sim.bullet_count < BULLET_CAP && !god_mode {
        if let Some(save_point) = sim
            .registry
            .first_hit(id, me.hitbox(), EntityKind::SavePoint)
        {
            me.data = EntityData::Kid(k);
            sim.registry.put(id, me.clone());
            save_game(sim, save_point);
        } else {
            match sim.spell {
                Spell::Jump => {
                    sim.play_sound(SoundId::JumpSpell);
                    k.vspeed = KID_JUMP_SPELL_HEIGHT;
                }
                Spell::Shoot => {
                    let mut origin = me.pos;
                    origin.z = -0.1;
                    let record = SpawnRecord::new(EntityKind::SpellBullet)
                        .with_vec4(0, origin)
                        .with_f32(4, SPELL_BULLET_SPEED * me.scale.x);
                    spawn(sim, &record);
                }
                Spell::Speed => {
                    k.boost_timer = KID_BOOST_TIME;
                    k.boost_speed = KID_BOOST_SPEED * me.scale.x;
                    sim.play_sound(SoundId::SpeedSpell);
                }
                Spell::Final => {
                    load_room(sim, ENDING_ROOM);
                    sim.reset_tick = true;
                    sim.spell = Spell::None;
                    sim.play_sound(SoundId::Thunder);
                    return;
                }
                Spell::None => {
                    sim.play_sound(SoundId::NoSpell);
                }
            }
            sim.spell = Spell::None;
        }
    }

    if sim.debug_keys && input.is_pressed(Buttons::SHOOT) && input.is_down(Buttons::DOWN) {
        sim.spell = sim.spell.cycled();
    }

    if input.is_released(Buttons::JUMP) && k.vspeed > 0.0 {
        k.vspeed *= KID_FALL_CHANGE;
    }

    if !k.platform_snapped {
        if k.vspeed > 0.05 {
            dest = Animation::Jump;
        } else if k.vspeed < -0.05 {
            dest = Animation::Fall;
        }
    } else if k.vspeed != 0.0 {
        k.platform_snapped = false;
    }

    let bbox = KID_BBOX.around(me.pos);
    let map = sim.map();
    let vine = if map
        .query(bbox.grow(-1, 0, -1, 0), TileType::Block, TILE_RVINE_BIT)
        .is_some()
    {
        Some((Buttons::RIGHT, KID_VINE_JUMP_SPEED))
    } else if map
        .query(bbox.grow(1, 0, 1, 0), TileType::Block, TILE_LVINE_BIT)
        .is_some()
    {
        Some((Buttons::LEFT, -KID_VINE_JUMP_SPEED))
    } else {
        None
    };
    if let Some((away, jump_speed)) = vine {
        k.vspeed = KID_VINE_VSPEED;
        dest = Animation::Vine;
        if input.is_pressed(away) && input.is_down(Buttons::JUMP) {
            ox = jump_speed;
            k.vspeed = KID_VINE_JUMP_HEIGHT;
            dest = Animation::Jump;
            sim.play_sound(SoundId::VineJump);
        }
    }

    k.vspeed = (k.vspeed + KID_GRAVITY).max(KID_MAX_VSPEED);
    let oy = k.vspeed;

    if sim.debug_keys && input.is_pressed(Buttons::UP) {
        me.data = EntityData::Kid(k);
        sim.registry.put(id, me.clone());
        write_save(sim);
    }

    me.pos = move_kid(sim.map(), me.pos, &mut k, ox, oy);

    if let Some(warp) = sim.registry.first_hit(id, me.hitbox(), EntityKind::Warp) {
        let destination = match sim.registry.get(warp).map(|e| &e.data) {
            Some(EntityData::Warp { destination }) => destination.to_string(),
            _ => String::new(),
        };
        load_room(sim, &destination);
        sim.reset_tick = true;
        return;
    }

    if let Some(hit) = sim.tile_at(KID_BBOX.around(me.pos), TileType::Platform) {
        let surface = hit.top() as f32;
        if me.pos.y - k.vspeed * 0.5 >= surface {
            me.pos.y = surface + 9.0;
            k.vspeed = 0.0;
            k.platform_snapped = true;
            k.djump = true;
        }
    }

    let killed = me.pos.y < 0.0
        || (!god_mode
            && (sim.tile_at(KID_BBOX.around(me.pos), TileType::Killer).is_some()
                || sim
                    .registry
                    .first_hit(id, me.hitbox(), EntityKind::SpellBlocker)
                    .is_some()));
    if killed {
        sim.play_sound(SoundId::Death);
        spawn(sim, &SpawnRecord::new(EntityKind::GameOver));
        spawn(
            sim,
            &SpawnRecord::new(EntityKind::BloodEmitter).with_vec4(0, me.pos),
        );
        destroy(sim, id);
        return;
    }

    if sim.spell == Spell::None
        && let Some(pickup) = sim
            .registry
            .first_hit(id, me.hitbox(), EntityKind::SpellPickup)
    {
        if let Some(EntityData::SpellPickup { spell }) = sim.registry.get(pickup).map(|e| &e.data)
        {
            sim.spell = *spell;
        }
        destroy(sim, pickup);
        sim.play_sound(SoundId::GetSpell);
    }

    me.sprite.play(dest);
    me.data = EntityData::Kid(k);
    sim.registry.put(id, me);
}
