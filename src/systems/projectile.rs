//! Bullets and spell bullets.
//!
//! Both fly horizontally at the speed stored in their spawn record and die
//! when their lifetime runs out or they hit a block. Room-authored bullets
//! count toward the shot cap and may trigger save points; spell bullets break
//! spell blockers.

use crate::components::entity::{
    BULLET_BBOX, BulletState, EntityData, EntityKind, SBULLET_BBOX, SpellBulletState,
};
use crate::components::mapposition::Vec4;
use crate::components::sprite::Animation;
use crate::components::ttl::Ttl;
use crate::resources::audio::SoundId;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::resources::tilemap::TileType;
use crate::systems::savepoint::save_game;
use crate::systems::spawn::destroy;

pub const BULLET_LIFETIME: u32 = 40;
pub const SPELL_BULLET_LIFETIME: u32 = 40;

pub fn init_bullet(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0);
    me.data = EntityData::Bullet(BulletState {
        speed: record.f32_at(4),
        ttl: Ttl::new(BULLET_LIFETIME),
        saves_game: !record.text.is_empty(),
    });
    me.sprite.restart(Animation::Bullet);

    sim.bullet_count += 1;
    sim.play_sound(SoundId::Shoot);
}

pub fn destroy_bullet(sim: &mut Simulation) {
    sim.bullet_count = sim.bullet_count.saturating_sub(1);
}

pub fn update_bullet(sim: &mut Simulation, id: EntityId) {
    let Some(mut me) = sim.registry.get(id).cloned() else {
        return;
    };
    let EntityData::Bullet(state) = &mut me.data else {
        return;
    };

    me.pos.x += state.speed;
    let expired = state.ttl.tick();
    let saves_game = state.saves_game;

    let hit_block = sim
        .tile_at(BULLET_BBOX.at(me.pos.truncated_origin()), TileType::Block)
        .is_some();
    if expired || hit_block {
        destroy(sim, id);
        return;
    }

    let hitbox = me.hitbox();
    sim.registry.put(id, me);

    if saves_game
        && let Some(save_point) = sim.registry.first_hit(id, hitbox, EntityKind::SavePoint)
    {
        save_game(sim, save_point);
    }
}

pub fn init_spell_bullet(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    let speed = record.f32_at(4);
    me.pos = record.vec4_at(0);
    // Faces the direction of travel.
    me.scale = Vec4::new(speed / 16.0, 1.0, 1.0, 1.0);
    me.data = EntityData::SpellBullet(SpellBulletState {
        speed,
        ttl: Ttl::new(SPELL_BULLET_LIFETIME),
    });
    me.sprite.restart(Animation::SpellBullet);

    sim.play_sound(SoundId::ShootSpell);
}

pub fn update_spell_bullet(sim: &mut Simulation, id: EntityId) {
    let Some(mut me) = sim.registry.get(id).cloned() else {
        return;
    };
    let EntityData::SpellBullet(mut state) = me.data else {
        return;
    };
    me.pos.x += state.speed;

    if let Some(blocker) = sim
        .registry
        .first_hit(id, me.hitbox(), EntityKind::SpellBlocker)
    {
        sim.play_sound(SoundId::BreakBlock);
        sim.stop_sound(SoundId::ShootSpell);
        destroy(sim, blocker);
        destroy(sim, id);
        return;
    }

    let expired = state.ttl.tick();
    let hit_block = sim
        .tile_at(SBULLET_BBOX.around(me.pos), TileType::Block)
        .is_some();
    if expired || hit_block {
        destroy(sim, id);
        return;
    }

    me.data = EntityData::SpellBullet(state);
    sim.registry.put(id, me);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::audio::Mixer;
    use crate::resources::roomstore::RoomStore;
    use crate::systems::spawn::spawn;

    fn sim() -> Simulation {
        Simulation::new(RoomStore::default(), Mixer::silent(), 1)
    }

    #[test]
    fn test_bullet_moves_and_counts() {
        let mut sim = sim();
        let record = SpawnRecord::new(EntityKind::Bullet)
            .with_vec4(0, Vec4::xy(100.0, 100.0))
            .with_f32(4, 16.0);
        let id = spawn(&mut sim, &record).unwrap();
        assert_eq!(sim.bullet_count, 1);

        update_bullet(&mut sim, id);
        assert_eq!(sim.registry.get(id).unwrap().pos.x, 116.0);
    }

    #[test]
    fn test_spell_bullet_breaks_blocker() {
        let mut sim = sim();
        let blocker = spawn(
            &mut sim,
            &SpawnRecord::new(EntityKind::SpellBlocker).with_vec4(0, Vec4::xy(110.0, 116.0)),
        )
        .unwrap();
        let bullet = spawn(
            &mut sim,
            &SpawnRecord::new(EntityKind::SpellBullet)
                .with_vec4(0, Vec4::xy(100.0, 100.0))
                .with_f32(4, 16.0),
        )
        .unwrap();

        update_spell_bullet(&mut sim, bullet);
        assert!(!sim.registry.contains(blocker));
        assert!(!sim.registry.contains(bullet));
    }

    #[test]
    fn test_spell_bullet_scale_follows_direction() {
        let mut sim = sim();
        let id = spawn(
            &mut sim,
            &SpawnRecord::new(EntityKind::SpellBullet).with_f32(4, -16.0),
        )
        .unwrap();
        assert_eq!(sim.registry.get(id).unwrap().scale.x, -1.0);
    }
}
