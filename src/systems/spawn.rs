//! Entity lifecycle: spawning from records and destroying.
//!
//! [`spawn`] appends a blank entity of the record's kind at the tail of the
//! list and runs that kind's initializer. An initializer may remove other
//! entities (the kid keeps itself unique), so the returned handle is optional.
//! [`destroy`] runs the kind's destroy hook before unlinking the entity.

use log::{error, warn};

use crate::components::entity::{Entity, EntityKind};
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::systems::{boss, kid, particleemitter, props, projectile, savepoint};

/// Create an entity from `record`.
///
/// Returns `None` for unknown kind tags or when the new entity did not
/// survive its own initialization.
///
/// # Panics
///
/// Panics when the entity pool is full; a room never holds more than the
/// pool capacity.
pub fn spawn(sim: &mut Simulation, record: &SpawnRecord) -> Option<EntityId> {
    let Some(kind) = record.kind() else {
        warn!("skipping spawn record with unknown kind tag {}", record.kind_tag);
        return None;
    };

    let id = match sim.registry.insert_tail(Entity::new(kind)) {
        Ok(id) => id,
        Err(err) => {
            error!("cannot spawn {}: {err}", kind.info().name);
            panic!("cannot spawn {}: {err}", kind.info().name);
        }
    };

    init(sim, id, kind, record);
    sim.registry.contains(id).then_some(id)
}

fn init(sim: &mut Simulation, id: EntityId, kind: EntityKind, record: &SpawnRecord) {
    match kind {
        EntityKind::Kid => kid::init_kid(sim, id, record),
        EntityKind::Bullet => projectile::init_bullet(sim, id, record),
        EntityKind::SpellBullet => projectile::init_spell_bullet(sim, id, record),
        EntityKind::SavePoint => savepoint::init_save_point(sim, id, record),
        EntityKind::Warp => props::init_warp(sim, id, record),
        EntityKind::GameOver => props::init_game_over(sim, id),
        EntityKind::BloodEmitter => particleemitter::init_blood_emitter(sim, id, record),
        EntityKind::Intro => props::init_intro(sim, id),
        EntityKind::SpellPickup => props::init_spell_pickup(sim, id, record),
        EntityKind::SpellBlocker => props::init_spell_blocker(sim, id, record),
        EntityKind::IdleKid => props::init_idle_kid(sim, id, record),
        EntityKind::Thunder => props::init_thunder(sim, id),
        EntityKind::Dragon => boss::init_dragon(sim, id, record),
        EntityKind::DragonDefeat => boss::init_dragon_defeat(sim, id, record),
        EntityKind::DragonPart => boss::init_dragon_part(sim, id, record),
    }
}

/// Run the destroy hook of `id`, then unlink and free it.
///
/// Stale handles are ignored.
pub fn destroy(sim: &mut Simulation, id: EntityId) -> Option<Entity> {
    let kind = sim.registry.get(id)?.kind();
    if kind == EntityKind::Bullet {
        projectile::destroy_bullet(sim);
    }
    sim.registry.remove(id)
}

/// Destroy every entity, head first, running each destroy hook.
pub fn clear_entities(sim: &mut Simulation) {
    while let Some(id) = sim.registry.head() {
        if destroy(sim, id).is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mapposition::Vec4;
    use crate::resources::audio::Mixer;
    use crate::resources::roomstore::RoomStore;

    fn sim() -> Simulation {
        Simulation::new(RoomStore::default(), Mixer::silent(), 7)
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        let mut sim = sim();
        let mut record = SpawnRecord::new(EntityKind::Warp);
        record.kind_tag = 99;
        assert_eq!(spawn(&mut sim, &record), None);
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn test_second_kid_replaces_first() {
        let mut sim = sim();
        let record = SpawnRecord::new(EntityKind::Kid)
            .with_vec4(0, Vec4::xy(100.0, 100.0))
            .with_vec4(1, Vec4::ONE);
        let first = spawn(&mut sim, &record);
        let second = spawn(&mut sim, &record);
        assert!(first.is_some() && second.is_some());
        assert_eq!(sim.registry.len(), 1);
        assert_eq!(sim.registry.head(), second);
    }

    #[test]
    fn test_clear_runs_bullet_destroy_hook() {
        let mut sim = sim();
        for _ in 0..3 {
            spawn(&mut sim, &SpawnRecord::new(EntityKind::Bullet));
        }
        assert_eq!(sim.bullet_count, 3);
        clear_entities(&mut sim);
        assert_eq!(sim.bullet_count, 0);
        assert!(sim.registry.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_pool_exhaustion_is_fatal() {
        let mut sim = sim();
        for _ in 0..=sim.registry.capacity() {
            spawn(&mut sim, &SpawnRecord::new(EntityKind::Warp));
        }
    }
}
