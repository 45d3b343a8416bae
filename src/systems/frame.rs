//! Frame driver: one pass over the entity list per tick.
//!
//! Entities are visited head to tail. For each one the sprite advances, then
//! its behavior runs. Behaviors may destroy any entity (themselves included)
//! and append new ones; the registry's visit bracket keeps the walk on live
//! entities, and anything appended during the pass is visited in the same
//! pass.
//!
//! A behavior that reloads the room sets
//! [`Simulation::reset_tick`](crate::resources::simulation::Simulation::reset_tick).
//! The pass stops right there; the rebuilt list is walked from its head on
//! the next tick.

use crate::components::entity::EntityKind;
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::systems::{boss, kid, particleemitter, props, projectile, savepoint};

/// Run the behavior of `id` for one tick.
pub fn update_entity(sim: &mut Simulation, id: EntityId) {
    let Some(kind) = sim.registry.get(id).map(|e| e.kind()) else {
        return;
    };
    match kind {
        EntityKind::Kid => kid::update_kid(sim, id),
        EntityKind::Bullet => projectile::update_bullet(sim, id),
        EntityKind::SpellBullet => projectile::update_spell_bullet(sim, id),
        EntityKind::SavePoint => savepoint::update_save_point(sim, id),
        EntityKind::GameOver => props::update_game_over(sim, id),
        EntityKind::Thunder => props::update_thunder(sim, id),
        EntityKind::BloodEmitter => particleemitter::update_blood_emitter(sim, id),
        EntityKind::DragonDefeat => boss::update_dragon_defeat(sim, id),
        EntityKind::DragonPart => boss::update_dragon_part(sim, id),
        EntityKind::Warp
        | EntityKind::Intro
        | EntityKind::SpellPickup
        | EntityKind::SpellBlocker
        | EntityKind::Dragon
        | EntityKind::IdleKid => {}
    }
}

/// Visit every entity once. Returns the number of behaviors run.
pub fn run_entity_pass(sim: &mut Simulation) -> usize {
    let mut visited = 0;
    let mut cursor = sim.registry.head();

    while let Some(id) = cursor {
        sim.registry.begin_visit(id);
        if let Some(e) = sim.registry.get_mut(id) {
            e.sprite.advance();
        }
        update_entity(sim, id);
        visited += 1;
        cursor = sim.registry.end_visit();

        // One tick of lag: the new room's entities first update on the next
        // tick, not the one that loaded them.
        if sim.reset_tick {
            sim.reset_tick = false;
            break;
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mapposition::Vec4;
    use crate::resources::audio::Mixer;
    use crate::resources::roomstore::RoomStore;
    use crate::resources::spawnrecord::SpawnRecord;
    use crate::systems::spawn::spawn;

    #[test]
    fn test_entities_spawned_mid_pass_run_same_tick() {
        let mut sim = Simulation::new(RoomStore::default(), Mixer::silent(), 0);
        // A kid above the play field dies on its first update and leaves a
        // banner and a blood emitter behind.
        let kid = SpawnRecord::new(EntityKind::Kid)
            .with_vec4(0, Vec4::xy(100.0, -50.0))
            .with_vec4(1, Vec4::ONE);
        spawn(&mut sim, &kid);

        let visited = run_entity_pass(&mut sim);
        assert_eq!(visited, 3);
        let kinds: Vec<_> = sim.registry.iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, vec![EntityKind::GameOver, EntityKind::BloodEmitter]);
        assert!(!sim.frame.quads.is_empty());
    }
}
