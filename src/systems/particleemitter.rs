//! Blood emitter system.
//!
//! A blood emitter is spawned where the kid dies. For its first
//! [`EMITTER_LIFETIME`](crate::components::particleemitter::EMITTER_LIFETIME)
//! ticks it sprays a burst of drops in random directions; every tick all drops
//! move and fall, and the whole buffer is submitted to the render batch.
//!
//! # Randomness
//!
//! Each drop draws three 16-bit values from the simulation RNG, in order:
//! direction, speed, extra gravity. Seeding the simulation reproduces the
//! spray exactly.

use std::f32::consts::PI;

use crate::components::entity::EntityData;
use crate::components::particleemitter::{
    BLOOD_GRAVITY_ADD, BLOOD_GRAVITY_BASE, BloodEmitter, BloodParticle, EMITTER_PARTICLE_FREQ,
};
use crate::resources::registry::EntityId;
use crate::resources::simulation::Simulation;
use crate::resources::spawnrecord::SpawnRecord;
use crate::resources::tilemap::{GAME_HEIGHT, GAME_WIDTH};

/// Peak drop speed in pixels per tick.
const BLOOD_MAX_SPEED: f32 = 6.0;

pub fn init_blood_emitter(sim: &mut Simulation, id: EntityId, record: &SpawnRecord) {
    let Some(me) = sim.registry.get_mut(id) else {
        return;
    };
    me.pos = record.vec4_at(0).to_ndc();
    me.data = EntityData::Blood(Box::new(BloodEmitter::new(me.pos)));
    me.sprite.hide();
}

fn random_unit(rng: &mut fastrand::Rng) -> f32 {
    (rng.u32(..) & 0xffff) as f32 / 65536.0
}

fn random_drop(rng: &mut fastrand::Rng) -> BloodParticle {
    let dir = PI * random_unit(rng) * 2.0;
    let speed = BLOOD_MAX_SPEED * random_unit(rng) * 2.0;
    let gravity = BLOOD_GRAVITY_ADD * random_unit(rng) + BLOOD_GRAVITY_BASE;
    BloodParticle {
        vx: dir.cos() * speed / GAME_WIDTH as f32,
        vy: dir.sin() * speed / GAME_HEIGHT as f32,
        gravity,
    }
}

/// Emit, move and draw the drops of one blood emitter.
pub fn update_blood_emitter(sim: &mut Simulation, id: EntityId) {
    let Simulation {
        registry,
        rng,
        frame,
        ..
    } = sim;
    let Some(EntityData::Blood(emitter)) = registry.get_mut(id).map(|e| &mut e.data) else {
        return;
    };

    if emitter.is_emitting() {
        for _ in 0..EMITTER_PARTICLE_FREQ {
            emitter.emit(random_drop(rng));
        }
    }
    emitter.step();
    frame.submit_quads(&emitter.quads);
}
