//! Blood particle buffer owned by a blood-emitter entity.
//!
//! The emitter spawns a burst of particles every tick for a fixed number of
//! ticks, then keeps simulating and drawing the ones it has. Particles live in
//! normalized device coordinates so they can be submitted straight to the
//! render batch.
//!
//! # Related
//!
//! - [`crate::systems::particleemitter::update_blood_emitter`] – per-tick emission and motion

use crate::components::mapposition::Vec4;
use crate::resources::renderframe::{RenderQuad, Vertex};
use crate::resources::tilemap::{GAME_HEIGHT, GAME_WIDTH};

/// Ticks during which new particles are emitted.
pub const EMITTER_LIFETIME: usize = 20;
/// Particles emitted per tick.
pub const EMITTER_PARTICLE_FREQ: usize = 40;
pub const EMITTER_CAPACITY: usize = EMITTER_LIFETIME * EMITTER_PARTICLE_FREQ;
/// Minimum downward acceleration per tick, in NDC units.
pub const BLOOD_GRAVITY_BASE: f32 = -0.2 / GAME_HEIGHT as f32;
/// Random extra downward acceleration, in NDC units.
pub const BLOOD_GRAVITY_ADD: f32 = -0.4 / GAME_HEIGHT as f32;

const BLOOD_S: u16 = 239;
const BLOOD_T: u16 = 107;

/// Template quad for one drop, centered on the origin.
pub fn blood_quad() -> RenderQuad {
    let w = 2.0 / GAME_WIDTH as f32;
    let h = 2.0 / GAME_HEIGHT as f32;
    RenderQuad::new([
        Vertex::new(-w, -h, 0.0, BLOOD_S, BLOOD_T),
        Vertex::new(w, 0.0, 0.0, BLOOD_S, BLOOD_T),
        Vertex::new(-w, 0.0, 0.0, BLOOD_S, BLOOD_T),
        Vertex::new(w, h, 0.0, BLOOD_S, BLOOD_T),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodParticle {
    pub vx: f32,
    pub vy: f32,
    pub gravity: f32,
}

/// Heap buffer of live particles; dropped with the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct BloodEmitter {
    /// Emission origin in NDC.
    pub origin: Vec4,
    pub quads: Vec<RenderQuad>,
    pub particles: Vec<BloodParticle>,
}

impl BloodEmitter {
    pub fn new(origin: Vec4) -> Self {
        BloodEmitter {
            origin,
            quads: Vec::with_capacity(EMITTER_CAPACITY),
            particles: Vec::with_capacity(EMITTER_CAPACITY),
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.particles.len() < EMITTER_CAPACITY
    }

    pub fn emit(&mut self, particle: BloodParticle) {
        self.quads.push(blood_quad().offset(self.origin));
        self.particles.push(particle);
    }

    /// Move every particle by its velocity, then apply its gravity.
    pub fn step(&mut self) {
        for (quad, p) in self.quads.iter_mut().zip(self.particles.iter_mut()) {
            *quad = quad.offset(Vec4::xy(p.vx, p.vy));
            p.vy += p.gravity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_applies_velocity_then_gravity() {
        let mut e = BloodEmitter::new(Vec4::ZERO);
        e.emit(BloodParticle {
            vx: 0.01,
            vy: 0.02,
            gravity: -0.005,
        });
        let before = e.quads[0].vertices[1];
        e.step();
        let after = e.quads[0].vertices[1];
        assert!((after.x - before.x - 0.01).abs() < 1e-6);
        assert!((after.y - before.y - 0.02).abs() < 1e-6);
        assert!((e.particles[0].vy - 0.015).abs() < 1e-6);
    }
}
