//! Time update system.
//!
//! Advances the simulation's [`WorldTime`](crate::resources::worldtime::WorldTime)
//! by one fixed tick.
use crate::resources::simulation::Simulation;

/// Count one finished tick.
pub fn update_world_time(sim: &mut Simulation) {
    let time = &mut sim.time;
    time.tick += 1;
    time.elapsed += time.delta;
}
