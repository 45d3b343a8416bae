/// Simulation clock: whole ticks plus the wall time they stand for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    /// Ticks simulated so far.
    pub tick: u64,
    /// Seconds simulated so far.
    pub elapsed: f32,
    /// Seconds per tick.
    pub delta: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            tick: 0,
            elapsed: 0.0,
            delta: 1.0 / 50.0,
        }
    }
}

impl WorldTime {
    pub fn with_fps(fps: u32) -> Self {
        WorldTime {
            delta: 1.0 / fps.max(1) as f32,
            ..Default::default()
        }
    }
}
