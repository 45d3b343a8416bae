//! Tick-based lifetime counter.
//!
//! Projectiles and flashes live for a fixed number of simulation ticks. The
//! owning behavior calls [`Ttl::tick`] once per update and removes itself when
//! it reports expiry.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl {
    /// Ticks left, including the current one.
    pub remaining: u32,
}

impl Ttl {
    pub fn new(ticks: u32) -> Self {
        Ttl { remaining: ticks }
    }

    /// Consume one tick. Returns `true` on the tick the lifetime runs out.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}
