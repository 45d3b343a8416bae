//! Signed frame counters used for cooldowns.
//!
//! A [`Cooldown`] counts down every tick without stopping at zero, matching
//! how save points track both their re-trigger delay and their lit-up time.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cooldown {
    pub frames: i32,
}

impl Cooldown {
    pub fn tick(&mut self) {
        self.frames = self.frames.saturating_sub(1);
    }

    /// Restart the countdown.
    pub fn set(&mut self, frames: i32) {
        self.frames = frames;
    }

    /// Still counting down.
    pub fn active(&self) -> bool {
        self.frames > 0
    }
}
