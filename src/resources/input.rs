//! Per-tick input snapshot.
//!
//! The shell reports button edges; the simulation reads three bit sets per
//! tick: what went down this tick, what came up this tick, and what is held.
//! A press and release inside the same tick still registers as a press for
//! exactly one tick.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

/// Set of game buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const LEFT: Buttons = Buttons(1 << 0);
    pub const RIGHT: Buttons = Buttons(1 << 1);
    pub const UP: Buttons = Buttons(1 << 2);
    pub const DOWN: Buttons = Buttons(1 << 3);
    pub const JUMP: Buttons = Buttons(1 << 4);
    pub const SHOOT: Buttons = Buttons(1 << 5);
    pub const RESTART: Buttons = Buttons(1 << 6);
    pub const NEW_GAME: Buttons = Buttons(1 << 7);

    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn intersects(self, other: Buttons) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn remove(&mut self, other: Buttons) {
        self.0 &= !other.0;
    }

    /// Parse a button name as used in replay scripts.
    pub fn from_name(name: &str) -> Option<Buttons> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(Buttons::LEFT),
            "right" => Some(Buttons::RIGHT),
            "up" => Some(Buttons::UP),
            "down" => Some(Buttons::DOWN),
            "jump" => Some(Buttons::JUMP),
            "shoot" => Some(Buttons::SHOOT),
            "restart" => Some(Buttons::RESTART),
            "newgame" | "new_game" => Some(Buttons::NEW_GAME),
            _ => None,
        }
    }
}

impl BitOr for Buttons {
    type Output = Buttons;
    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Buttons) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Buttons;
    fn bitand(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 & rhs.0)
    }
}

impl Not for Buttons {
    type Output = Buttons;
    fn not(self) -> Buttons {
        Buttons(!self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Went down this tick.
    pub pressed: Buttons,
    /// Came up this tick.
    pub released: Buttons,
    /// Held this tick.
    pub down: Buttons,
    /// Held going into the next tick, before that tick's edges apply.
    pub next_down: Buttons,
}

impl InputSnapshot {
    pub fn press(&mut self, buttons: Buttons) {
        self.pressed |= buttons;
    }

    pub fn release(&mut self, buttons: Buttons) {
        self.released |= buttons;
    }

    /// Fold this tick's edges into the held set. Presses win over releases
    /// for the current tick; a release always clears the button afterwards.
    pub fn update_down(&mut self) {
        self.down = (self.next_down & !self.released) | self.pressed;
        self.next_down = self.down & !self.released;
    }

    /// Drop the per-tick edges once a tick has consumed them.
    pub fn clear_edges(&mut self) {
        self.pressed = Buttons::NONE;
        self.released = Buttons::NONE;
    }

    pub fn is_pressed(&self, b: Buttons) -> bool {
        self.pressed.intersects(b)
    }

    pub fn is_released(&self, b: Buttons) -> bool {
        self.released.intersects(b)
    }

    pub fn is_down(&self, b: Buttons) -> bool {
        self.down.intersects(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_within_one_tick_is_seen_once() {
        let mut input = InputSnapshot::default();
        input.press(Buttons::JUMP);
        input.release(Buttons::JUMP);
        input.update_down();
        assert!(input.is_down(Buttons::JUMP));
        input.clear_edges();
        input.update_down();
        assert!(!input.is_down(Buttons::JUMP));
    }

    #[test]
    fn test_held_button_stays_down() {
        let mut input = InputSnapshot::default();
        input.press(Buttons::RIGHT);
        input.update_down();
        input.clear_edges();
        for _ in 0..3 {
            input.update_down();
            assert!(input.is_down(Buttons::RIGHT));
            assert!(!input.is_pressed(Buttons::RIGHT));
        }
        input.release(Buttons::RIGHT);
        input.update_down();
        assert!(!input.is_down(Buttons::RIGHT));
    }

    #[test]
    fn test_chord_contains() {
        let held = Buttons::UP | Buttons::DOWN | Buttons::NEW_GAME | Buttons::LEFT;
        assert!(held.contains(Buttons::UP | Buttons::DOWN | Buttons::NEW_GAME));
        assert!(!Buttons::UP.contains(Buttons::UP | Buttons::DOWN));
        assert_eq!(Buttons::from_name("NewGame"), Some(Buttons::NEW_GAME));
    }
}
