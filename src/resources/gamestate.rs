//! High-level game state.
//!
//! [`GameMode`] selects which frame routine runs (title screen or play) and
//! [`Spell`] is the single power-up the player can hold at a time.

use serde::{Deserialize, Serialize};

use crate::components::sprite::ImageId;

/// Discrete high-level modes the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Title,
    Play,
}

/// Held power-up. Casting consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Spell {
    #[default]
    None = 0,
    Jump = 1,
    Shoot = 2,
    Speed = 3,
    Final = 4,
}

impl Spell {
    /// Decode the integer stored in spawn records. Out-of-range values read as no spell.
    pub fn from_u32(value: u32) -> Spell {
        match value {
            1 => Spell::Jump,
            2 => Spell::Shoot,
            3 => Spell::Speed,
            4 => Spell::Final,
            _ => Spell::None,
        }
    }

    /// The next spell in order, wrapping back to none after the final spell.
    pub fn cycled(self) -> Spell {
        Spell::from_u32((self as u32 + 1) % 5)
    }

    /// Pickup image for this spell.
    pub fn image(self) -> ImageId {
        match self {
            Spell::None => ImageId::NONE,
            Spell::Jump => ImageId::JUMPSPELL,
            Spell::Shoot => ImageId::SHOOTSPELL,
            Spell::Speed => ImageId::SPEEDSPELL,
            Spell::Final => ImageId::FINALSPELL,
        }
    }
}
