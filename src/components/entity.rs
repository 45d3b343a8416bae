//! Entities and their closed set of kinds.
//!
//! Every live object in a room is an [`Entity`]: a shared header (position,
//! scale, sprite, kind descriptor) plus a kind-specific [`EntityData`] payload.
//! The kind set is fixed; behaviors dispatch on [`EntityKind`] with `match`.

use arrayvec::ArrayString;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::Vec4;
use crate::components::particleemitter::BloodEmitter;
use crate::components::sprite::Sprite;
use crate::components::timer::Cooldown;
use crate::components::ttl::Ttl;
use crate::resources::gamestate::Spell;
use crate::resources::spawnrecord::TEXT_LEN;

/// Kind tag as stored in spawn records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    Kid = 0,
    Bullet = 1,
    SavePoint = 2,
    Warp = 3,
    GameOver = 4,
    BloodEmitter = 5,
    Intro = 6,
    SpellPickup = 7,
    SpellBullet = 8,
    SpellBlocker = 9,
    Dragon = 10,
    DragonDefeat = 11,
    IdleKid = 12,
    Thunder = 13,
    DragonPart = 14,
}

impl EntityKind {
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Kid,
        EntityKind::Bullet,
        EntityKind::SavePoint,
        EntityKind::Warp,
        EntityKind::GameOver,
        EntityKind::BloodEmitter,
        EntityKind::Intro,
        EntityKind::SpellPickup,
        EntityKind::SpellBullet,
        EntityKind::SpellBlocker,
        EntityKind::Dragon,
        EntityKind::DragonDefeat,
        EntityKind::IdleKid,
        EntityKind::Thunder,
        EntityKind::DragonPart,
    ];

    pub fn from_tag(tag: u8) -> Option<EntityKind> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Shared descriptor for this kind.
    pub fn info(self) -> &'static KindInfo {
        &KIND_INFO[self as usize]
    }
}

/// Immutable per-kind record shared by every entity of that kind.
#[derive(Debug, PartialEq)]
pub struct KindInfo {
    pub kind: EntityKind,
    pub name: &'static str,
    /// Hit box relative to the entity origin.
    pub bbox: BoxCollider,
}

pub const KID_BBOX: BoxCollider = BoxCollider::new(12 - 17, 23 - 32, 23 - 17, 23 - 11);
pub const BULLET_BBOX: BoxCollider = BoxCollider::new(-1, -3, 3, 1);
pub const SAVE_BBOX: BoxCollider = BoxCollider::new(0, -31, 32, 0);
pub const WARP_BBOX: BoxCollider = BoxCollider::new(6, -26, 26, -6);
pub const SPELL_BBOX: BoxCollider = BoxCollider::new(4, -27, 27, -4);
pub const SBULLET_BBOX: BoxCollider = BoxCollider::new(-4, -4, 4, 4);
pub const SBKILLER_BBOX: BoxCollider = BoxCollider::new(0, -32, 32, 0);

const fn info(kind: EntityKind, name: &'static str, bbox: BoxCollider) -> KindInfo {
    KindInfo { kind, name, bbox }
}

static KIND_INFO: [KindInfo; 15] = [
    info(EntityKind::Kid, "kid", KID_BBOX),
    info(EntityKind::Bullet, "bullet", BULLET_BBOX),
    info(EntityKind::SavePoint, "save", SAVE_BBOX),
    info(EntityKind::Warp, "warp", WARP_BBOX),
    info(EntityKind::GameOver, "gameover", BoxCollider::EMPTY),
    info(EntityKind::BloodEmitter, "blood", BoxCollider::EMPTY),
    info(EntityKind::Intro, "intro", BoxCollider::EMPTY),
    info(EntityKind::SpellPickup, "spell", SPELL_BBOX),
    info(EntityKind::SpellBullet, "spellbullet", SBULLET_BBOX),
    info(EntityKind::SpellBlocker, "spellblocker", SBKILLER_BBOX),
    info(EntityKind::Dragon, "dragon", BoxCollider::EMPTY),
    info(EntityKind::DragonDefeat, "dragondefeat", BoxCollider::EMPTY),
    info(EntityKind::IdleKid, "idlekid", BoxCollider::EMPTY),
    info(EntityKind::Thunder, "thunder", BoxCollider::EMPTY),
    info(EntityKind::DragonPart, "dragonpart", BoxCollider::EMPTY),
];

/// Player kinematic state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KidState {
    pub vspeed: f32,
    pub boost_speed: f32,
    pub boost_timer: u32,
    pub on_ground: bool,
    pub djump: bool,
    pub platform_snapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletState {
    pub speed: f32,
    pub ttl: Ttl,
    /// Touching a save point with this bullet saves the game.
    pub saves_game: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellBulletState {
    pub speed: f32,
    pub ttl: Ttl,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SavePointState {
    /// Ticks before the save point can fire again.
    pub idle: Cooldown,
    /// Ticks the lit-up image stays on.
    pub light: Cooldown,
}

/// Room warp destination.
pub type RoomName = ArrayString<TEXT_LEN>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragonDefeatState {
    /// Resting position the shake is applied around.
    pub anchor: Vec4,
    pub shake: f32,
    pub timer: u32,
    pub clear_color: [f32; 3],
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntityData {
    /// Kinds that carry nothing beyond the header.
    #[default]
    None,
    Kid(KidState),
    Bullet(BulletState),
    SpellBullet(SpellBulletState),
    SavePoint(SavePointState),
    Warp { destination: RoomName },
    GameOver { timer: u32 },
    Blood(Box<BloodEmitter>),
    SpellPickup { spell: Spell },
    DragonDefeat(DragonDefeatState),
    Thunder { ttl: Ttl },
    DragonPart { speed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub pos: Vec4,
    /// `x` sign encodes facing.
    pub scale: Vec4,
    pub info: &'static KindInfo,
    pub sprite: Sprite,
    pub data: EntityData,
}

impl Entity {
    /// Blank entity of `kind`; its initializer fills in the rest.
    pub fn new(kind: EntityKind) -> Self {
        Entity {
            pos: Vec4::ZERO,
            scale: Vec4::ONE,
            info: kind.info(),
            sprite: Sprite::default(),
            data: EntityData::None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.info.kind
    }

    /// Hit box in play-field pixels.
    pub fn hitbox(&self) -> BoxCollider {
        self.info.bbox.around(self.pos)
    }

    /// Strict overlap of both hit boxes.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.hitbox().overlaps(&other.hitbox())
    }

    pub fn kid(&self) -> Option<&KidState> {
        match &self.data {
            EntityData::Kid(k) => Some(k),
            _ => None,
        }
    }

    pub fn kid_mut(&mut self) -> Option<&mut KidState> {
        match &mut self.data {
            EntityData::Kid(k) => Some(k),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_matches_tags() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.info().kind, kind);
            assert_eq!(EntityKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EntityKind::from_tag(15), None);
    }

    #[test]
    fn test_kid_box_edges() {
        assert_eq!(KID_BBOX, BoxCollider::new(-5, -9, 6, 12));
    }
}
