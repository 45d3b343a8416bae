//! Sprite animation state.
//!
//! Every entity carries a [`Sprite`]: the image currently shown, the range of
//! images the animation cycles through and a frame counter that advances the
//! image every `frames_per_image` ticks. Still images use the same machinery
//! with a one-image range.

/// Index of an image in the sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u8);

impl ImageId {
    pub const PSTAND0: ImageId = ImageId(0);
    pub const PSTAND3: ImageId = ImageId(3);
    pub const PWALK0: ImageId = ImageId(4);
    pub const PWALK3: ImageId = ImageId(7);
    pub const PJUMP0: ImageId = ImageId(8);
    pub const PJUMP1: ImageId = ImageId(9);
    pub const PFALL0: ImageId = ImageId(10);
    pub const PFALL1: ImageId = ImageId(11);
    pub const PVINE0: ImageId = ImageId(12);
    pub const PVINE1: ImageId = ImageId(13);
    pub const BULLET0: ImageId = ImageId(14);
    pub const BULLET1: ImageId = ImageId(15);
    pub const SAVE: ImageId = ImageId(16);
    pub const SAVEHIT: ImageId = ImageId(17);
    pub const WARP: ImageId = ImageId(18);
    pub const GAMEOVER: ImageId = ImageId(19);
    pub const INTRO0: ImageId = ImageId(20);
    pub const INTRO5: ImageId = ImageId(25);
    pub const JUMPSPELL: ImageId = ImageId(26);
    pub const SHOOTSPELL: ImageId = ImageId(27);
    pub const SPEEDSPELL: ImageId = ImageId(28);
    pub const FINALSPELL: ImageId = ImageId(29);
    pub const SBULLET0: ImageId = ImageId(30);
    pub const SBULLET1: ImageId = ImageId(31);
    pub const SBKILLER: ImageId = ImageId(32);
    pub const DRAGON: ImageId = ImageId(33);
    pub const WHITEDRAGON: ImageId = ImageId(34);
    pub const WHITEDRAGON1: ImageId = ImageId(35);
    pub const WHITEDRAGON2: ImageId = ImageId(36);
    pub const THUNDER0: ImageId = ImageId(37);
    pub const THUNDER1: ImageId = ImageId(38);
    /// Number of images in the atlas.
    pub const COUNT: u8 = 39;
    /// Nothing is drawn.
    pub const NONE: ImageId = ImageId(0xfe);

    pub fn is_drawable(self) -> bool {
        self.0 < Self::COUNT
    }
}

/// Predefined looping animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Stand,
    Walk,
    Jump,
    Fall,
    Vine,
    Bullet,
    SpellBullet,
    Thunder,
}

impl Animation {
    /// `(first image, last image, frames per image)`.
    pub const fn frames(self) -> (ImageId, ImageId, u8) {
        match self {
            Animation::Stand => (ImageId::PSTAND0, ImageId::PSTAND3, 5),
            Animation::Walk => (ImageId::PWALK0, ImageId::PWALK3, 2),
            Animation::Jump => (ImageId::PJUMP0, ImageId::PJUMP1, 2),
            Animation::Fall => (ImageId::PFALL0, ImageId::PFALL1, 2),
            Animation::Vine => (ImageId::PVINE0, ImageId::PVINE1, 2),
            Animation::Bullet => (ImageId::BULLET0, ImageId::BULLET1, 1),
            Animation::SpellBullet => (ImageId::SBULLET0, ImageId::SBULLET1, 1),
            Animation::Thunder => (ImageId::THUNDER0, ImageId::THUNDER1, 2),
        }
    }
}

/// Frames-per-image used by still images; effectively never advances.
const STILL_FPI: u8 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Animation being played, `None` for a still image.
    pub animation: Option<Animation>,
    pub start: ImageId,
    pub end: ImageId,
    pub image: ImageId,
    pub frame: u8,
    pub frames_per_image: u8,
}

impl Default for Sprite {
    fn default() -> Self {
        Self::still(ImageId::NONE)
    }
}

impl Sprite {
    /// A single image that never changes.
    pub fn still(image: ImageId) -> Self {
        Sprite {
            animation: None,
            start: image,
            end: image,
            image,
            frame: 0,
            frames_per_image: STILL_FPI,
        }
    }

    /// An animation starting at its first image.
    pub fn animated(animation: Animation) -> Self {
        let (start, end, fpi) = animation.frames();
        Sprite {
            animation: Some(animation),
            start,
            end,
            image: start,
            frame: 0,
            frames_per_image: fpi,
        }
    }

    /// Switch to `animation` unless it is already playing.
    pub fn play(&mut self, animation: Animation) {
        if self.animation != Some(animation) {
            *self = Sprite::animated(animation);
        }
    }

    /// Switch to `animation`, restarting it even if it is already playing.
    pub fn restart(&mut self, animation: Animation) {
        *self = Sprite::animated(animation);
    }

    pub fn show(&mut self, image: ImageId) {
        *self = Sprite::still(image);
    }

    pub fn hide(&mut self) {
        *self = Sprite::still(ImageId::NONE);
    }

    /// Advance the frame counter by one tick, wrapping the image between
    /// `start` and `end`.
    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.frame >= self.frames_per_image {
            self.frame = 0;
            self.image = ImageId(self.image.0.wrapping_add(1));
            if self.image > self.end {
                self.image = self.start;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_cycles_every_two_ticks() {
        let mut s = Sprite::animated(Animation::Walk);
        let mut seen = Vec::new();
        for _ in 0..8 {
            s.advance();
            seen.push(s.image.0);
        }
        assert_eq!(seen, vec![4, 5, 5, 6, 6, 7, 7, 4]);
    }

    #[test]
    fn test_play_same_animation_keeps_progress() {
        let mut s = Sprite::animated(Animation::Stand);
        for _ in 0..5 {
            s.advance();
        }
        assert_eq!(s.image, ImageId(1));
        s.play(Animation::Stand);
        assert_eq!(s.image, ImageId(1));
        s.restart(Animation::Stand);
        assert_eq!(s.image, ImageId::PSTAND0);
    }

    #[test]
    fn test_still_image_never_changes() {
        let mut s = Sprite::still(ImageId::SAVE);
        for _ in 0..600 {
            s.advance();
        }
        assert_eq!(s.image, ImageId::SAVE);
        let mut hidden = Sprite::default();
        hidden.advance();
        assert!(!hidden.image.is_drawable());
    }
}
