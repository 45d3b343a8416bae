//! Four-lane world vectors.
//!
//! Entity positions and scales are stored as [`Vec4`]: `x`/`y` are pixels in
//! the play field (Y grows upward), `z` is the draw depth and `w` is unused
//! and kept at 0 for positions, 1 for scales.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::resources::tilemap::{GAME_HEIGHT, GAME_WIDTH};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Position in the play field with zero depth.
    pub const fn xy(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Integer pixel origin used by hit boxes: each lane is `trunc(v + 0.5)`.
    pub fn rounded_origin(self) -> (i32, i32) {
        ((self.x + 0.5) as i32, (self.y + 0.5) as i32)
    }

    /// Integer pixel origin without rounding (plain truncation).
    pub fn truncated_origin(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }

    /// Fractional part of every lane, truncating toward zero.
    pub fn fract(self) -> Self {
        Self::new(
            self.x - (self.x as i32) as f32,
            self.y - (self.y as i32) as f32,
            self.z - (self.z as i32) as f32,
            self.w - (self.w as i32) as f32,
        )
    }

    /// Maps a play-field position to normalized device coordinates, keeping depth.
    pub fn to_ndc(self) -> Self {
        Self::new(
            self.x * (2.0 / GAME_WIDTH as f32) - 1.0,
            self.y * (2.0 / GAME_HEIGHT as f32) - 1.0,
            self.z,
            0.0,
        )
    }
}

impl Add for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl AddAssign for Vec4 {
    fn add_assign(&mut self, rhs: Vec4) {
        *self = *self + rhs;
    }
}

impl Sub for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_origin_truncates_after_half_offset() {
        assert_eq!(Vec4::xy(10.4, 20.6).rounded_origin(), (10, 21));
        // Truncation, not floor: -0.7 + 0.5 = -0.2 -> 0
        assert_eq!(Vec4::xy(-0.7, 0.0).rounded_origin(), (0, 0));
    }

    #[test]
    fn test_fract_keeps_sign() {
        let f = Vec4::xy(3.25, -1.5).fract();
        assert!((f.x - 0.25).abs() < 1e-6);
        assert!((f.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_to_ndc_corners() {
        let ndc = Vec4::new(0.0, GAME_HEIGHT as f32, -1.0, 0.0).to_ndc();
        assert_eq!(ndc, Vec4::new(-1.0, 1.0, -1.0, 0.0));
    }
}
