use crate::components::mapposition::Vec4;

/// Integer axis-aligned box `(left, bottom, right, top)` in pixels.
///
/// Kind descriptors store it relative to the entity origin; [`BoxCollider::at`]
/// places it in the play field. Boxes are half-open: `right` and `top` are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxCollider {
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
}

impl BoxCollider {
    pub const EMPTY: BoxCollider = BoxCollider::new(0, 0, 0, 0);

    pub const fn new(left: i32, bottom: i32, right: i32, top: i32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Translate by an integer origin.
    pub const fn at(self, (x, y): (i32, i32)) -> Self {
        Self::new(self.left + x, self.bottom + y, self.right + x, self.top + y)
    }

    /// Box placed at `pos` using the rounded origin entities collide with.
    pub fn around(self, pos: Vec4) -> Self {
        self.at(pos.rounded_origin())
    }

    /// Offset each edge independently.
    pub const fn grow(self, left: i32, bottom: i32, right: i32, top: i32) -> Self {
        Self::new(
            self.left + left,
            self.bottom + bottom,
            self.right + right,
            self.top + top,
        )
    }

    /// Strict AABB overlap; touching edges do not count.
    pub fn overlaps(&self, other: &BoxCollider) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }
}
