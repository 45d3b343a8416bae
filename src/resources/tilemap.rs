//! Tile map and tile collision.
//!
//! A room's collision layer is a flat 25×19 grid of packed 16-bit tile codes.
//! Row 0 is the bottom of the screen. Each code holds:
//!
//! - bits 0..8: tile type ([`TileType`])
//! - bits 8..14: collision shape ([`TileMask`])
//! - bit 14: right-vine flag, bit 15: left-vine flag
//!
//! [`TileMap::query`] finds the first cell of a given type whose shape
//! actually touches a query box.

use crate::components::boxcollider::BoxCollider;

pub const GAME_WIDTH: i32 = 800;
pub const GAME_HEIGHT: i32 = 608;
pub const TILE_SIZE: i32 = 32;
pub const MAP_WIDTH: usize = (GAME_WIDTH / TILE_SIZE) as usize;
pub const MAP_HEIGHT: usize = (GAME_HEIGHT / TILE_SIZE) as usize;
pub const MAP_LEN: usize = MAP_WIDTH * MAP_HEIGHT;

pub const TILE_ID_MASK: u16 = 0x00ff;
pub const TILE_SHAPE_MASK: u16 = 0x3f00;
pub const TILE_SHAPE_SHIFT: u16 = 8;
pub const TILE_RVINE_BIT: u16 = 0x4000;
pub const TILE_LVINE_BIT: u16 = 0x8000;
/// Attribute filter that accepts any non-empty tile code.
pub const TILE_ANY_BIT: u16 = 0xffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileType {
    None = 0,
    Block = 1,
    Killer = 2,
    Platform = 3,
    Prop = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileMask {
    None = 0,
    Full = 1,
    DownSpike = 2,
    UpSpike = 3,
    LeftSpike = 4,
    RightSpike = 5,
    Platform = 6,
}

impl TileMask {
    pub fn from_code(code: u16) -> Option<TileMask> {
        match (code & TILE_SHAPE_MASK) >> TILE_SHAPE_SHIFT {
            0 => Some(TileMask::None),
            1 => Some(TileMask::Full),
            2 => Some(TileMask::DownSpike),
            3 => Some(TileMask::UpSpike),
            4 => Some(TileMask::LeftSpike),
            5 => Some(TileMask::RightSpike),
            6 => Some(TileMask::Platform),
            _ => None,
        }
    }
}

/// Pack a tile type, shape and extra flag bits into a tile code.
pub const fn tile_code(ty: TileType, mask: TileMask, flags: u16) -> u16 {
    (ty as u16) | ((mask as u16) << TILE_SHAPE_SHIFT) | flags
}

/// A matching cell returned by [`TileMap::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    pub index: usize,
    pub code: u16,
}

impl TileHit {
    pub fn column(&self) -> usize {
        self.index % MAP_WIDTH
    }

    pub fn row(&self) -> usize {
        self.index / MAP_WIDTH
    }

    /// Y of the cell's top edge in pixels.
    pub fn top(&self) -> i32 {
        self.row() as i32 * TILE_SIZE + TILE_SIZE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    tiles: [u16; MAP_LEN],
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMap {
    /// An all-empty map.
    pub const fn new() -> Self {
        TileMap {
            tiles: [0; MAP_LEN],
        }
    }

    pub fn from_tiles(tiles: [u16; MAP_LEN]) -> Self {
        TileMap { tiles }
    }

    pub fn tiles(&self) -> &[u16; MAP_LEN] {
        &self.tiles
    }

    pub fn get(&self, column: usize, row: usize) -> u16 {
        self.tiles[row * MAP_WIDTH + column]
    }

    pub fn set(&mut self, column: usize, row: usize, code: u16) {
        self.tiles[row * MAP_WIDTH + column] = code;
    }

    /// Fill a rectangle of cells, inclusive on both ends.
    pub fn fill(&mut self, columns: (usize, usize), rows: (usize, usize), code: u16) {
        for row in rows.0..=rows.1 {
            for column in columns.0..=columns.1 {
                self.set(column, row, code);
            }
        }
    }

    /// First cell overlapped by `bbox` whose type is `ty`, whose code shares a
    /// bit with `bits`, and whose shape touches the box.
    ///
    /// The box is half-open in pixels. Cells are scanned row by row from row 0
    /// upward, columns left to right; the first match wins.
    pub fn query(&self, bbox: BoxCollider, ty: TileType, bits: u16) -> Option<TileHit> {
        let width = MAP_WIDTH as i32;
        let height = MAP_HEIGHT as i32;

        // Truncating division: a box hanging less than a tile off the low edge
        // still maps its low bound to cell 0.
        let low_x = bbox.left / TILE_SIZE;
        let low_y = bbox.bottom / TILE_SIZE;
        let mut high_x = (bbox.right - 1) / TILE_SIZE;
        let mut high_y = (bbox.top - 1) / TILE_SIZE;

        if !(0..width).contains(&low_x) || !(0..height).contains(&low_y) || high_x < 0 || high_y < 0
        {
            return None;
        }

        high_x = high_x.min(width - 1);
        high_y = high_y.min(height - 1);

        for y in low_y..=high_y {
            for x in low_x..=high_x {
                let index = (y * width + x) as usize;
                let code = self.tiles[index];
                if code & bits == 0 || code & TILE_ID_MASK != ty as u16 {
                    continue;
                }
                let Some(mask) = TileMask::from_code(code) else {
                    continue;
                };
                if mask_hit(bbox, x, y, mask) {
                    return Some(TileHit { index, code });
                }
            }
        }

        None
    }
}

/// Whether `bbox` touches the shape `mask` of the cell at (`x`, `y`).
///
/// Spike tests work in a tile-local frame whose Y axis points down from the
/// tile's top edge; each orientation cuts a 45° triangular dead zone.
pub fn mask_hit(bbox: BoxCollider, x: i32, y: i32, mask: TileMask) -> bool {
    let tile_left = x * TILE_SIZE;
    let tile_bottom = y * TILE_SIZE;
    let tile_top = tile_bottom + TILE_SIZE;

    // Local rect: x from the tile's left edge, y measured downward from its top.
    let left = bbox.left - tile_left;
    let right = bbox.right - tile_left;
    let top = TILE_SIZE - (bbox.top - tile_bottom);
    let bottom = TILE_SIZE - (bbox.bottom - tile_bottom);

    match mask {
        TileMask::None => false,
        TileMask::Full => true,
        TileMask::UpSpike => {
            let threshold = if right < 16 {
                (16 - right) * 2
            } else {
                if left <= 16 {
                    return true;
                }
                (left - 16) * 2
            };
            bottom > threshold
        }
        TileMask::DownSpike => {
            let threshold = if right < 16 {
                right * 2
            } else {
                if left <= 16 {
                    return true;
                }
                (32 - left) * 2
            };
            top < threshold
        }
        TileMask::LeftSpike => {
            let threshold = if bottom < 16 {
                (16 - bottom) * 2
            } else {
                if top <= 16 {
                    return true;
                }
                (top - 16) * 2
            };
            right > threshold
        }
        TileMask::RightSpike => {
            let threshold = if bottom < 16 {
                bottom * 2
            } else {
                if top <= 16 {
                    return true;
                }
                (32 - top) * 2
            };
            left < threshold
        }
        TileMask::Platform => bbox.top - tile_top > -16,
    }
}
