//! Room files.
//!
//! A room is one binary blob: a 1024-byte header, `entity_count` spawn
//! records of 128 bytes, then `quad_count` decorative render quads of 64 bytes.
//!
//! ```text
//! offset  size  field
//!      0    63  bgm file name, NUL-padded
//!     63     1  atlas page
//!     64     4  entity count (u32 LE)
//!     68     4  quad count (u32 LE)
//!     72   950  tile map, 25×19 u16 LE, row 0 first
//!   1022     2  padding
//! ```
//!
//! Each quad is four vertices of `x, y, z` (f32 LE) followed by `s, t`
//! (u16 LE). Parsing reads every field explicitly, so the host byte order
//! never matters.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use arrayvec::ArrayString;

use crate::resources::renderframe::{RenderQuad, Vertex};
use crate::resources::spawnrecord::{
    RECORD_SIZE, SpawnRecord, read_u16_le, read_u32_le, text_from_bytes, write_text,
    write_u16_le, write_u32_le,
};
use crate::resources::tilemap::{MAP_LEN, TileMap};

pub const BGM_LEN: usize = 63;
pub const HEADER_SIZE: usize = 1024;
pub const QUAD_SIZE: usize = 64;
const VERTEX_SIZE: usize = 16;

const PAGE_OFFSET: usize = 63;
const ENTITY_COUNT_OFFSET: usize = 64;
const QUAD_COUNT_OFFSET: usize = 68;
const MAP_OFFSET: usize = 72;

#[derive(Debug)]
pub enum RoomError {
    Io { path: PathBuf, source: io::Error },
    TooShort { actual: usize, min: usize },
    Truncated { expected: usize, actual: usize },
    BadText { source: Utf8Error },
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot open room {}: {source}", path.display())
            }
            Self::TooShort { actual, min } => {
                write!(f, "not a room: got {actual} bytes, need at least {min}")
            }
            Self::Truncated { expected, actual } => write!(
                f,
                "room truncated: header promises {expected} bytes, got {actual}"
            ),
            Self::BadText { source } => write!(f, "room text field is not UTF-8: {source}"),
        }
    }
}

impl std::error::Error for RoomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::BadText { source } => Some(source),
            _ => None,
        }
    }
}

/// The currently loaded level.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub bgm: ArrayString<BGM_LEN>,
    pub page: u8,
    pub map: TileMap,
    pub spawns: Vec<SpawnRecord>,
    pub quads: Vec<RenderQuad>,
}

impl Default for Room {
    fn default() -> Self {
        Room {
            bgm: ArrayString::new(),
            page: 0,
            map: TileMap::new(),
            spawns: Vec::new(),
            quads: Vec::new(),
        }
    }
}

impl Room {
    /// Decode a room file. A file holding nothing past the header is not a room.
    pub fn parse(bytes: &[u8]) -> Result<Room, RoomError> {
        if bytes.len() <= HEADER_SIZE {
            return Err(RoomError::TooShort {
                actual: bytes.len(),
                min: HEADER_SIZE + 1,
            });
        }

        let bgm =
            text_from_bytes(&bytes[..BGM_LEN]).map_err(|source| RoomError::BadText { source })?;
        let page = bytes[PAGE_OFFSET];
        let entity_count = read_u32_le(bytes, ENTITY_COUNT_OFFSET) as usize;
        let quad_count = read_u32_le(bytes, QUAD_COUNT_OFFSET) as usize;

        let expected = entity_count
            .checked_mul(RECORD_SIZE)
            .and_then(|n| n.checked_add(quad_count.checked_mul(QUAD_SIZE)?))
            .and_then(|n| n.checked_add(HEADER_SIZE))
            .unwrap_or(usize::MAX);
        if bytes.len() < expected {
            return Err(RoomError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let mut tiles = [0u16; MAP_LEN];
        for (i, tile) in tiles.iter_mut().enumerate() {
            *tile = read_u16_le(bytes, MAP_OFFSET + i * 2);
        }

        let records_end = HEADER_SIZE + entity_count * RECORD_SIZE;
        let spawns = bytes[HEADER_SIZE..records_end]
            .chunks_exact(RECORD_SIZE)
            .filter_map(|chunk| <&[u8; RECORD_SIZE]>::try_from(chunk).ok())
            .map(SpawnRecord::read)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RoomError::BadText { source })?;

        let quads = bytes[records_end..records_end + quad_count * QUAD_SIZE]
            .chunks_exact(QUAD_SIZE)
            .map(read_quad)
            .collect();

        Ok(Room {
            bgm,
            page,
            map: TileMap::from_tiles(tiles),
            spawns,
            quads,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let total = HEADER_SIZE + self.spawns.len() * RECORD_SIZE + self.quads.len() * QUAD_SIZE;
        let mut data = vec![0u8; total];

        write_text(&mut data[..BGM_LEN], &self.bgm);
        data[PAGE_OFFSET] = self.page;
        write_u32_le(&mut data, ENTITY_COUNT_OFFSET, self.spawns.len() as u32);
        write_u32_le(&mut data, QUAD_COUNT_OFFSET, self.quads.len() as u32);
        for (i, tile) in self.map.tiles().iter().enumerate() {
            write_u16_le(&mut data, MAP_OFFSET + i * 2, *tile);
        }

        let mut offset = HEADER_SIZE;
        for spawn in &self.spawns {
            let mut record = [0u8; RECORD_SIZE];
            spawn.write(&mut record);
            data[offset..offset + RECORD_SIZE].copy_from_slice(&record);
            offset += RECORD_SIZE;
        }
        for quad in &self.quads {
            write_quad(&mut data[offset..offset + QUAD_SIZE], quad);
            offset += QUAD_SIZE;
        }

        data
    }
}

fn read_quad(chunk: &[u8]) -> RenderQuad {
    let mut vertices = [Vertex::default(); 4];
    for (i, v) in vertices.iter_mut().enumerate() {
        let base = i * VERTEX_SIZE;
        *v = Vertex::new(
            f32::from_bits(read_u32_le(chunk, base)),
            f32::from_bits(read_u32_le(chunk, base + 4)),
            f32::from_bits(read_u32_le(chunk, base + 8)),
            read_u16_le(chunk, base + 12),
            read_u16_le(chunk, base + 14),
        );
    }
    RenderQuad::new(vertices)
}

fn write_quad(out: &mut [u8], quad: &RenderQuad) {
    for (i, v) in quad.vertices.iter().enumerate() {
        let base = i * VERTEX_SIZE;
        write_u32_le(out, base, v.x.to_bits());
        write_u32_le(out, base + 4, v.y.to_bits());
        write_u32_le(out, base + 8, v.z.to_bits());
        write_u16_le(out, base + 12, v.s);
        write_u16_le(out, base + 14, v.t);
    }
}
