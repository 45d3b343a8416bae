//! Entity spawn records.
//!
//! A [`SpawnRecord`] is the fixed 128-byte initialization payload shared by
//! room files and the save file: sixteen 32-bit fields, a 63-byte string and
//! a one-byte kind tag. How the fields are read is up to each kind: the kid
//! reads field group 0 as its position and group 1 as its scale, a spell
//! pickup reads field 4 as its spell, a warp reads the string as its
//! destination.
//!
//! On disk every field is little-endian; [`SpawnRecord::read`] and
//! [`SpawnRecord::write`] handle the fields one by one in that fixed order.

use std::str::Utf8Error;

use arrayvec::ArrayString;

use crate::components::entity::EntityKind;
use crate::components::mapposition::Vec4;

pub const FIELD_COUNT: usize = 16;
/// String capacity in bytes, excluding the terminator slot taken by the kind tag.
pub const TEXT_LEN: usize = 63;
pub const RECORD_SIZE: usize = FIELD_COUNT * 4 + TEXT_LEN + 1;

pub type RecordText = ArrayString<TEXT_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRecord {
    pub fields: [u32; FIELD_COUNT],
    pub text: RecordText,
    pub kind_tag: u8,
}

impl SpawnRecord {
    pub fn new(kind: EntityKind) -> Self {
        SpawnRecord {
            fields: [0; FIELD_COUNT],
            text: RecordText::new(),
            kind_tag: kind.tag(),
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::from_tag(self.kind_tag)
    }

    pub fn u32_at(&self, field: usize) -> u32 {
        self.fields[field]
    }

    pub fn f32_at(&self, field: usize) -> f32 {
        f32::from_bits(self.fields[field])
    }

    /// Four consecutive fields starting at `group * 4`.
    pub fn vec4_at(&self, group: usize) -> Vec4 {
        let base = group * 4;
        Vec4::new(
            self.f32_at(base),
            self.f32_at(base + 1),
            self.f32_at(base + 2),
            self.f32_at(base + 3),
        )
    }

    pub fn set_u32(&mut self, field: usize, value: u32) {
        self.fields[field] = value;
    }

    pub fn set_f32(&mut self, field: usize, value: f32) {
        self.fields[field] = value.to_bits();
    }

    pub fn set_vec4(&mut self, group: usize, v: Vec4) {
        let base = group * 4;
        for (i, lane) in v.to_array().into_iter().enumerate() {
            self.set_f32(base + i, lane);
        }
    }

    /// Replace the string field, truncating at a character boundary if needed.
    pub fn set_text(&mut self, text: &str) {
        self.text = text_from_str(text);
    }

    pub fn with_vec4(mut self, group: usize, v: Vec4) -> Self {
        self.set_vec4(group, v);
        self
    }

    pub fn with_f32(mut self, field: usize, value: f32) -> Self {
        self.set_f32(field, value);
        self
    }

    pub fn with_u32(mut self, field: usize, value: u32) -> Self {
        self.set_u32(field, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Decode from exactly [`RECORD_SIZE`] bytes. Fails if the string is not UTF-8.
    pub fn read(bytes: &[u8; RECORD_SIZE]) -> Result<Self, Utf8Error> {
        let mut fields = [0u32; FIELD_COUNT];
        for (i, field) in fields.iter_mut().enumerate() {
            *field = read_u32_le(bytes, i * 4);
        }
        let text_start = FIELD_COUNT * 4;
        Ok(SpawnRecord {
            fields,
            text: text_from_bytes(&bytes[text_start..text_start + TEXT_LEN])?,
            kind_tag: bytes[RECORD_SIZE - 1],
        })
    }

    /// Encode into exactly [`RECORD_SIZE`] bytes. The string is NUL-padded.
    pub fn write(&self, out: &mut [u8; RECORD_SIZE]) {
        for (i, field) in self.fields.iter().enumerate() {
            write_u32_le(out, i * 4, *field);
        }
        let text_start = FIELD_COUNT * 4;
        write_text(&mut out[text_start..text_start + TEXT_LEN], &self.text);
        out[RECORD_SIZE - 1] = self.kind_tag;
    }
}

#[inline]
pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
pub(crate) fn write_u32_le(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub(crate) fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub(crate) fn write_u16_le(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// NUL-terminated field to string, overflow truncated. Bytes up to the NUL
/// must be UTF-8.
pub(crate) fn text_from_bytes<const N: usize>(raw: &[u8]) -> Result<ArrayString<N>, Utf8Error> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    std::str::from_utf8(&raw[..end]).map(text_from_str)
}

pub(crate) fn text_from_str<const N: usize>(text: &str) -> ArrayString<N> {
    let mut out = ArrayString::new();
    for c in text.chars() {
        if out.try_push(c).is_err() {
            break;
        }
    }
    out
}

/// Copy `text` into a fixed field and zero the remainder.
pub(crate) fn write_text(field: &mut [u8], text: &str) {
    field.fill(0);
    let n = text.len().min(field.len());
    field[..n].copy_from_slice(&text.as_bytes()[..n]);
}
