//! Microsoft ADPCM WAV decoding.
//!
//! Every sound and music file the game ships is a stereo 48 kHz MS-ADPCM WAV
//! with 1024-byte blocks. Only that exact layout is accepted: the header is a
//! fixed 90 bytes (`RIFF`, a 50-byte `fmt ` chunk, `fact`, then `data`).
//!
//! Each block starts with per-channel predictor indices, deltas and two seed
//! samples, followed by 1010 bytes of packed nibbles (high nibble left, low
//! nibble right), which yields 1012 frames per block.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::resources::spawnrecord::{read_u16_le, read_u32_le};

pub const SAMPLE_RATE: u32 = 48_000;
pub const ADPCM_BLOCK_SIZE: usize = 1024;
const BLOCK_HEADER_SIZE: usize = 14;
pub const ADPCM_BLOCK_FRAMES: usize = ADPCM_BLOCK_SIZE - BLOCK_HEADER_SIZE + 2;
pub const WAV_HEADER_SIZE: usize = 90;

const ADAPT_TABLE: [u16; 16] = [
    230, 230, 230, 230, 307, 409, 512, 614, 768, 614, 512, 409, 307, 230, 230, 230,
];

const COEFF_TABLE: [[i32; 2]; 7] = [
    [256, 0],
    [512, -256],
    [0, 0],
    [192, 64],
    [240, 0],
    [460, -208],
    [392, -232],
];

/// One interleaved stereo sample pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StereoFrame {
    pub left: i16,
    pub right: i16,
}

impl StereoFrame {
    pub const SILENCE: StereoFrame = StereoFrame { left: 0, right: 0 };

    pub const fn new(left: i16, right: i16) -> Self {
        StereoFrame { left, right }
    }

    /// Saturating sum of two frames.
    pub fn mix(self, other: StereoFrame) -> StereoFrame {
        StereoFrame {
            left: self.left.saturating_add(other.left),
            right: self.right.saturating_add(other.right),
        }
    }

    pub fn scaled(self, volume: f32) -> StereoFrame {
        StereoFrame {
            left: (self.left as f32 * volume) as i16,
            right: (self.right as f32 * volume) as i16,
        }
    }
}

#[derive(Debug)]
pub enum WavError {
    Io { path: PathBuf, source: io::Error },
    TooShort { actual: usize },
    /// A header field does not match the only supported layout.
    Unsupported { field: &'static str, found: u32 },
    BadPredictor { index: u8 },
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "couldn't open {}: {source}", path.display()),
            Self::TooShort { actual } => write!(
                f,
                "wav too short: got {actual} bytes, need at least {WAV_HEADER_SIZE}"
            ),
            Self::Unsupported { field, found } => {
                write!(f, "unsupported ADPCM wav: {field} = {found:#x}")
            }
            Self::BadPredictor { index } => write!(f, "invalid ADPCM predictor index {index}"),
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

const fn magic(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// `(offset, size, field name, expected value)` of every checked header field.
const HEADER_CHECKS: [(usize, usize, &str, u32); 15] = [
    (0, 4, "riff", magic(b"RIFF")),
    (8, 4, "wave", magic(b"WAVE")),
    (12, 4, "fmt", magic(b"fmt ")),
    (16, 4, "fmt size", 50),
    (20, 2, "format", 2),
    (22, 2, "channels", 2),
    (24, 4, "sample rate", SAMPLE_RATE),
    (32, 2, "block align", ADPCM_BLOCK_SIZE as u32),
    (34, 2, "bits per sample", 4),
    (36, 2, "extra size", 32),
    (38, 2, "samples per block", ADPCM_BLOCK_FRAMES as u32),
    (40, 2, "coefficient count", 7),
    (70, 4, "fact", magic(b"fact")),
    (74, 4, "fact size", 4),
    (82, 4, "data", magic(b"data")),
];

const NUM_SAMPLES_OFFSET: usize = 78;

fn header_field(bytes: &[u8], offset: usize, size: usize) -> u32 {
    if size == 2 {
        read_u16_le(bytes, offset) as u32
    } else {
        read_u32_le(bytes, offset)
    }
}

/// Decode a complete ADPCM WAV image into stereo frames.
///
/// Missing trailing blocks end the clip early.
pub fn decode_wav(bytes: &[u8]) -> Result<Vec<StereoFrame>, WavError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(WavError::TooShort {
            actual: bytes.len(),
        });
    }

    for (offset, size, field, expected) in HEADER_CHECKS {
        let found = header_field(bytes, offset, size);
        if found != expected {
            return Err(WavError::Unsupported { field, found });
        }
    }

    let num_samples = read_u32_le(bytes, NUM_SAMPLES_OFFSET) as usize;
    let mut frames = Vec::with_capacity(num_samples.min(bytes.len() * 2));
    for block in bytes[WAV_HEADER_SIZE..].chunks_exact(ADPCM_BLOCK_SIZE) {
        if frames.len() >= num_samples {
            break;
        }
        decode_block(block, &mut frames)?;
    }
    frames.truncate(num_samples);
    Ok(frames)
}

pub fn read_wav(path: &Path) -> Result<Vec<StereoFrame>, WavError> {
    let bytes = std::fs::read(path).map_err(|source| WavError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_wav(&bytes)
}

/// Per-channel decoder state carried through one block.
struct ChannelState {
    predictor: [i32; 2],
    delta: u16,
    sample1: i32,
    sample2: i32,
}

impl ChannelState {
    fn decode(&mut self, nibble: i8) -> i16 {
        let predicted = ((self.predictor[0] * self.sample1 + self.predictor[1] * self.sample2)
            >> 8)
            + nibble as i32 * self.delta as i32;
        let sample = predicted.clamp(i16::MIN as i32, i16::MAX as i32);

        self.sample2 = self.sample1;
        self.sample1 = sample;

        let adapt = ADAPT_TABLE[(nibble as u8 & 0x0f) as usize] as u32;
        self.delta = ((adapt * self.delta as u32) >> 8) as u16;
        if self.delta < 16 {
            self.delta = 16;
        }

        sample as i16
    }
}

fn decode_block(block: &[u8], out: &mut Vec<StereoFrame>) -> Result<(), WavError> {
    let coeff = |index: u8| {
        COEFF_TABLE
            .get(index as usize)
            .copied()
            .ok_or(WavError::BadPredictor { index })
    };
    let sample = |offset: usize| read_u16_le(block, offset) as i16 as i32;

    let mut left = ChannelState {
        predictor: coeff(block[0])?,
        delta: read_u16_le(block, 2),
        sample1: sample(6),
        sample2: sample(10),
    };
    let mut right = ChannelState {
        predictor: coeff(block[1])?,
        delta: read_u16_le(block, 4),
        sample1: sample(8),
        sample2: sample(12),
    };

    out.push(StereoFrame::new(left.sample2 as i16, right.sample2 as i16));
    out.push(StereoFrame::new(left.sample1 as i16, right.sample1 as i16));

    for &byte in &block[BLOCK_HEADER_SIZE..] {
        let high = ((byte & 0xf0) as i8) >> 4;
        let low = (((byte & 0x0f) << 4) as i8) >> 4;
        let l = left.decode(high);
        let r = right.decode(low);
        out.push(StereoFrame::new(l, r));
    }

    Ok(())
}
