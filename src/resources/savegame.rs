//! Save file.
//!
//! ```text
//! offset  size  field
//!      0   128  kid spawn record
//!    128    44  room name, NUL-padded
//!    172     4  magic 05 50 43 8e
//! ```
//!
//! A file whose magic does not match is treated as no save at all.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

use arrayvec::ArrayString;

use crate::resources::spawnrecord::{RECORD_SIZE, SpawnRecord, text_from_bytes, write_text};

pub const SAVE_MAGIC: [u8; 4] = [0x05, 0x50, 0x43, 0x8e];
/// Room name field size, terminator included.
pub const SAVE_ROOM_FIELD: usize = 44;
pub const SAVE_SIZE: usize = RECORD_SIZE + SAVE_ROOM_FIELD + SAVE_MAGIC.len();

pub type SaveRoomName = ArrayString<{ SAVE_ROOM_FIELD - 1 }>;

#[derive(Debug)]
pub enum SaveError {
    Io { path: PathBuf, source: io::Error },
    TooShort { actual: usize },
    BadMagic { found: [u8; 4] },
    RoomNameTooLong { name: String },
    BadText { source: Utf8Error },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "save file {}: {source}", path.display()),
            Self::TooShort { actual } => {
                write!(f, "save too short: got {actual} bytes, need {SAVE_SIZE}")
            }
            Self::BadMagic { found } => write!(f, "invalid save magic: {found:02x?}"),
            Self::RoomNameTooLong { name } => write!(
                f,
                "room name '{name}' does not fit the {} byte save field",
                SAVE_ROOM_FIELD - 1
            ),
            Self::BadText { source } => write!(f, "save text field is not UTF-8: {source}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::BadText { source } => Some(source),
            _ => None,
        }
    }
}

/// A valid save: where the kid stood and in which room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveGame {
    pub kid: SpawnRecord,
    pub room_name: SaveRoomName,
}

impl SaveGame {
    pub fn new(kid: SpawnRecord, room_name: &str) -> Result<SaveGame, SaveError> {
        let room_name =
            SaveRoomName::from(room_name).map_err(|_| SaveError::RoomNameTooLong {
                name: room_name.to_string(),
            })?;
        Ok(SaveGame { kid, room_name })
    }

    pub fn parse(bytes: &[u8]) -> Result<SaveGame, SaveError> {
        if bytes.len() < SAVE_SIZE {
            return Err(SaveError::TooShort {
                actual: bytes.len(),
            });
        }

        let magic_at = RECORD_SIZE + SAVE_ROOM_FIELD;
        let mut found = [0u8; 4];
        found.copy_from_slice(&bytes[magic_at..magic_at + 4]);
        if found != SAVE_MAGIC {
            return Err(SaveError::BadMagic { found });
        }

        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(&bytes[..RECORD_SIZE]);
        let bad_text = |source| SaveError::BadText { source };
        Ok(SaveGame {
            kid: SpawnRecord::read(&record).map_err(bad_text)?,
            room_name: text_from_bytes(&bytes[RECORD_SIZE..magic_at]).map_err(bad_text)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; SAVE_SIZE] {
        let mut out = [0u8; SAVE_SIZE];
        let mut record = [0u8; RECORD_SIZE];
        self.kid.write(&mut record);
        out[..RECORD_SIZE].copy_from_slice(&record);
        let magic_at = RECORD_SIZE + SAVE_ROOM_FIELD;
        write_text(&mut out[RECORD_SIZE..magic_at], &self.room_name);
        out[magic_at..].copy_from_slice(&SAVE_MAGIC);
        out
    }

    pub fn read_file(path: &Path) -> Result<SaveGame, SaveError> {
        let bytes = std::fs::read(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        SaveGame::parse(&bytes)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), SaveError> {
        std::fs::write(path, self.to_bytes()).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use crate::components::mapposition::Vec4;

    #[test]
    fn test_layout_and_magic() {
        let kid = SpawnRecord::new(EntityKind::Kid).with_vec4(0, Vec4::xy(40.0, 73.0));
        let save = SaveGame::new(kid, "data/room/21.rm").unwrap();
        let bytes = save.to_bytes();
        assert_eq!(bytes.len(), 176);
        assert_eq!(&bytes[172..], &SAVE_MAGIC);
        assert_eq!(&bytes[128..143], b"data/room/21.rm");
        assert_eq!(SaveGame::parse(&bytes).unwrap(), save);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let save = SaveGame::new(SpawnRecord::new(EntityKind::Kid), "r").unwrap();
        let mut bytes = save.to_bytes();
        bytes[175] = 0;
        assert!(matches!(
            SaveGame::parse(&bytes),
            Err(SaveError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_room_name_must_fit() {
        let name = "data/room/".to_string() + &"x".repeat(40);
        assert!(matches!(
            SaveGame::new(SpawnRecord::new(EntityKind::Kid), &name),
            Err(SaveError::RoomNameTooLong { .. })
        ));
    }

    #[test]
    fn test_latin1_room_name_is_rejected() {
        let save = SaveGame::new(SpawnRecord::new(EntityKind::Kid), "data/room/21.rm").unwrap();
        let mut bytes = save.to_bytes();
        bytes[RECORD_SIZE + 10] = 0xe9;
        assert!(matches!(
            SaveGame::parse(&bytes),
            Err(SaveError::BadText { .. })
        ));
    }
}
