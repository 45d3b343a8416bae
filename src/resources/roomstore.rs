//! Room lookup.
//!
//! Room names are paths relative to the data directory
//! (`data/room/intro0.rm`). The store reads them from disk on demand; rooms
//! registered with [`RoomStore::insert`] are served from memory instead,
//! which is how tools and tests provide levels without touching the file
//! system. In-memory rooms are kept already decoded and never go through the
//! file checks.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::resources::room::{Room, RoomError};

#[derive(Debug, Default)]
pub struct RoomStore {
    /// Directory room names are resolved against.
    pub data_dir: PathBuf,
    embedded: FxHashMap<String, Room>,
}

impl RoomStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        RoomStore {
            data_dir: data_dir.into(),
            embedded: FxHashMap::default(),
        }
    }

    /// Serve `name` from memory.
    pub fn insert(&mut self, name: impl Into<String>, room: &Room) {
        self.embedded.insert(name.into(), room.clone());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.embedded.contains_key(name) || self.path_of(name).is_file()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.data_dir.join(Path::new(name))
    }

    pub fn load(&self, name: &str) -> Result<Room, RoomError> {
        if let Some(room) = self.embedded.get(name) {
            return Ok(room.clone());
        }
        let path = self.path_of(name);
        let bytes = std::fs::read(&path).map_err(|source| RoomError::Io { path, source })?;
        Room::parse(&bytes)
    }
}
