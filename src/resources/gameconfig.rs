//! Game configuration.
//!
//! Settings loaded from an INI file. Every value has a safe default, so a
//! missing file or key simply keeps the default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [game]
//! target_fps = 50
//! initial_room = data/room/intro0.rm
//! debug_keys = false
//!
//! [paths]
//! data_dir = .
//! save_file = save.dat
//!
//! [audio]
//! enabled = true
//! volume = 1.0
//!
//! [save]
//! write_on_trigger = true
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
pub const DEFAULT_TARGET_FPS: u32 = 50;
pub const DEFAULT_INITIAL_ROOM: &str = "data/room/intro0.rm";
const DEFAULT_DEBUG_KEYS: bool = cfg!(debug_assertions);
const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_SAVE_FILE: &str = "save.dat";
const DEFAULT_AUDIO_ENABLED: bool = true;
const DEFAULT_VOLUME: f32 = 1.0;
const DEFAULT_WRITE_ON_TRIGGER: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub target_fps: u32,
    /// Room loaded when no valid save exists.
    pub initial_room: String,
    /// Enables god mode, infinite jump, spell cycling and quick save.
    pub debug_keys: bool,
    /// Directory room, sound and music names are resolved against.
    pub data_dir: PathBuf,
    /// Save file, relative to the working directory unless absolute.
    pub save_file: PathBuf,
    pub audio_enabled: bool,
    /// Master volume, 0.0 to 1.0.
    pub volume: f32,
    /// Flush the save file every time the game saves, not only on exit.
    pub write_on_trigger: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            initial_room: DEFAULT_INITIAL_ROOM.to_string(),
            debug_keys: DEFAULT_DEBUG_KEYS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            save_file: PathBuf::from(DEFAULT_SAVE_FILE),
            audio_enabled: DEFAULT_AUDIO_ENABLED,
            volume: DEFAULT_VOLUME,
            write_on_trigger: DEFAULT_WRITE_ON_TRIGGER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [game] section
        if let Some(fps) = config.getuint("game", "target_fps").ok().flatten() {
            self.target_fps = (fps as u32).max(1);
        }
        if let Some(room) = config.get("game", "initial_room") {
            self.initial_room = room;
        }
        if let Some(debug) = config.getbool("game", "debug_keys").ok().flatten() {
            self.debug_keys = debug;
        }

        // [paths] section
        if let Some(dir) = config.get("paths", "data_dir") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(save) = config.get("paths", "save_file") {
            self.save_file = PathBuf::from(save);
        }

        // [audio] section
        if let Some(enabled) = config.getbool("audio", "enabled").ok().flatten() {
            self.audio_enabled = enabled;
        }
        if let Some(volume) = config.getfloat("audio", "volume").ok().flatten() {
            self.volume = (volume as f32).clamp(0.0, 1.0);
        }

        // [save] section
        if let Some(flush) = config.getbool("save", "write_on_trigger").ok().flatten() {
            self.write_on_trigger = flush;
        }

        info!(
            "Loaded config: fps={}, initial_room={}, debug_keys={}, data_dir={:?}, save={:?}, audio={} vol={}",
            self.target_fps,
            self.initial_room,
            self.debug_keys,
            self.data_dir,
            self.save_file,
            self.audio_enabled,
            self.volume
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [game] section
        config.set("game", "target_fps", Some(self.target_fps.to_string()));
        config.set("game", "initial_room", Some(self.initial_room.clone()));
        config.set("game", "debug_keys", Some(self.debug_keys.to_string()));

        // [paths] section
        config.set(
            "paths",
            "data_dir",
            Some(self.data_dir.to_string_lossy().into_owned()),
        );
        config.set(
            "paths",
            "save_file",
            Some(self.save_file.to_string_lossy().into_owned()),
        );

        // [audio] section
        config.set("audio", "enabled", Some(self.audio_enabled.to_string()));
        config.set("audio", "volume", Some(self.volume.to_string()));

        // [save] section
        config.set(
            "save",
            "write_on_trigger",
            Some(self.write_on_trigger.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Duration of one simulation tick.
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / self.target_fps.max(1) as u64)
    }

    /// Save file location, resolved against the data directory when relative.
    pub fn save_path(&self) -> PathBuf {
        if self.save_file.is_absolute() {
            self.save_file.clone()
        } else {
            self.data_dir.join(&self.save_file)
        }
    }
}
