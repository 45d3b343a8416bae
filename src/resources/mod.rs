//! Long-lived state shared by the systems.
//!
//! Almost everything lives inside [`simulation::Simulation`]; the other
//! submodules define the pieces it owns and the on-disk formats it reads and
//! writes.
//!
//! Overview
//! - `adpcm` – IMA ADPCM and PCM WAV decoding into stereo frames
//! - `audio` – sound ids, the channel mixer and the audio thread bridge
//! - `gameconfig` – INI-backed runtime configuration
//! - `gamestate` – high-level mode and the held spell
//! - `input` – button bit set and per-tick edge snapshot
//! - `pool` – fixed-capacity slot pool with a free stack
//! - `registry` – ordered entity list with safe mid-iteration removal
//! - `renderframe` – per-frame quad and image draw batch
//! - `room` – binary room format and collision map decoding
//! - `roomstore` – room lookup by name, from disk or memory
//! - `savegame` – fixed-size save record
//! - `simulation` – the world: registry, room, spell, audio and input
//! - `spawnrecord` – tagged spawn descriptions found in rooms
//! - `tilemap` – 32-pixel collision grid with per-tile masks
//! - `worldtime` – tick counter and fixed delta
pub mod adpcm;
pub mod audio;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod pool;
pub mod registry;
pub mod renderframe;
pub mod room;
pub mod roomstore;
pub mod savegame;
pub mod simulation;
pub mod spawnrecord;
pub mod tilemap;
pub mod worldtime;
