//! Messages exchanged between the simulation and its surroundings.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`input`] – scripted button events read from a replay file
pub mod audio;
pub mod input;
