//! Mikoo runtime library.
//!
//! This crate exposes the platformer's components, resources, systems, and
//! events for use by the headless binary and in integration tests.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
