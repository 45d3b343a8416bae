//! Components carried by entities.
//!
//! Every entity shares a small header (position, scale, hitbox, sprite) and
//! a per-kind payload. The types in this module are the building blocks of
//! both.
//!
//! Submodules overview:
//! - [`boxcollider`] – integer axis-aligned hitbox and overlap tests
//! - [`entity`] – the entity header, the closed set of kinds and their state
//! - [`mapposition`] – four-lane world vectors and pixel/NDC conversion
//! - [`particleemitter`] – blood particle buffer owned by an emitter entity
//! - [`sprite`] – image ids and frame-range animation
//! - [`timer`] – signed cooldown counters
//! - [`ttl`] – tick-based lifetime for projectiles and flashes

pub mod boxcollider;
pub mod entity;
pub mod mapposition;
pub mod particleemitter;
pub mod sprite;
pub mod timer;
pub mod ttl;
