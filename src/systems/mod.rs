//! Game systems.
//!
//! Each behavior is a free function over the
//! [`Simulation`](crate::resources::simulation::Simulation). The frame driver
//! dispatches on entity kind; the game routine wraps the driver with mode
//! handling and drawing.
//!
//! Submodules overview
//! - [`audio`] – audio thread loop, sinks and message polling
//! - [`boss`] – dragon, its defeat sequence and flying parts
//! - [`frame`] – one pass over the entity list per tick
//! - [`gamestate`] – title and play routines run once per frame
//! - [`input`] – JSON input replay
//! - [`kid`] – the player character
//! - [`particleemitter`] – blood bursts
//! - [`projectile`] – bullets and spell bullets
//! - [`props`] – warps, banners, intro cards, spell pickups and thunder
//! - [`render`] – entity, room and HUD draw commands
//! - [`room`] – room loading and clear colors
//! - [`save`] – writing, flushing and loading the save record
//! - [`savepoint`] – shootable save points
//! - [`spawn`] – entity creation and destruction by kind
//! - [`time`] – world clock advance

pub mod audio;
pub mod boss;
pub mod frame;
pub mod gamestate;
pub mod input;
pub mod kid;
pub mod particleemitter;
pub mod projectile;
pub mod props;
pub mod render;
pub mod room;
pub mod save;
pub mod savepoint;
pub mod spawn;
pub mod time;
