//! Draw-command emission.
//!
//! After the entity pass the play routine fills the frame's
//! [`RenderFrame`](crate::resources::renderframe::RenderFrame) with, in order:
//! every entity that shows an image, the room's decorative quads, and the
//! HUD (held spell, plus the spell caption in the tutorial room). The title
//! screen is a single full-screen quad.

use crate::resources::gamestate::Spell;
use crate::resources::renderframe::RenderQuad;
use crate::resources::simulation::Simulation;
use crate::resources::tilemap::{GAME_HEIGHT, GAME_WIDTH};
use crate::systems::room::TUTORIAL_ROOM;

const W: f32 = GAME_WIDTH as f32;
const H: f32 = GAME_HEIGHT as f32;
const HUD_DEPTH: f32 = -0.99;

pub const TITLE_QUAD: RenderQuad =
    RenderQuad::rect((-1.0, 1.0), (1.0, -1.0), 0.0, (260, 0), (1060, 608));

pub const SPELL_TUTORIAL_QUAD: RenderQuad = RenderQuad::rect(
    (-1.0 + 64.0 / W, 1.0 - 175.0 / H),
    (-1.0 + (64.0 + 94.0 * 4.0) / W, 1.0 - (175.0 + 14.0 * 4.0) / H),
    HUD_DEPTH,
    (730, 1489),
    (730 + 94, 1489 + 14),
);

const SPELL_ICON_T: u16 = 168;
const SPELL_ICON_SIZE: u16 = 24;

/// HUD icon for the held spell.
pub fn spell_quad(spell: Spell) -> Option<RenderQuad> {
    let s = match spell {
        Spell::None => return None,
        Spell::Jump => 134,
        Spell::Shoot => 160,
        Spell::Speed => 186,
        Spell::Final => 212,
    };
    Some(RenderQuad::rect(
        (-1.0 + 64.0 / W, 1.0 - 64.0 / H),
        (-1.0 + 160.0 / W, 1.0 - 160.0 / H),
        HUD_DEPTH,
        (s, SPELL_ICON_T),
        (s + SPELL_ICON_SIZE, SPELL_ICON_T + SPELL_ICON_SIZE),
    ))
}

/// Queue an image draw for every entity whose sprite shows something.
pub fn draw_entities(sim: &mut Simulation) {
    let Simulation {
        registry, frame, ..
    } = sim;
    for (_, e) in registry.iter() {
        if e.sprite.image.is_drawable() {
            frame.draw_image(e.pos.to_ndc(), e.scale, e.sprite.image);
        }
    }
}

pub fn draw_room(sim: &mut Simulation) {
    if let Some(room) = &sim.room {
        sim.frame.submit_quads(&room.quads);
    }
}

pub fn draw_hud(sim: &mut Simulation) {
    let Some(quad) = spell_quad(sim.spell) else {
        return;
    };
    sim.frame.submit_quads(&[quad]);
    if sim.room_name == TUTORIAL_ROOM {
        sim.frame.submit_quads(&[SPELL_TUTORIAL_QUAD]);
    }
}

pub fn draw_title(sim: &mut Simulation) {
    sim.frame.submit_quads(&[TITLE_QUAD]);
}
