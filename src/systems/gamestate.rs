//! Per-frame game routine.
//!
//! [`run_frame`] is what the shell calls once per tick after feeding button
//! edges into [`Simulation::input`](crate::resources::simulation::Simulation::input).
//! It folds the edges into the held set, runs the routine of the current
//! [`GameMode`], and advances the clock.

use log::info;

use crate::resources::gamestate::GameMode;
use crate::resources::input::Buttons;
use crate::resources::simulation::Simulation;
use crate::systems::frame::run_entity_pass;
use crate::systems::render::{draw_entities, draw_hud, draw_room, draw_title};
use crate::systems::room::{QUICK_RESET_ROOM, load_room};
use crate::systems::save::load_save;
use crate::systems::time::update_world_time;

pub const TITLE_BGM: &str = "data/bgm/title.wav";

pub fn run_frame(sim: &mut Simulation) {
    sim.input.update_down();
    update_game(sim);
    update_world_time(sim);
}

pub fn update_game(sim: &mut Simulation) {
    match sim.mode {
        GameMode::Title => update_title(sim),
        GameMode::Play => update_play(sim),
    }
}

/// Title screen: jump starts the game from the last save.
pub fn update_title(sim: &mut Simulation) {
    draw_title(sim);
    sim.audio.play_bgm(TITLE_BGM);

    if sim.input.is_pressed(Buttons::JUMP) {
        info!("starting game");
        sim.mode = GameMode::Play;
        load_save(sim);
    }

    sim.input.clear_edges();
}

pub fn update_play(sim: &mut Simulation) {
    let chord = Buttons::UP | Buttons::DOWN | Buttons::NEW_GAME;
    if sim.input.down.contains(chord) {
        load_room(sim, QUICK_RESET_ROOM);
        sim.input.pressed.remove(Buttons::NEW_GAME);
    }

    tick_game(sim);

    draw_entities(sim);
    draw_room(sim);
    draw_hud(sim);
}

/// Restart handling, the entity pass, and the return to the title screen.
pub fn tick_game(sim: &mut Simulation) {
    if sim.input.is_pressed(Buttons::RESTART) {
        load_save(sim);
    }

    run_entity_pass(sim);

    if sim.input.is_pressed(Buttons::NEW_GAME) {
        info!("back to title");
        sim.mode = GameMode::Title;
    }

    sim.input.clear_edges();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::audio::Mixer;
    use crate::resources::room::Room;
    use crate::resources::roomstore::RoomStore;
    use crate::resources::simulation::INITIAL_ROOM;

    fn sim() -> Simulation {
        let mut rooms = RoomStore::new("/nonexistent");
        rooms.insert(INITIAL_ROOM, &Room::default());
        rooms.insert(QUICK_RESET_ROOM, &Room::default());
        Simulation::new(rooms, Mixer::silent(), 0)
    }

    #[test]
    fn test_jump_on_title_enters_play() {
        let mut sim = sim();
        run_frame(&mut sim);
        assert_eq!(sim.mode, GameMode::Title);
        assert_eq!(sim.frame.quads.len(), 1);

        sim.input.press(Buttons::JUMP);
        run_frame(&mut sim);
        assert_eq!(sim.mode, GameMode::Play);
        assert_eq!(sim.room_name, INITIAL_ROOM);
        assert!(sim.input.pressed.is_empty());
        assert_eq!(sim.time.tick, 2);
    }

    #[test]
    fn test_new_game_returns_to_title() {
        let mut sim = sim();
        sim.mode = GameMode::Play;
        load_save(&mut sim);
        sim.input.press(Buttons::NEW_GAME);
        run_frame(&mut sim);
        assert_eq!(sim.mode, GameMode::Title);
    }

    #[test]
    fn test_quick_reset_chord_stays_in_play() {
        let mut sim = sim();
        sim.mode = GameMode::Play;
        load_save(&mut sim);
        sim.input.press(Buttons::UP | Buttons::DOWN | Buttons::NEW_GAME);
        run_frame(&mut sim);
        assert_eq!(sim.room_name, QUICK_RESET_ROOM);
        assert_eq!(sim.mode, GameMode::Play);
    }
}
