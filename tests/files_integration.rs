//! Rooms, saves and replays read from and written to real files.

use std::fs;
use std::path::Path;

use mikoo::components::entity::EntityKind;
use mikoo::components::mapposition::Vec4;
use mikoo::resources::audio::Mixer;
use mikoo::resources::gameconfig::GameConfig;
use mikoo::resources::gamestate::GameMode;
use mikoo::resources::input::Buttons;
use mikoo::resources::room::{HEADER_SIZE, Room, RoomError};
use mikoo::resources::roomstore::RoomStore;
use mikoo::resources::simulation::Simulation;
use mikoo::resources::spawnrecord::SpawnRecord;
use mikoo::resources::tilemap::{TileMap, TileMask, TileType, tile_code};
use mikoo::systems::gamestate::run_frame;
use mikoo::systems::input::InputReplay;
use mikoo::systems::save::load_save;

const START: &str = "data/room/intro0.rm";

fn write_room(dir: &Path, name: &str, room: &Room) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, room.to_bytes()).unwrap();
}

fn start_room() -> Room {
    let mut map = TileMap::new();
    map.set(2, 3, tile_code(TileType::Block, TileMask::Full, 0));
    Room {
        map,
        spawns: vec![
            SpawnRecord::new(EntityKind::SavePoint).with_vec4(0, Vec4::xy(96.0, 310.0)),
            SpawnRecord::new(EntityKind::Kid)
                .with_vec4(0, Vec4::xy(100.0, 320.0))
                .with_vec4(1, Vec4::ONE),
        ],
        ..Room::default()
    }
}

fn config_in(dir: &Path) -> GameConfig {
    let mut config = GameConfig::with_path(dir.join("config.ini"));
    config.data_dir = dir.to_path_buf();
    config.debug_keys = false;
    config
}

#[test]
fn test_room_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let room = start_room();
    write_room(dir.path(), START, &room);

    let store = RoomStore::new(dir.path());
    assert!(store.contains(START));
    assert_eq!(store.load(START).unwrap(), room);

    assert!(matches!(
        store.load("data/room/missing.rm"),
        Err(RoomError::Io { .. })
    ));

    let mut bytes = room.to_bytes();
    bytes.truncate(HEADER_SIZE + 10);
    fs::write(dir.path().join("data/room/cut.rm"), bytes).unwrap();
    assert!(matches!(
        store.load("data/room/cut.rm"),
        Err(RoomError::Truncated { .. })
    ));
}

#[test]
fn test_save_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    write_room(dir.path(), START, &start_room());
    let config = config_in(dir.path());

    let mut sim = Simulation::from_config(&config, Mixer::silent(), 1);
    sim.mode = GameMode::Play;
    load_save(&mut sim);
    assert_eq!(sim.room_name, START);

    // Fall until the kid overlaps the save point, then shoot it.
    for _ in 0..7 {
        run_frame(&mut sim);
    }
    let kid = sim.registry.first_of_kind(EntityKind::Kid).unwrap();
    let at_save = sim.registry.get(kid).unwrap().pos;
    sim.input.press(Buttons::SHOOT);
    run_frame(&mut sim);
    assert!(sim.save.is_some());
    assert!(config.save_path().is_file());

    let mut restarted = Simulation::from_config(&config, Mixer::silent(), 2);
    restarted.mode = GameMode::Play;
    load_save(&mut restarted);
    assert_eq!(restarted.room_name, START);

    let kids: Vec<_> = restarted
        .registry
        .iter()
        .filter(|(_, e)| e.kind() == EntityKind::Kid)
        .map(|(_, e)| e.pos)
        .collect();
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0].x, at_save.x);
    assert_eq!(kids[0].y, (at_save.y + 0.5).trunc());
}

#[test]
fn test_corrupt_save_starts_from_initial_room() {
    let dir = tempfile::tempdir().unwrap();
    write_room(dir.path(), START, &start_room());
    let config = config_in(dir.path());
    fs::write(config.save_path(), [0u8; 300]).unwrap();

    let mut sim = Simulation::from_config(&config, Mixer::silent(), 1);
    sim.mode = GameMode::Play;
    load_save(&mut sim);
    assert!(sim.save.is_none());
    assert_eq!(sim.room_name, START);
    assert_eq!(sim.registry.len(), 2);
}

#[test]
fn test_replay_file_starts_the_game() {
    let dir = tempfile::tempdir().unwrap();
    write_room(dir.path(), START, &start_room());
    let script = dir.path().join("run.json");
    fs::write(
        &script,
        r#"[
            {"tick": 2, "press": ["jump"]},
            {"tick": 3, "release": ["jump"]},
            {"tick": 5, "press": ["right"]}
        ]"#,
    )
    .unwrap();

    let config = config_in(dir.path());
    let mut sim = Simulation::from_config(&config, Mixer::silent(), 9);
    let mut replay = InputReplay::load(&script).unwrap();

    while !replay.is_finished() || sim.time.tick < 10 {
        replay.apply(sim.time.tick, &mut sim.input);
        run_frame(&mut sim);
    }

    assert_eq!(sim.mode, GameMode::Play);
    assert_eq!(sim.room_name, START);
    let kid = sim.registry.first_of_kind(EntityKind::Kid).unwrap();
    let e = sim.registry.get(kid).unwrap();
    assert_eq!(e.scale.x, 1.0);
    assert!(e.pos.x > 100.0);
}
