//! Mikoo headless runner.
//!
//! Drives the simulation at the configured tick rate without a window. Input
//! comes from an optional JSON replay script; draw batches are produced and
//! dropped each frame; sound is mixed on a background thread into a null
//! sink.
//!
//! # Main Loop
//!
//! 1. Load `config.ini`, apply command-line overrides
//! 2. Load the sound bank and start the audio thread
//! 3. Each tick: feed replay events, run the frame, drain the draw batch and
//!    audio messages, sleep until the next tick
//! 4. Flush the save and stop the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 500 --replay run.json
//! ```

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::{debug, error, info, warn};

use mikoo::resources::audio::{Mixer, SoundBank, setup_audio, shutdown_audio};
use mikoo::resources::gameconfig::GameConfig;
use mikoo::resources::gamestate::GameMode;
use mikoo::resources::simulation::Simulation;
use mikoo::systems::audio::{NullSink, poll_audio_messages};
use mikoo::systems::gamestate::run_frame;
use mikoo::systems::input::InputReplay;
use mikoo::systems::save::{flush_save, load_save};

/// Mikoo platformer runtime
#[derive(Parser)]
#[command(version, about = "Headless runner for the Mikoo platformer core.")]
struct Cli {
    /// Configuration file (default: config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding `data/room`, `data/sound` and `data/bgm`.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Number of ticks to run. Without it the run ends with the replay.
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// JSON input script.
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Random seed (default: taken from the clock).
    #[arg(long)]
    seed: Option<u64>,

    /// Skip loading sounds and starting the audio thread.
    #[arg(long)]
    no_audio: bool,

    /// Skip the title screen.
    #[arg(long)]
    start_in_play: bool,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using defaults");
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.no_audio {
        config.audio_enabled = false;
    }

    let mut replay = match &cli.replay {
        Some(path) => match InputReplay::load(path) {
            Ok(replay) => Some(replay),
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        None => None,
    };
    if cli.ticks.is_none() && replay.is_none() {
        error!("nothing to run: pass --ticks or --replay");
        std::process::exit(2);
    }

    let (mixer, bridge) = if config.audio_enabled {
        let bank = match SoundBank::load(&config.data_dir) {
            Ok(bank) => bank,
            Err(e) => {
                error!("cannot load sounds: {e}");
                std::process::exit(1);
            }
        };
        let mixer = Mixer::new(bank, config.data_dir.clone());
        mixer.set_volume(config.volume);
        let bridge = setup_audio(mixer.clone(), Box::new(NullSink::default()));
        (mixer, Some(bridge))
    } else {
        (Mixer::silent(), None)
    };

    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!("seed {seed}");
    let mut sim = Simulation::from_config(&config, mixer, seed);
    if cli.start_in_play {
        sim.mode = GameMode::Play;
        load_save(&mut sim);
    }

    let tick_duration = config.tick_duration();
    let mut next_tick = Instant::now();

    loop {
        if let Some(limit) = cli.ticks {
            if sim.time.tick >= limit {
                break;
            }
        } else if replay.as_ref().is_some_and(|r| r.is_finished()) {
            break;
        }

        if let Some(replay) = replay.as_mut() {
            replay.apply(sim.time.tick, &mut sim.input);
        }

        run_frame(&mut sim);
        let frame = sim.frame.take();
        debug!(
            "tick {}: {} quads, {} images",
            sim.time.tick,
            frame.quads.len(),
            frame.images.len()
        );

        if let Some(bridge) = &bridge {
            for msg in poll_audio_messages(bridge) {
                debug!("audio: {msg:?}");
            }
        }

        next_tick += tick_duration;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            next_tick = now;
        }
    }

    info!("stopped after {} ticks in room {}", sim.time.tick, sim.room_name);

    if let Err(e) = flush_save(&sim) {
        warn!("could not write save: {e}");
    }
    if let Some(bridge) = bridge {
        shutdown_audio(bridge);
    }
}
