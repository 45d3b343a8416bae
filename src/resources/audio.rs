//! Sound triggers and the bridge to the background audio thread.
//!
//! The simulation talks to audio only through a [`Mixer`]: fire-and-forget
//! [`Mixer::play_sound`], [`Mixer::stop_sound`] and [`Mixer::play_bgm`].
//! Every call takes the mixer lock for a short, non-blocking mutation; the
//! audio thread takes the same lock to mix one buffer at a time.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and get an [`AudioBridge`]. Call [`shutdown_audio`] during teardown to
//! stop the thread gracefully.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::adpcm::{StereoFrame, WavError, read_wav};
use crate::systems::audio::{AudioSink, audio_thread};

/// Simultaneous one-shot sounds.
pub const MIX_CHANNELS: usize = 16;
/// Frames mixed per audio thread iteration.
pub const MIX_BUFFER_FRAMES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Shoot,
    Jump,
    DoubleJump,
    VineJump,
    Death,
    NoSpell,
    JumpSpell,
    ShootSpell,
    SpeedSpell,
    GetSpell,
    Save,
    BreakBlock,
    Thunder,
    Dragon,
    DragonDefeated,
}

impl SoundId {
    pub const ALL: [SoundId; 15] = [
        SoundId::Shoot,
        SoundId::Jump,
        SoundId::DoubleJump,
        SoundId::VineJump,
        SoundId::Death,
        SoundId::NoSpell,
        SoundId::JumpSpell,
        SoundId::ShootSpell,
        SoundId::SpeedSpell,
        SoundId::GetSpell,
        SoundId::Save,
        SoundId::BreakBlock,
        SoundId::Thunder,
        SoundId::Dragon,
        SoundId::DragonDefeated,
    ];

    /// Path of the sound file, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SoundId::Shoot => "data/snd/shoot.wav",
            SoundId::Jump => "data/snd/jump.wav",
            SoundId::DoubleJump => "data/snd/djump.wav",
            SoundId::VineJump => "data/snd/vineJump.wav",
            SoundId::Death => "data/snd/death.wav",
            SoundId::NoSpell => "data/snd/noSpell.wav",
            SoundId::JumpSpell => "data/snd/jumpSpell.wav",
            SoundId::ShootSpell => "data/snd/magicBall.wav",
            SoundId::SpeedSpell => "data/snd/speedSpell.wav",
            SoundId::GetSpell => "data/snd/getSpell.wav",
            SoundId::Save => "data/snd/save.wav",
            SoundId::BreakBlock => "data/snd/breakBlock.wav",
            SoundId::Thunder => "data/snd/thunder.wav",
            SoundId::Dragon => "data/snd/mikoo.wav",
            SoundId::DragonDefeated => "data/snd/mikooDefeated.wav",
        }
    }
}

type Clip = Arc<[StereoFrame]>;

/// Decoded one-shot sounds, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    clips: FxHashMap<SoundId, Clip>,
}

impl SoundBank {
    /// Decode every sound under `data_dir`. Any missing file is an error.
    pub fn load(data_dir: &Path) -> Result<SoundBank, WavError> {
        let mut clips = FxHashMap::default();
        let mut total = 0;
        for id in SoundId::ALL {
            let frames = read_wav(&data_dir.join(id.file_name()))?;
            total += frames.len();
            clips.insert(id, Clip::from(frames));
        }
        info!("Sound bank: {} frames", total);
        Ok(SoundBank { clips })
    }

    /// Every sound as `frames` frames of silence.
    pub fn silent(frames: usize) -> SoundBank {
        let clips = SoundId::ALL
            .iter()
            .map(|&id| (id, Clip::from(vec![StereoFrame::SILENCE; frames])))
            .collect();
        SoundBank { clips }
    }

    pub fn get(&self, id: SoundId) -> Option<&Clip> {
        self.clips.get(&id)
    }
}

/// Identifies one particular playback on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHandle {
    pub channel: usize,
    pub generation: u32,
}

#[derive(Debug, Default)]
struct Channel {
    sound: Option<SoundId>,
    clip: Option<Clip>,
    cursor: usize,
    generation: u32,
}

impl Channel {
    fn playing(&self) -> bool {
        self.clip.is_some()
    }

    fn stop(&mut self) {
        self.clip = None;
        self.sound = None;
        self.cursor = 0;
    }
}

#[derive(Debug)]
struct Bgm {
    frames: Vec<StereoFrame>,
    cursor: usize,
}

#[derive(Debug)]
struct MixerState {
    channels: [Channel; MIX_CHANNELS],
    bank: SoundBank,
    /// Last requested track; empty when music is off.
    bgm_name: String,
    bgm: Option<Bgm>,
    volume: f32,
    data_dir: PathBuf,
}

/// What happened while mixing one buffer.
#[derive(Debug, Default, PartialEq)]
pub struct MixReport {
    pub finished: SmallVec<[SoundId; 4]>,
    pub bgm_looped: bool,
}

/// Shared handle to the mixer state.
#[derive(Debug, Clone)]
pub struct Mixer {
    state: Arc<Mutex<MixerState>>,
}

impl Mixer {
    pub fn new(bank: SoundBank, data_dir: impl Into<PathBuf>) -> Self {
        Mixer {
            state: Arc::new(Mutex::new(MixerState {
                channels: Default::default(),
                bank,
                bgm_name: String::new(),
                bgm: None,
                volume: 1.0,
                data_dir: data_dir.into(),
            })),
        }
    }

    /// A mixer with silent sounds and no music directory, for headless runs.
    pub fn silent() -> Self {
        Self::new(SoundBank::silent(MIX_BUFFER_FRAMES), PathBuf::new())
    }

    fn lock(&self) -> MutexGuard<'_, MixerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start `sound` on the first idle channel, or on channel 0 when all are busy.
    pub fn play_sound(&self, sound: SoundId) -> ChannelHandle {
        let mut state = self.lock();
        let clip = state.bank.get(sound).cloned();
        let channel = state
            .channels
            .iter()
            .position(|c| !c.playing())
            .unwrap_or(0);
        let slot = &mut state.channels[channel];
        slot.generation = slot.generation.wrapping_add(1);
        slot.sound = Some(sound);
        slot.clip = clip;
        slot.cursor = 0;
        ChannelHandle {
            channel,
            generation: slot.generation,
        }
    }

    /// Stop every channel playing `sound`.
    pub fn stop_sound(&self, sound: SoundId) {
        let mut state = self.lock();
        for c in state.channels.iter_mut().filter(|c| c.sound == Some(sound)) {
            c.stop();
        }
    }

    /// Stop one playback. A handle whose channel was reused is ignored.
    pub fn stop_channel(&self, handle: ChannelHandle) {
        let mut state = self.lock();
        if let Some(c) = state.channels.get_mut(handle.channel)
            && c.generation == handle.generation
        {
            c.stop();
        }
    }

    pub fn stop_all_sounds(&self) {
        let mut state = self.lock();
        for c in state.channels.iter_mut() {
            c.stop();
        }
    }

    pub fn is_playing(&self, sound: SoundId) -> bool {
        self.lock()
            .channels
            .iter()
            .any(|c| c.playing() && c.sound == Some(sound))
    }

    pub fn set_volume(&self, volume: f32) {
        self.lock().volume = volume.clamp(0.0, 1.0);
    }

    /// Loop `name` as background music. Repeating the current track is a
    /// no-op; an empty name stops the music. A file that can't be decoded
    /// leaves the music off.
    pub fn play_bgm(&self, name: &str) {
        let path = {
            let mut state = self.lock();
            if state.bgm_name == name {
                return;
            }
            state.bgm = None;
            state.bgm_name = name.to_string();
            if name.is_empty() {
                return;
            }
            state.data_dir.join(name)
        };

        // Decode outside the lock so the audio thread keeps mixing.
        let frames = match read_wav(&path) {
            Ok(frames) if !frames.is_empty() => frames,
            Ok(_) => return,
            Err(e) => {
                debug!("bgm '{}' unavailable: {}", name, e);
                return;
            }
        };

        let mut state = self.lock();
        if state.bgm_name == name {
            state.bgm = Some(Bgm { frames, cursor: 0 });
        }
    }

    /// Name of the last requested background track.
    pub fn bgm_name(&self) -> String {
        self.lock().bgm_name.clone()
    }

    /// Whether background music is actually streaming.
    pub fn bgm_playing(&self) -> bool {
        self.lock().bgm.is_some()
    }

    /// Fill `out` with the BGM plus every active channel, saturating to i16.
    pub fn mix(&self, out: &mut [StereoFrame]) -> MixReport {
        let mut report = MixReport::default();
        let mut state = self.lock();
        let volume = state.volume;

        match state.bgm.as_mut() {
            Some(bgm) => {
                for frame in out.iter_mut() {
                    *frame = bgm.frames[bgm.cursor];
                    bgm.cursor += 1;
                    if bgm.cursor == bgm.frames.len() {
                        bgm.cursor = 0;
                        report.bgm_looped = true;
                    }
                }
            }
            None => out.fill(StereoFrame::SILENCE),
        }

        for channel in state.channels.iter_mut() {
            let Some(clip) = channel.clip.clone() else {
                continue;
            };
            for frame in out.iter_mut() {
                if channel.cursor >= clip.len() {
                    break;
                }
                *frame = frame.mix(clip[channel.cursor]);
                channel.cursor += 1;
            }
            if channel.cursor >= clip.len() {
                if let Some(sound) = channel.sound {
                    report.finished.push(sound);
                }
                channel.stop();
            }
        }

        if volume < 1.0 {
            for frame in out.iter_mut() {
                *frame = frame.scaled(volume);
            }
        }

        report
    }
}

/// Bridge between the game loop and the audio thread.
pub struct AudioBridge {
    pub mixer: Mixer,
    /// Sender for [`AudioCmd`] messages (game -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread mixing `mixer` into `sink`.
pub fn setup_audio(mixer: Mixer, sink: Box<dyn AudioSink>) -> AudioBridge {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let thread_mixer = mixer.clone();
    let handle = std::thread::spawn(move || audio_thread(thread_mixer, sink, rx_cmd, tx_msg));

    AudioBridge {
        mixer,
        tx_cmd,
        rx_msg,
        handle,
    }
}

/// Send [`AudioCmd::Shutdown`] and wait for the thread to exit.
pub fn shutdown_audio(bridge: AudioBridge) {
    let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
    let _ = bridge.handle.join();
}
