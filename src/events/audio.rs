//! Messages exchanged with the audio thread.

use crate::resources::audio::SoundId;

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Master volume, 0.0 to 1.0.
    SetVolume(f32),
    StopAllSounds,
    Shutdown,
}

/// Events sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// A one-shot sound ran out of samples.
    SoundFinished { sound: SoundId },
    /// The background track wrapped around to its start.
    BgmLooped { name: String },
}
