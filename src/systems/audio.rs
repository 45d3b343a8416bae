//! Background audio thread.
//!
//! [`audio_thread`] runs on its own OS thread. Each iteration it drains
//! pending [`AudioCmd`] messages, mixes one buffer from the shared
//! [`Mixer`](crate::resources::audio::Mixer), hands the buffer to an
//! [`AudioSink`] and reports [`AudioMessage`] events back to the game loop.
//! The sink paces the loop: a device sink blocks until the hardware wants
//! more samples, [`NullSink`] sleeps to match wall-clock time.
//!
//! Notes
//! - The thread is created once via [`crate::resources::audio::setup_audio`]
//!   and joined via [`crate::resources::audio::shutdown_audio`].
//! - The game loop drains events with [`poll_audio_messages`].

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info};

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::adpcm::{SAMPLE_RATE, StereoFrame};
use crate::resources::audio::{AudioBridge, MIX_BUFFER_FRAMES, Mixer};

/// Destination of mixed audio: a sound device or nothing at all.
pub trait AudioSink: Send {
    /// Consume one mixed buffer. May block until the device is ready.
    fn write(&mut self, frames: &[StereoFrame]);
}

/// Discards samples, sleeping so buffers are consumed in real time.
#[derive(Debug)]
pub struct NullSink {
    started: Instant,
    written: u64,
}

impl Default for NullSink {
    fn default() -> Self {
        NullSink {
            started: Instant::now(),
            written: 0,
        }
    }
}

impl AudioSink for NullSink {
    fn write(&mut self, frames: &[StereoFrame]) {
        self.written += frames.len() as u64;
        let due = Duration::from_micros(self.written * 1_000_000 / SAMPLE_RATE as u64);
        let elapsed = self.started.elapsed();
        if due > elapsed {
            std::thread::sleep(due - elapsed);
        }
    }
}

/// Drain every pending event from the audio thread without blocking.
pub fn poll_audio_messages(bridge: &AudioBridge) -> Vec<AudioMessage> {
    bridge.rx_msg.try_iter().collect()
}

/// Entry point of the dedicated audio thread.
///
/// Blocks until it receives [`AudioCmd::Shutdown`] or the command channel
/// disconnects.
pub fn audio_thread(
    mixer: Mixer,
    mut sink: Box<dyn AudioSink>,
    rx_cmd: Receiver<AudioCmd>,
    tx_evt: Sender<AudioMessage>,
) {
    info!(
        "audio thread starting (id={:?})",
        std::thread::current().id()
    );

    let mut buffer = vec![StereoFrame::SILENCE; MIX_BUFFER_FRAMES];

    'run: loop {
        // 1) Drain commands
        loop {
            match rx_cmd.try_recv() {
                Ok(AudioCmd::SetVolume(vol)) => {
                    debug!("audio volume {}", vol);
                    mixer.set_volume(vol);
                }
                Ok(AudioCmd::StopAllSounds) => mixer.stop_all_sounds(),
                Ok(AudioCmd::Shutdown) => {
                    debug!("audio shutdown requested");
                    mixer.stop_all_sounds();
                    break 'run;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'run,
            }
        }

        // 2) Mix one buffer under the mixer lock, then play it outside the lock
        let report = mixer.mix(&mut buffer);
        for sound in report.finished {
            let _ = tx_evt.send(AudioMessage::SoundFinished { sound });
        }
        if report.bgm_looped {
            let _ = tx_evt.send(AudioMessage::BgmLooped {
                name: mixer.bgm_name(),
            });
        }

        sink.write(&buffer);
    }

    info!(
        "audio thread exiting (id={:?})",
        std::thread::current().id()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::audio::{SoundBank, SoundId, setup_audio, shutdown_audio};
    use std::sync::{Arc, Mutex};

    /// Records how many buffers were written.
    struct CountingSink(Arc<Mutex<usize>>);

    impl AudioSink for CountingSink {
        fn write(&mut self, _frames: &[StereoFrame]) {
            *self.0.lock().unwrap() += 1;
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_thread_mixes_and_reports_finished_sounds() {
        let count = Arc::new(Mutex::new(0));
        let mixer = Mixer::new(SoundBank::silent(10), std::path::PathBuf::new());
        let bridge = setup_audio(mixer.clone(), Box::new(CountingSink(count.clone())));

        mixer.play_sound(SoundId::Jump);
        let mut got = Vec::new();
        for _ in 0..200 {
            got.extend(poll_audio_messages(&bridge));
            if !got.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(
            got,
            vec![AudioMessage::SoundFinished {
                sound: SoundId::Jump
            }]
        );

        shutdown_audio(bridge);
        assert!(*count.lock().unwrap() > 0);
    }
}
