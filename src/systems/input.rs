//! Input replay.
//!
//! [`InputReplay`] feeds a recorded script of
//! [`InputEvent`](crate::events::input::InputEvent)s into the simulation's
//! input snapshot, one tick at a time. The headless binary uses it in place
//! of a keyboard.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::events::input::InputEvent;
use crate::resources::input::{Buttons, InputSnapshot};

#[derive(Debug)]
pub enum ReplayError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read replay {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid replay script: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::Parse(err)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputReplay {
    events: Vec<InputEvent>,
    cursor: usize,
}

fn parse_buttons(names: &[String]) -> Buttons {
    let mut buttons = Buttons::NONE;
    for name in names {
        match Buttons::from_name(name) {
            Some(b) => buttons |= b,
            None => warn!("unknown button '{name}' in replay"),
        }
    }
    buttons
}

impl InputReplay {
    /// Events are sorted by tick; events sharing a tick keep script order.
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by_key(|e| e.tick);
        InputReplay { events, cursor: 0 }
    }

    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Last tick with an event, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.events.last().map(|e| e.tick)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Apply every event scheduled up to and including `tick`.
    pub fn apply(&mut self, tick: u64, input: &mut InputSnapshot) {
        while let Some(event) = self.events.get(self.cursor) {
            if event.tick > tick {
                break;
            }
            input.press(parse_buttons(&event.press));
            input.release(parse_buttons(&event.release));
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_apply_on_their_tick() {
        let mut replay = InputReplay::from_json(
            r#"[
                {"tick": 2, "release": ["right"]},
                {"tick": 0, "press": ["right", "jump"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(replay.last_tick(), Some(2));

        let mut input = InputSnapshot::default();
        replay.apply(0, &mut input);
        assert_eq!(input.pressed, Buttons::RIGHT | Buttons::JUMP);
        input.update_down();
        input.clear_edges();

        replay.apply(1, &mut input);
        assert!(input.pressed.is_empty());
        replay.apply(2, &mut input);
        assert_eq!(input.released, Buttons::RIGHT);
        assert!(replay.is_finished());
    }

    #[test]
    fn test_unknown_buttons_are_skipped() {
        let mut replay =
            InputReplay::from_json(r#"[{"tick": 0, "press": ["fly", "shoot"]}]"#).unwrap();
        let mut input = InputSnapshot::default();
        replay.apply(0, &mut input);
        assert_eq!(input.pressed, Buttons::SHOOT);
    }

    #[test]
    fn test_bad_script_is_an_error() {
        assert!(matches!(
            InputReplay::from_json("{\"tick\": 0}"),
            Err(ReplayError::Parse(_))
        ));
    }
}
