//! Scripted input events.
//!
//! A replay script is a JSON array of [`InputEvent`]s. Each event names the
//! tick it applies to and the buttons that go down or come up at the start of
//! that tick:
//!
//! ```json
//! [
//!   { "tick": 0, "press": ["jump"] },
//!   { "tick": 1, "release": ["jump"], "press": ["right"] },
//!   { "tick": 40, "release": ["right"] }
//! ]
//! ```
//!
//! Button names are those accepted by
//! [`Buttons::from_name`](crate::resources::input::Buttons::from_name).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub tick: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub press: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release: Vec<String>,
}
