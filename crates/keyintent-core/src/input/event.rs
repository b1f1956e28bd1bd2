// Keyintent Input Layer - Key Events
// Discrete key transitions delivered by the key controller

use std::fmt;

use crate::{KeyId, KeyOrigin, KeyState};

/// A single key transition.
///
/// `origin` and `key_id` repeat over time, so events carry no identity of
/// their own; every consumer relies on the order in which they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Transport the event arrived on
    pub origin: KeyOrigin,
    /// Key value
    pub key_id: KeyId,
    /// Pressed or released
    pub state: KeyState,
    /// Monotonic clock reading in milliseconds
    pub timestamp_ms: i64,
}

impl KeyEvent {
    pub fn new(origin: KeyOrigin, key_id: KeyId, state: KeyState, timestamp_ms: i64) -> Self {
        Self {
            origin,
            key_id,
            state,
            timestamp_ms,
        }
    }

    /// Shorthand for a PRESSED event
    pub fn pressed(origin: KeyOrigin, key_id: KeyId, timestamp_ms: i64) -> Self {
        Self::new(origin, key_id, KeyState::Pressed, timestamp_ms)
    }

    /// Shorthand for a RELEASED event
    pub fn released(origin: KeyOrigin, key_id: KeyId, timestamp_ms: i64) -> Self {
        Self::new(origin, key_id, KeyState::Released, timestamp_ms)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} @ {}",
            self.origin, self.key_id, self.state, self.timestamp_ms
        )
    }
}
