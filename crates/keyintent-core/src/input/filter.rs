// Keyintent Input Layer - Chord Filtering
// Suppresses key events left over from incomplete chord resolution

use crate::{KeyEvent, KeyId, KeyState};

/// Window after a chord-key release during which a new press is treated as
/// a chord artifact. Tuned to remote-control latency; not configurable.
pub const CHORD_RECOVERY_MS: i64 = 20;

/// Filters the press/release pair of a key that outlives a chord.
///
/// When keys A and B are pressed and held, the controller reports a synthetic
/// chord key S. If A is released while B is still held, the controller
/// releases S and immediately re-reports B as pressed. Both that press of B
/// and its later release must be ignored. The press is recognised by arriving
/// within [`CHORD_RECOVERY_MS`] of the release of S.
///
/// Two unrelated keys pressed inside the window by coincidence are also
/// suppressed. That false positive is accepted.
#[derive(Debug, Default)]
pub struct ChordFilter {
    /// Time of the most recent chord-key release
    time_of_last_chord_release: Option<i64>,
    /// Key pressed inside the window whose release is still outstanding
    pending_chord_key: Option<KeyId>,
}

impl ChordFilter {
    /// Create a new chord filter with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Key currently waiting for its suppressed release, if any
    pub fn pending_chord_key(&self) -> Option<KeyId> {
        self.pending_chord_key
    }

    /// Returns true if the event is a chord artifact and must be ignored.
    ///
    /// The event timestamp is used as the current time.
    pub fn filter(&mut self, event: &KeyEvent) -> bool {
        let now = event.timestamp_ms;

        let suppress = match event.state {
            KeyState::Pressed => {
                if self.in_recovery_window(now) {
                    self.pending_chord_key = Some(event.key_id);
                    true
                } else {
                    self.pending_chord_key = None;
                    false
                }
            }
            KeyState::Released => {
                if event.key_id.is_chord_key() {
                    self.time_of_last_chord_release = Some(now);
                    false
                } else if self.pending_chord_key == Some(event.key_id) {
                    self.pending_chord_key = None;
                    true
                } else {
                    false
                }
            }
        };

        log::trace!("chord filter {} returning {}", event, suppress);
        suppress
    }

    /// A timestamp earlier than the chord release counts as inside the window
    fn in_recovery_window(&self, now: i64) -> bool {
        self.time_of_last_chord_release
            .map_or(false, |released| now.saturating_sub(released) <= CHORD_RECOVERY_MS)
    }
}
