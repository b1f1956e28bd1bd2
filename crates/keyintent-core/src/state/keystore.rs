// Keyintent Press Verdict Store
// Keeps the verdict of each press, and where it was blasted, until the
// matching release arrives

use std::collections::HashMap;

use crate::{KeyId, KeyOrigin, KeyState};

/// Guarantees that a release reports the same verdict as its press.
///
/// Downstream state (the selected source, the blast table) can change while a
/// key is held. The release is therefore never re-evaluated: it replays the
/// verdict stored when the key went down.
///
/// The code set a press was blasted to is kept with its verdict, so the
/// release can stop the device that is actually repeating.
///
/// At most one entry exists per `(origin, key)` pair, so a stuck key can
/// leave entries behind but the map stays bounded by the key space.
#[derive(Debug, Default)]
pub struct PressReleaseTracker {
    presses: HashMap<(KeyOrigin, KeyId), PressRecord>,
}

#[derive(Debug, Clone)]
struct PressRecord {
    consumed: bool,
    code_set: Option<String>,
}

impl PressReleaseTracker {
    /// Create a new empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of presses still waiting for their release
    pub fn len(&self) -> usize {
        self.presses.len()
    }

    /// Check if no press is outstanding
    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    /// Verdict recorded for an outstanding press
    pub fn get(&self, origin: KeyOrigin, key_id: KeyId) -> Option<bool> {
        self.presses.get(&(origin, key_id)).map(|record| record.consumed)
    }

    /// Code set an outstanding press was blasted to
    pub fn code_set(&self, origin: KeyOrigin, key_id: KeyId) -> Option<&str> {
        self.presses
            .get(&(origin, key_id))
            .and_then(|record| record.code_set.as_deref())
    }

    /// Record a press verdict or replay it for a release.
    ///
    /// On PRESSED the verdict and the blasted code set are stored (replacing
    /// any stale entry) and the verdict is returned unchanged. On RELEASED both
    /// arguments are ignored and the stored verdict is removed and returned.
    /// An orphan release has nothing to replay and reports `false` so that
    /// generic handling still sees it.
    pub fn record_and_return(
        &mut self,
        origin: KeyOrigin,
        key_id: KeyId,
        state: KeyState,
        verdict_if_press: bool,
        code_set: Option<String>,
    ) -> bool {
        match state {
            KeyState::Pressed => {
                let record = PressRecord {
                    consumed: verdict_if_press,
                    code_set,
                };
                if self.presses.insert((origin, key_id), record).is_some() {
                    log::debug!("{}/{} pressed again before release", origin, key_id);
                }
                verdict_if_press
            }
            KeyState::Released => match self.presses.remove(&(origin, key_id)) {
                Some(record) => record.consumed,
                None => {
                    log::warn!("{}/{} released without a recorded press", origin, key_id);
                    false
                }
            },
        }
    }

    /// Drop an outstanding press without replaying it
    pub fn forget(&mut self, origin: KeyOrigin, key_id: KeyId) -> Option<bool> {
        self.presses
            .remove(&(origin, key_id))
            .map(|record| record.consumed)
    }

    /// Clear all outstanding presses
    pub fn clear(&mut self) {
        self.presses.clear();
    }
}
