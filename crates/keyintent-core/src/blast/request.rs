// Keyintent Blast Requests
// IR commands and the transport that carries them to the legacy device

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{KeyId, KeyState};

/// How the legacy device should treat a blasted key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlastAction {
    /// Repeat until an `EndPress` arrives
    ContinuousPress,
    /// Stop any repeating key
    EndPress,
    /// Send the key once
    SinglePress,
}

impl BlastAction {
    /// Action a key event maps to when blasted directly
    pub fn for_state(state: KeyState) -> Self {
        match state {
            KeyState::Pressed => BlastAction::ContinuousPress,
            KeyState::Released => BlastAction::EndPress,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlastAction::ContinuousPress => "CONTINUOUS_PRESS",
            BlastAction::EndPress => "END_PRESS",
            BlastAction::SinglePress => "SINGLE_PRESS",
        }
    }
}

impl fmt::Display for BlastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One IR command for the legacy device transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastRequest {
    pub key_id: KeyId,
    /// IR code set of the target device
    pub code_set: String,
    pub action: BlastAction,
}

impl BlastRequest {
    pub fn new(key_id: KeyId, code_set: impl Into<String>, action: BlastAction) -> Self {
        Self {
            key_id,
            code_set: code_set.into(),
            action,
        }
    }
}

impl fmt::Display for BlastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08x}/{} {}/'{}'",
            self.key_id.value(),
            self.key_id,
            self.action,
            self.code_set
        )
    }
}

/// Sink for IR commands.
///
/// Sends are fire-and-forget: implementations must not block the key path
/// waiting for the device. Acknowledgments come back separately (see
/// [`crate::PowerMacroSequencer::on_tv_acknowledged`]).
pub trait BlastTransport {
    /// Send one IR command
    fn send_key(&self, request: BlastRequest);

    /// Publish the IR code sets of all configured sources
    fn notify_source_cicodes(&self, _cicodes: &[String]) {}
}

/// Transport that records every command in order.
///
/// Clones share the same log, so a caller can hand one clone to the manager
/// and inspect the traffic through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<BlastRequest>>>,
    cicodes: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands sent so far
    pub fn requests(&self) -> Vec<BlastRequest> {
        self.requests.lock().clone()
    }

    /// Remove and return the commands sent so far
    pub fn take_requests(&self) -> Vec<BlastRequest> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Code set notifications sent so far
    pub fn cicode_notifications(&self) -> Vec<Vec<String>> {
        self.cicodes.lock().clone()
    }
}

impl BlastTransport for RecordingTransport {
    fn send_key(&self, request: BlastRequest) {
        self.requests.lock().push(request);
    }

    fn notify_source_cicodes(&self, cicodes: &[String]) {
        self.cicodes.lock().push(cicodes.to_vec());
    }
}
