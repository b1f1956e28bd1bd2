// Keyintent Power Macro Sequencer
//
// Powers the TV, waits for its acknowledgment, then powers the macro's
// source device. The wait has no timeout: a lost acknowledgment leaves the
// macro pending until the next execution replaces it.

use std::fmt;

use super::config::PowerMacro;
use crate::blast::{BlastAction, BlastRequest, BlastTransport};
use crate::source::{ProductSourceSlot, SourceInfo};
use crate::KeyId;

/// Logical power key a macro runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerKey {
    On,
    Off,
}

impl PowerKey {
    /// Key blasted to the devices
    pub fn key_id(self) -> KeyId {
        match self {
            PowerKey::On => KeyId::ASSERT_ON,
            PowerKey::Off => KeyId::ASSERT_OFF,
        }
    }
}

/// Where the sequencer stands after a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroProgress {
    Idle,
    AwaitingTvAck,
}

impl fmt::Display for MacroProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroProgress::Idle => write!(f, "idle"),
            MacroProgress::AwaitingTvAck => write!(f, "awaiting tv ack"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingMacro {
    key: PowerKey,
    device: Option<ProductSourceSlot>,
}

/// Single-shot power macro state machine
#[derive(Debug, Default)]
pub struct PowerMacroSequencer {
    pending: Option<PendingMacro>,
}

impl PowerMacroSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn progress(&self) -> MacroProgress {
        if self.pending.is_some() {
            MacroProgress::AwaitingTvAck
        } else {
            MacroProgress::Idle
        }
    }

    /// Start a macro.
    ///
    /// When the TV step applies, the TV command is sent and the source step
    /// is deferred to [`on_tv_acknowledged`](Self::on_tv_acknowledged).
    /// Otherwise the source step runs immediately.
    pub fn execute<T>(
        &mut self,
        power_macro: &PowerMacro,
        key: PowerKey,
        sources: &SourceInfo,
        transport: &T,
    ) -> MacroProgress
    where
        T: BlastTransport + ?Sized,
    {
        if !power_macro.enabled {
            log::debug!("Power macro disabled");
            return self.progress();
        }

        if let Some(previous) = self.pending.take() {
            log::warn!("Power macro {:?} replaced before the TV acknowledged", previous.key);
        }

        log::info!("Executing power macro {:?} for {:?}", power_macro, key);

        if power_macro.power_on_tv {
            if let Some(code_set) = slot_cicode(sources, ProductSourceSlot::Tv) {
                send_single_press(transport, key, code_set);
                self.pending = Some(PendingMacro {
                    key,
                    device: power_macro.power_on_device,
                });
                return MacroProgress::AwaitingTvAck;
            }
            log::warn!("Power macro TV step skipped, TV has no IR codes");
        }

        power_device(power_macro.power_on_device, key, sources, transport);
        MacroProgress::Idle
    }

    /// Resume a macro once the TV acknowledged its command
    pub fn on_tv_acknowledged<T>(&mut self, sources: &SourceInfo, transport: &T) -> MacroProgress
    where
        T: BlastTransport + ?Sized,
    {
        match self.pending.take() {
            Some(pending) => {
                log::debug!("TV acknowledged power macro {:?}", pending.key);
                power_device(pending.device, pending.key, sources, transport);
            }
            None => log::debug!("TV acknowledgment with no power macro pending"),
        }
        MacroProgress::Idle
    }
}

fn power_device<T>(
    device: Option<ProductSourceSlot>,
    key: PowerKey,
    sources: &SourceInfo,
    transport: &T,
) where
    T: BlastTransport + ?Sized,
{
    let Some(slot) = device else {
        return;
    };
    match slot_cicode(sources, slot) {
        Some(code_set) => send_single_press(transport, key, code_set),
        None => log::debug!("Power macro device {} has no IR codes", slot),
    }
}

fn slot_cicode(sources: &SourceInfo, slot: ProductSourceSlot) -> Option<&str> {
    sources.find_product_slot(slot).and_then(|source| source.cicode())
}

fn send_single_press<T>(transport: &T, key: PowerKey, code_set: &str)
where
    T: BlastTransport + ?Sized,
{
    let request = BlastRequest::new(key.key_id(), code_set, BlastAction::SinglePress);
    log::info!("Blasting {}", request);
    transport.send_key(request);
}
