// Keyintent Key Blaster
//
// Decides per key event whether the key is forwarded as an IR command to a
// legacy device (TV, set-top box) and sends that command.

use std::fmt;

use super::request::{BlastAction, BlastRequest, BlastTransport};
use super::table::BlastedKeyTable;
use crate::source::{ProductSourceSlot, SourceInfo, SourceItem, DEVICE_TYPE_TV};
use crate::{KeyEvent, KeyId, KeyOrigin};

/// Why the blaster consumed or passed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlastDecision {
    /// TV input always targets the TV slot
    TvInput,
    /// Nothing is selected
    NoSelection,
    /// The selection does not name a known source
    UnknownSource,
    /// CEC key while a non-product source is selected
    CecSuppressed,
    /// Key would be blasted to a TV that is not set up yet
    UnconfiguredTv,
    /// The selected source has no device details
    NoDetails,
    /// Key is not blasted for the selected device type
    NotBlasted,
    /// Key is blasted to the selected source
    Blasted,
    /// Key is blasted for the device type but the source is not configured
    Unavailable,
}

impl BlastDecision {
    /// Check if the event is consumed here
    pub fn is_consumed(self) -> bool {
        match self {
            BlastDecision::TvInput
            | BlastDecision::CecSuppressed
            | BlastDecision::UnconfiguredTv
            | BlastDecision::Blasted
            | BlastDecision::Unavailable => true,
            BlastDecision::NoSelection
            | BlastDecision::UnknownSource
            | BlastDecision::NoDetails
            | BlastDecision::NotBlasted => false,
        }
    }
}

impl fmt::Display for BlastDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BlastDecision::TvInput => "tv input",
            BlastDecision::NoSelection => "no selection",
            BlastDecision::UnknownSource => "unknown source",
            BlastDecision::CecSuppressed => "cec suppressed",
            BlastDecision::UnconfiguredTv => "unconfigured tv",
            BlastDecision::NoDetails => "no device details",
            BlastDecision::NotBlasted => "not blasted",
            BlastDecision::Blasted => "blasted",
            BlastDecision::Unavailable => "source unavailable",
        };
        write!(f, "{}", text)
    }
}

/// Result of running one event through the blaster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastOutcome {
    pub decision: BlastDecision,
    /// Code set a press was blasted to; `None` when nothing was sent
    pub code_set: Option<String>,
}

/// IR forwarding decisions against the blasted key table
#[derive(Debug, Clone, Default)]
pub struct KeyBlaster {
    table: BlastedKeyTable,
}

impl KeyBlaster {
    pub fn new(table: BlastedKeyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BlastedKeyTable {
        &self.table
    }

    /// Replace the blasted key table
    pub fn set_table(&mut self, table: BlastedKeyTable) {
        self.table = table;
    }

    /// Process one event; returns true when it is consumed
    pub fn process<T>(&self, event: &KeyEvent, sources: &SourceInfo, transport: &T) -> bool
    where
        T: BlastTransport + ?Sized,
    {
        self.decide(event, sources, transport).is_consumed()
    }

    /// Process one event and report which rule decided it.
    ///
    /// A release ends the blast at the code set targeted by the current
    /// selection; use [`KeyBlaster::dispatch`] to end it where the press went.
    pub fn decide<T>(&self, event: &KeyEvent, sources: &SourceInfo, transport: &T) -> BlastDecision
    where
        T: BlastTransport + ?Sized,
    {
        self.dispatch(event, sources, None, transport).decision
    }

    /// Process one event, reporting the rule and the code set blasted to.
    ///
    /// A release always sends an end-press first, whatever the rules below
    /// conclude: a repeating blast must never outlive its key. It goes to
    /// `held_code_set`, the code set the press was blasted to, or to the
    /// code set of the current selection when the press sent nothing.
    pub fn dispatch<T>(
        &self,
        event: &KeyEvent,
        sources: &SourceInfo,
        held_code_set: Option<&str>,
        transport: &T,
    ) -> BlastOutcome
    where
        T: BlastTransport + ?Sized,
    {
        if event.state.is_released() {
            let code_set =
                held_code_set.unwrap_or_else(|| release_code_set(event.key_id, sources));
            send(transport, event.key_id, code_set, BlastAction::EndPress);
        }

        let (decision, code_set) = self.evaluate(event, sources, transport);
        log::debug!("{}: {}", event, decision);
        BlastOutcome {
            decision,
            code_set: code_set.map(str::to_owned),
        }
    }

    fn evaluate<'s, T>(
        &self,
        event: &KeyEvent,
        sources: &'s SourceInfo,
        transport: &T,
    ) -> (BlastDecision, Option<&'s str>)
    where
        T: BlastTransport + ?Sized,
    {
        if event.key_id == KeyId::TV_INPUT {
            let mut sent = None;
            if event.state.is_pressed() {
                match sources.find_product_slot(ProductSourceSlot::Tv) {
                    Some(tv) if tv.details.is_some() => {
                        let code_set = tv.cicode().unwrap_or_default();
                        send(transport, event.key_id, code_set, BlastAction::for_state(event.state));
                        sent = Some(code_set);
                    }
                    _ => log::debug!("TV input with no TV details, nothing to blast"),
                }
            }
            return (BlastDecision::TvInput, sent);
        }

        let Some(selection) = &sources.now_selection else {
            return (BlastDecision::NoSelection, None);
        };
        let Some(source) = sources.find_source(&selection.source, &selection.source_account)
        else {
            return (BlastDecision::UnknownSource, None);
        };

        if event.origin == KeyOrigin::Cec && !source.is_product() {
            return (BlastDecision::CecSuppressed, None);
        }

        // The TV slot has no details until it is configured after a factory reset
        if source.is_product_slot(ProductSourceSlot::Tv)
            && source.details.is_none()
            && self.table.is_blasted_key(event.key_id, DEVICE_TYPE_TV)
        {
            log::info!("Consuming {} for unconfigured TV", event.key_id);
            return (BlastDecision::UnconfiguredTv, None);
        }

        let Some(device_type) = source.device_type() else {
            return (BlastDecision::NoDetails, None);
        };
        if !self.table.is_blasted_key(event.key_id, device_type) {
            return (BlastDecision::NotBlasted, None);
        }

        if !source.is_available() {
            log::info!(
                "Consuming {} for unconfigured source {}/{}",
                event.key_id,
                source.source_name,
                source.source_account_name
            );
            return (BlastDecision::Unavailable, None);
        }

        if event.state.is_released() {
            return (BlastDecision::Blasted, None);
        }
        let code_set = source.cicode().unwrap_or_default();
        send(transport, event.key_id, code_set, BlastAction::for_state(event.state));
        (BlastDecision::Blasted, Some(code_set))
    }
}

/// Code set the end-press of a release is addressed to
fn release_code_set(key_id: KeyId, sources: &SourceInfo) -> &str {
    let target: Option<&SourceItem> = if key_id == KeyId::TV_INPUT {
        sources.find_product_slot(ProductSourceSlot::Tv)
    } else {
        sources.now_selected_source()
    };
    target.and_then(SourceItem::cicode).unwrap_or_default()
}

fn send<T>(transport: &T, key_id: KeyId, code_set: &str, action: BlastAction)
where
    T: BlastTransport + ?Sized,
{
    let request = BlastRequest::new(key_id, code_set, action);
    log::info!("Blasting {}", request);
    transport.send_key(request);
}
