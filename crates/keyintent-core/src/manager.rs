// Keyintent Key Input Manager
//
// Composes the key path: chord filtering, press/release symmetry and the IR
// blast rules, plus the source filter used by the intent path and the power
// macro. All state is owned here and driven from a single task; callbacks
// (acknowledgments, source updates, reloads) must be posted to that task.

use std::fmt;

use crate::blast::{BlastDecision, BlastTransport, BlastedKeyTable, CiCodeTracker, KeyBlaster};
use crate::filter::{FilterOutcome, FilterTable, SharedFilterTable, SourceFilterEngine};
use crate::input::ChordFilter;
use crate::power::{MacroProgress, PowerKey, PowerMacro, PowerMacroSequencer};
use crate::source::{SourceInfo, INVALID_SOURCE};
use crate::state::PressReleaseTracker;
use crate::{Intent, KeyEvent, KeyState};

/// How a key event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVerdict {
    /// Artifact of chord resolution, dropped
    Chord,
    /// Press decided by the blast rules
    Decided(BlastDecision),
    /// Release reporting the verdict of its press
    Replayed(bool),
}

impl KeyVerdict {
    /// Check if the generic intent path must skip the event
    pub fn is_consumed(self) -> bool {
        match self {
            KeyVerdict::Chord => true,
            KeyVerdict::Decided(decision) => decision.is_consumed(),
            KeyVerdict::Replayed(consumed) => consumed,
        }
    }
}

impl fmt::Display for KeyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let consumed = if self.is_consumed() { "consumed" } else { "passed" };
        match self {
            KeyVerdict::Chord => write!(f, "{} (chord artifact)", consumed),
            KeyVerdict::Decided(decision) => write!(f, "{} ({})", consumed, decision),
            KeyVerdict::Replayed(_) => write!(f, "{} (replayed)", consumed),
        }
    }
}

/// Key path and intent filtering for one product
pub struct KeyInputManager<T: BlastTransport> {
    transport: T,
    chord_filter: ChordFilter,
    tracker: PressReleaseTracker,
    blaster: KeyBlaster,
    filter_engine: SourceFilterEngine,
    sequencer: PowerMacroSequencer,
    cicodes: CiCodeTracker,
    sources: SourceInfo,
}

impl<T: BlastTransport> KeyInputManager<T> {
    pub fn new(filter_table: FilterTable, blast_table: BlastedKeyTable, transport: T) -> Self {
        Self::with_shared_table(SharedFilterTable::new(filter_table), blast_table, transport)
    }

    /// Create a manager whose filter table is reloaded through a shared handle
    pub fn with_shared_table(
        filter_table: SharedFilterTable,
        blast_table: BlastedKeyTable,
        transport: T,
    ) -> Self {
        Self {
            transport,
            chord_filter: ChordFilter::new(),
            tracker: PressReleaseTracker::new(),
            blaster: KeyBlaster::new(blast_table),
            filter_engine: SourceFilterEngine::with_shared(filter_table),
            sequencer: PowerMacroSequencer::new(),
            cicodes: CiCodeTracker::new(),
            sources: SourceInfo::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current source snapshot
    pub fn sources(&self) -> &SourceInfo {
        &self.sources
    }

    /// Handle to the filter table
    pub fn filter_table(&self) -> &SharedFilterTable {
        self.filter_engine.table()
    }

    /// Presses still waiting for their release
    pub fn outstanding_presses(&self) -> usize {
        self.tracker.len()
    }

    /// Process a key event; returns true when it is consumed
    pub fn process_key_event(&mut self, event: &KeyEvent) -> bool {
        self.process(event).is_consumed()
    }

    /// Process a key event and report how it was handled
    pub fn process(&mut self, event: &KeyEvent) -> KeyVerdict {
        if self.chord_filter.filter(event) {
            if event.state.is_released() {
                self.tracker.forget(event.origin, event.key_id);
            }
            log::debug!("{}: chord artifact", event);
            return KeyVerdict::Chord;
        }

        // A release ends the blast on the device its press went to
        let held_code_set = match event.state {
            KeyState::Pressed => None,
            KeyState::Released => self.tracker.code_set(event.origin, event.key_id),
        };
        let outcome = self
            .blaster
            .dispatch(event, &self.sources, held_code_set, &self.transport);
        let consumed = self.tracker.record_and_return(
            event.origin,
            event.key_id,
            event.state,
            outcome.decision.is_consumed(),
            outcome.code_set,
        );

        if event.state.is_pressed() {
            KeyVerdict::Decided(outcome.decision)
        } else {
            KeyVerdict::Replayed(consumed)
        }
    }

    /// Filter outcome of an intent for the current selection.
    ///
    /// With nothing selected the source is reported as `INVALID_SOURCE`
    /// with an empty account.
    pub fn intent_outcome(&self, intent_name: &str) -> FilterOutcome {
        let (source, account) = match &self.sources.now_selection {
            Some(selection) => (selection.source.as_str(), selection.source_account.as_str()),
            None => (INVALID_SOURCE, ""),
        };
        self.filter_engine.evaluate(intent_name, source, account)
    }

    /// Check if an intent is dropped for the current selection
    pub fn is_intent_ignored(&self, intent: Intent) -> bool {
        self.intent_outcome(intent.name()).is_drop()
    }

    /// Replace the source snapshot and publish changed IR code sets
    pub fn update_sources(&mut self, sources: SourceInfo) {
        self.sources = sources;
        if let Some(codes) = self.cicodes.update(&self.sources) {
            self.transport.notify_source_cicodes(&codes);
        }
    }

    /// Replace the filter table atomically
    pub fn reload_filter_table(&self, table: FilterTable) {
        log::info!("Reloading key filter table ({} entries)", table.len());
        self.filter_engine.table().replace(table);
    }

    /// Replace the blasted key table
    pub fn reload_blast_table(&mut self, table: BlastedKeyTable) {
        log::info!("Reloading blast table ({} key/device pairs)", table.len());
        self.blaster.set_table(table);
    }

    /// Run a power macro against the current sources
    pub fn execute_power_macro(&mut self, power_macro: &PowerMacro, key: PowerKey) -> MacroProgress {
        self.sequencer
            .execute(power_macro, key, &self.sources, &self.transport)
    }

    /// The TV acknowledged the power macro's command
    pub fn power_macro_acknowledged(&mut self) -> MacroProgress {
        self.sequencer
            .on_tv_acknowledged(&self.sources, &self.transport)
    }

    /// State of the power macro
    pub fn power_macro_progress(&self) -> MacroProgress {
        self.sequencer.progress()
    }
}
