// Keyintent Power Module
// Power macro configuration, persistence and sequencing

mod config;
mod sequencer;

pub use config::{PowerMacro, PowerMacroError, PowerMacroStore};
pub use sequencer::{MacroProgress, PowerKey, PowerMacroSequencer};
