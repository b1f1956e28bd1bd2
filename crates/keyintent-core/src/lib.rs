// Keyintent Core Library
// Key-event filtering and intent translation for the product controller

pub mod action;
pub mod blast;
pub mod config;
pub mod filter;
pub mod input;
pub mod intent;
pub mod key;
pub mod manager;
pub mod power;
pub mod settings;
pub mod source;
pub mod state;

pub use action::{KeyOrigin, KeyState};
pub use blast::{
    BlastAction, BlastDecision, BlastOutcome, BlastRequest, BlastTransport, BlastedKeyTable,
    CiCodeTracker, KeyBlaster, RecordingTransport,
};
pub use config::ConfigError;
pub use filter::{FilterEntry, FilterOutcome, FilterTable, SharedFilterTable, SourceFilterEngine};
pub use input::{ChordFilter, KeyEvent, CHORD_RECOVERY_MS};
pub use intent::{CommonIntent, CustomIntent, Intent};
pub use key::{key_from_name, key_name, KeyId, CHORD_KEY_RANGE, KEY_TABLE};
pub use manager::{KeyInputManager, KeyVerdict};
pub use power::{
    MacroProgress, PowerKey, PowerMacro, PowerMacroError, PowerMacroSequencer, PowerMacroStore,
};
pub use settings::{default_settings_content, Settings, SettingsError};
pub use source::{
    ContentItem, ProductSourceSlot, SourceDetails, SourceInfo, SourceItem, SourceStatus,
    DEVICE_TYPE_TV, INVALID_SOURCE, PRODUCT_SOURCE,
};
pub use state::PressReleaseTracker;
