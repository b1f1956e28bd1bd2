// Keyintent Filter Module
// Source-conditional intent filtering and translation

pub mod engine;
mod table;

pub use engine::{FilterOutcome, SourceFilterEngine};
pub use table::{FilterEntry, FilterTable, SharedFilterTable, SourceFilter, SourcePattern};
