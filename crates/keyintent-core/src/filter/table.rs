// Keyintent Filter Table
// Action entries with their compiled source/account patterns

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use smallvec::SmallVec;

use crate::config::{self, ConfigError};
use crate::Intent;

/// A compiled `(source name, source account)` regex pair.
///
/// Both patterns must match the whole string.
#[derive(Debug, Clone)]
pub struct SourcePattern {
    source: Regex,
    account: Regex,
}

impl SourcePattern {
    /// Compile a pair of patterns
    pub fn new(source: &str, account: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regexes(Self::compile(source)?, Self::compile(account)?))
    }

    /// Build a pair from already compiled full-match regexes
    pub fn from_regexes(source: Regex, account: Regex) -> Self {
        Self { source, account }
    }

    /// Compile a single pattern anchored at both ends
    pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{})$", pattern))
    }

    /// Check if both patterns match
    pub fn matches(&self, source: &str, account: &str) -> bool {
        self.source.is_match(source) && self.account.is_match(account)
    }
}

/// The set of source/account pairs an entry is filtered in.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    sources: SmallVec<[SourcePattern; 2]>,
}

impl SourceFilter {
    /// Create an empty filter (matches nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair; pairs are tried in insertion order
    pub fn push(&mut self, pattern: SourcePattern) {
        self.sources.push(pattern);
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if there are no pairs
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Index of the first pair matching the source and account
    pub fn first_match(&self, source: &str, account: &str) -> Option<usize> {
        self.sources.iter().position(|p| p.matches(source, account))
    }
}

/// One action entry
#[derive(Debug, Clone)]
pub struct FilterEntry {
    /// Action name, compared exactly against intent names
    pub action_name: String,
    /// Sources in which the action is filtered
    pub filter: Option<SourceFilter>,
    /// Replacement intent, resolved at load time
    pub translate: Option<Intent>,
}

impl FilterEntry {
    pub fn new(
        action_name: impl Into<String>,
        filter: Option<SourceFilter>,
        translate: Option<Intent>,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            filter,
            translate,
        }
    }
}

/// Action name to entry table, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    entries: IndexMap<String, FilterEntry>,
}

impl FilterTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        config::parse_key_table(content)
    }

    /// Parse a table from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        config::parse_key_table_path(path)
    }

    /// Insert an entry; returns false (and keeps the existing one) on a duplicate name
    pub fn insert(&mut self, entry: FilterEntry) -> bool {
        if self.entries.contains_key(&entry.action_name) {
            return false;
        }
        self.entries.insert(entry.action_name.clone(), entry);
        true
    }

    /// Look up an entry by exact action name
    pub fn get(&self, action_name: &str) -> Option<&FilterEntry> {
        self.entries.get(action_name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &FilterEntry> {
        self.entries.values()
    }
}

/// Filter table handle that can be replaced while readers hold snapshots.
///
/// A reload swaps the whole table in one write; an evaluation works on the
/// `Arc` it took, so it sees either the old or the new table, never a mix.
#[derive(Debug, Clone, Default)]
pub struct SharedFilterTable {
    inner: Arc<RwLock<Arc<FilterTable>>>,
}

impl SharedFilterTable {
    pub fn new(table: FilterTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Current table
    pub fn snapshot(&self) -> Arc<FilterTable> {
        Arc::clone(&self.inner.read())
    }

    /// Replace the table
    pub fn replace(&self, table: FilterTable) {
        *self.inner.write() = Arc::new(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_only() {
        let pattern = SourcePattern::new("PRODUCT", ".*").unwrap();
        assert!(pattern.matches("PRODUCT", "TV"));
        assert!(pattern.matches("PRODUCT", ""));
        assert!(!pattern.matches("PRODUCTS", "TV"));
        assert!(!pattern.matches("MY_PRODUCT", "TV"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_group() {
        let pattern = SourcePattern::new("PRODUCT|INVALID_SOURCE", "SLOT_1").unwrap();
        assert!(pattern.matches("PRODUCT", "SLOT_1"));
        assert!(pattern.matches("INVALID_SOURCE", "SLOT_1"));
        assert!(!pattern.matches("PRODUCT_X", "SLOT_1"));
        assert!(!pattern.matches("X_INVALID_SOURCE", "SLOT_1"));
        assert!(!pattern.matches("PRODUCT", "SLOT_12"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(SourcePattern::new("(", ".*").is_err());
        assert!(SourcePattern::new(".*", "[a-").is_err());
    }

    #[test]
    fn test_source_filter_order() {
        let mut filter = SourceFilter::new();
        assert_eq!(filter.first_match("PRODUCT", "TV"), None);

        filter.push(SourcePattern::new("BLUETOOTH", ".*").unwrap());
        filter.push(SourcePattern::new("PRODUCT", "TV|SLOT_0").unwrap());
        filter.push(SourcePattern::new(".*", ".*").unwrap());
        assert_eq!(filter.len(), 3);
        assert_eq!(filter.first_match("PRODUCT", "TV"), Some(1));
        assert_eq!(filter.first_match("PRODUCT", "SLOT_2"), Some(2));
    }

    #[test]
    fn test_table_insert_keeps_first() {
        let mut table = FilterTable::new();
        assert!(table.insert(FilterEntry::new("MUTE_TOGGLE", None, None)));
        assert!(!table.insert(FilterEntry::new(
            "MUTE_TOGGLE",
            Some(SourceFilter::new()),
            None
        )));
        assert_eq!(table.len(), 1);
        assert!(table.get("MUTE_TOGGLE").unwrap().filter.is_none());
        assert!(table.get("mute_toggle").is_none());
    }

    #[test]
    fn test_shared_table_replace() {
        let shared = SharedFilterTable::new(FilterTable::new());
        let before = shared.snapshot();

        let mut table = FilterTable::new();
        table.insert(FilterEntry::new("VOLUME_UP", None, None));
        shared.replace(table);

        // A snapshot taken before the reload keeps the old table
        assert!(before.is_empty());
        assert_eq!(shared.snapshot().len(), 1);
    }
}
