// Keyintent Source Filter Engine
//
// Decides whether an intent is dropped or rewritten for the active source.
// Lookups are fail-open: an intent the table does not know always passes.

use std::fmt;

use super::table::SharedFilterTable;
use super::FilterTable;
use crate::Intent;

/// Result of filtering an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Dispatch the intent unchanged
    Pass,
    /// Do not dispatch the intent
    Drop,
    /// Dispatch this intent instead
    Translate(Intent),
}

impl FilterOutcome {
    /// Check if the intent is suppressed
    pub fn is_drop(self) -> bool {
        matches!(self, FilterOutcome::Drop)
    }
}

impl fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOutcome::Pass => write!(f, "pass"),
            FilterOutcome::Drop => write!(f, "drop"),
            FilterOutcome::Translate(intent) => write!(f, "translate to {}", intent),
        }
    }
}

/// Evaluates intents against the filter table
#[derive(Debug, Clone, Default)]
pub struct SourceFilterEngine {
    table: SharedFilterTable,
}

impl SourceFilterEngine {
    /// Create an engine over a fixed table
    pub fn new(table: FilterTable) -> Self {
        Self::with_shared(SharedFilterTable::new(table))
    }

    /// Create an engine over a reloadable table
    pub fn with_shared(table: SharedFilterTable) -> Self {
        Self { table }
    }

    /// Handle used to reload the table
    pub fn table(&self) -> &SharedFilterTable {
        &self.table
    }

    /// Evaluate an intent by name for the active source and account
    pub fn evaluate(
        &self,
        intent_name: &str,
        active_source: &str,
        active_account: &str,
    ) -> FilterOutcome {
        let table = self.table.snapshot();

        let Some(entry) = table.get(intent_name) else {
            log::warn!("No key table entry for '{}', passing it", intent_name);
            return FilterOutcome::Pass;
        };

        let Some(filter) = &entry.filter else {
            return match entry.translate {
                Some(intent) => {
                    log::debug!("'{}' translated to '{}' unconditionally", intent_name, intent);
                    FilterOutcome::Translate(intent)
                }
                None => FilterOutcome::Pass,
            };
        };

        let Some(index) = filter.first_match(active_source, active_account) else {
            return FilterOutcome::Pass;
        };

        let outcome = match entry.translate {
            Some(intent) => FilterOutcome::Translate(intent),
            None => FilterOutcome::Drop,
        };
        log::debug!(
            "'{}' in {}/{} matched filter pair {}: {}",
            intent_name,
            active_source,
            active_account,
            index,
            outcome
        );
        outcome
    }

    /// Evaluate an intent for the active source and account
    pub fn evaluate_intent(
        &self,
        intent: Intent,
        active_source: &str,
        active_account: &str,
    ) -> FilterOutcome {
        self.evaluate(intent.name(), active_source, active_account)
    }
}
