// Keyintent CI-code Tracker
// Publishes the IR code sets of configured sources when they change

use crate::source::SourceInfo;

/// Remembers the last published code set list
#[derive(Debug, Clone, Default)]
pub struct CiCodeTracker {
    last: Vec<String>,
}

impl CiCodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code sets last published
    pub fn last(&self) -> &[String] {
        &self.last
    }

    /// Collect the code sets of available sources.
    ///
    /// Returns the list when it is non-empty and differs from the last one
    /// returned, `None` otherwise.
    pub fn update(&mut self, sources: &SourceInfo) -> Option<Vec<String>> {
        let codes: Vec<String> = sources
            .sources
            .iter()
            .filter(|source| sources.is_source_available(source))
            .filter_map(|source| source.cicode().map(str::to_string))
            .collect();

        if codes.is_empty() || codes == self.last {
            return None;
        }

        log::info!("Source code sets changed: {:?}", codes);
        self.last = codes.clone();
        Some(codes)
    }
}
