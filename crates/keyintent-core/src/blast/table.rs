// Keyintent Blasted Key Table
// Which keys are forwarded to which legacy device types

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::{self, ConfigError};
use crate::KeyId;

/// Set of `(key, device type)` pairs that are blasted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlastedKeyTable {
    devices: HashMap<KeyId, HashSet<String>>,
}

impl BlastedKeyTable {
    /// Create an empty table (nothing is blasted)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        config::parse_blast_table(content)
    }

    /// Parse a table from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        config::parse_blast_table_path(path)
    }

    /// Mark a key as blasted for a device type
    pub fn insert(&mut self, key_id: KeyId, device_type: impl Into<String>) -> bool {
        self.devices
            .entry(key_id)
            .or_default()
            .insert(device_type.into())
    }

    /// Check if a key is blasted for a device type
    pub fn is_blasted_key(&self, key_id: KeyId, device_type: &str) -> bool {
        self.devices
            .get(&key_id)
            .is_some_and(|devices| devices.contains(device_type))
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.devices.values().map(HashSet::len).sum()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEVICE_TYPE_TV;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = BlastedKeyTable::new();
        assert!(table.is_empty());
        assert!(table.insert(KeyId::VOLUME_UP, DEVICE_TYPE_TV));
        assert!(!table.insert(KeyId::VOLUME_UP, DEVICE_TYPE_TV));
        assert!(table.insert(KeyId::CHANNEL_UP, "DEVICE_TYPE_CBL_SAT"));

        assert_eq!(table.len(), 2);
        assert!(table.is_blasted_key(KeyId::VOLUME_UP, DEVICE_TYPE_TV));
        assert!(!table.is_blasted_key(KeyId::VOLUME_UP, "DEVICE_TYPE_CBL_SAT"));
        assert!(!table.is_blasted_key(KeyId::MUTE, DEVICE_TYPE_TV));
    }

    #[test]
    fn test_from_json() {
        let table = BlastedKeyTable::from_json(
            r#"{ "blastTable": [ { "key": "BOSE_MUTE", "devices": ["DEVICE_TYPE_TV"] } ] }"#,
        )
        .unwrap();
        assert!(table.is_blasted_key(KeyId::MUTE, DEVICE_TYPE_TV));
    }
}
