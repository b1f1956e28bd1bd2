// Keyintent Config Parser - JSON with Serde
// Parses the key filter table, the blast table and source snapshots

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::blast::BlastedKeyTable;
use crate::filter::{FilterEntry, FilterTable, SourceFilter, SourcePattern};
use crate::source::SourceInfo;
use crate::{Intent, KeyId};

/// Configuration parser errors
///
/// Every variant is fatal at load time: the key path never runs with a
/// partially understood table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid pattern '{pattern}' in entry '{action}': {source}")]
    InvalidPattern {
        action: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown intent '{translate}' in entry '{action}'")]
    UnknownIntent { action: String, translate: String },

    #[error("Missing field: {0}")]
    MissingField(String),
}

/// Root of the key filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeyTableJson {
    #[serde(default)]
    pub keytable: Vec<KeyTableEntryJson>,
}

/// One action entry of the key filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeyTableEntryJson {
    /// Action name, matched exactly against intent names
    pub action: String,

    /// Sources in which the action is filtered
    #[serde(default)]
    pub filter: Option<FilterJson>,

    /// Replacement action when the filter matches
    #[serde(default)]
    pub translate: Option<String>,
}

/// Filter part of an action entry
#[derive(Debug, Clone, Deserialize)]
pub struct FilterJson {
    #[serde(default)]
    pub sources: Vec<SourcePatternJson>,
}

/// Source/account regex pair
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePatternJson {
    pub source_name: String,
    pub source_account_name: String,
}

/// Root of the blast configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastTableJson {
    #[serde(default)]
    pub blast_table: Vec<BlastEntryJson>,
}

/// Key and the device types it is blasted for
#[derive(Debug, Clone, Deserialize)]
pub struct BlastEntryJson {
    pub key: BlastKeyJson,
    #[serde(default)]
    pub devices: Vec<String>,
}

/// Key reference in the blast table (supports both generated and friendly files)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BlastKeyJson {
    /// Raw key value
    Value(u32),

    /// Key name
    Name(String),
}

impl KeyTableJson {
    /// Convert parsed JSON to a filter table, compiling every pattern
    pub fn to_filter_table(&self) -> Result<FilterTable, ConfigError> {
        let mut table = FilterTable::new();

        for entry in &self.keytable {
            if entry.action.trim().is_empty() {
                return Err(ConfigError::MissingField("keytable[].action".to_string()));
            }

            let filter = match &entry.filter {
                Some(filter) => {
                    let mut patterns = SourceFilter::new();
                    for pair in &filter.sources {
                        patterns.push(compile_pair(&entry.action, pair)?);
                    }
                    Some(patterns)
                }
                None => None,
            };

            let translate = match &entry.translate {
                Some(name) => Some(Intent::resolve(name).ok_or_else(|| {
                    ConfigError::UnknownIntent {
                        action: entry.action.clone(),
                        translate: name.clone(),
                    }
                })?),
                None => None,
            };

            let action = entry.action.clone();
            if !table.insert(FilterEntry::new(action.clone(), filter, translate)) {
                log::warn!("Duplicate key table entry '{}' ignored", action);
            }
        }

        log::debug!("Loaded key filter table with {} entries", table.len());
        Ok(table)
    }
}

impl BlastTableJson {
    /// Convert parsed JSON to the blasted key table
    pub fn to_blasted_key_table(&self) -> Result<BlastedKeyTable, ConfigError> {
        let mut table = BlastedKeyTable::new();

        for entry in &self.blast_table {
            let key = match &entry.key {
                BlastKeyJson::Value(value) => KeyId(*value),
                BlastKeyJson::Name(name) => parse_key(name)?,
            };
            for device in &entry.devices {
                table.insert(key, device.clone());
            }
        }

        log::debug!("Loaded blast table with {} key/device pairs", table.len());
        Ok(table)
    }
}

fn compile_pair(action: &str, pair: &SourcePatternJson) -> Result<SourcePattern, ConfigError> {
    let invalid = |pattern: &str, source: regex::Error| ConfigError::InvalidPattern {
        action: action.to_string(),
        pattern: pattern.to_string(),
        source,
    };

    let source = SourcePattern::compile(&pair.source_name)
        .map_err(|e| invalid(&pair.source_name, e))?;
    let account = SourcePattern::compile(&pair.source_account_name)
        .map_err(|e| invalid(&pair.source_account_name, e))?;
    Ok(SourcePattern::from_regexes(source, account))
}

/// Parse a key name or value
pub fn parse_key(s: &str) -> Result<KeyId, ConfigError> {
    s.parse::<KeyId>().map_err(ConfigError::InvalidKey)
}

/// Parse a key filter table from a JSON string
pub fn parse_key_table(content: &str) -> Result<FilterTable, ConfigError> {
    let json: KeyTableJson = serde_json::from_str(content)?;
    json.to_filter_table()
}

/// Parse a key filter table from a JSON file
pub fn parse_key_table_path<P: AsRef<Path>>(path: P) -> Result<FilterTable, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_key_table(&content)
}

/// Parse a blast table from a JSON string
pub fn parse_blast_table(content: &str) -> Result<BlastedKeyTable, ConfigError> {
    let json: BlastTableJson = serde_json::from_str(content)?;
    json.to_blasted_key_table()
}

/// Parse a blast table from a JSON file
pub fn parse_blast_table_path<P: AsRef<Path>>(path: P) -> Result<BlastedKeyTable, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_blast_table(&content)
}

/// Parse a source snapshot from a JSON file
pub fn parse_sources_path<P: AsRef<Path>>(path: P) -> Result<SourceInfo, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CustomIntent;

    #[test]
    fn test_parse_key_table() {
        let json = r#"{
            "keytable": [
                {
                    "action": "VOLUME_UP",
                    "filter": { "sources": [ { "sourceName": "PRODUCT", "sourceAccountName": "SLOT_.*" } ] }
                },
                {
                    "action": "POWER_TOGGLE",
                    "filter": { "sources": [ { "sourceName": "INVALID_SOURCE", "sourceAccountName": ".*" } ] },
                    "translate": "POWER_ON"
                },
                { "action": "PLAY_PAUSE" }
            ]
        }"#;

        let table = parse_key_table(json).unwrap();
        assert_eq!(table.len(), 3);

        let power = table.get("POWER_TOGGLE").unwrap();
        assert_eq!(power.translate, Some(Intent::Custom(CustomIntent::PowerOn)));
        assert!(power.filter.is_some());
        assert!(table.get("PLAY_PAUSE").unwrap().filter.is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = parse_key_table("{}").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        let json = r#"{ "keytable": [ { "action": "MUTE_TOGGLE",
            "filter": { "sources": [ { "sourceName": "(PRODUCT", "sourceAccountName": ".*" } ] } } ] }"#;
        match parse_key_table(json) {
            Err(ConfigError::InvalidPattern { action, pattern, .. }) => {
                assert_eq!(action, "MUTE_TOGGLE");
                assert_eq!(pattern, "(PRODUCT");
            }
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_account_regex_reported() {
        let json = r#"{ "keytable": [ { "action": "MUTE_TOGGLE",
            "filter": { "sources": [ { "sourceName": "PRODUCT", "sourceAccountName": "[" } ] } } ] }"#;
        match parse_key_table(json) {
            Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "["),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let json = r#"{ "keytable": [ { "action": "MUTE_TOGGLE",
            "filter": { "sources": [ { "sourceName": "PRODUCT" } ] } } ] }"#;
        assert!(matches!(parse_key_table(json), Err(ConfigError::JsonParse(_))));

        let json = r#"{ "keytable": [ { "action": "" } ] }"#;
        assert!(matches!(parse_key_table(json), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_unknown_translate_is_fatal() {
        let json = r#"{ "keytable": [ { "action": "MUTE_TOGGLE", "translate": "NOPE" } ] }"#;
        assert!(matches!(
            parse_key_table(json),
            Err(ConfigError::UnknownIntent { .. })
        ));
    }

    #[test]
    fn test_duplicate_action_first_wins() {
        let json = r#"{ "keytable": [
            { "action": "MUTE_TOGGLE", "translate": "MUTE_ON" },
            { "action": "MUTE_TOGGLE", "translate": "MUTE_OFF" }
        ] }"#;
        let table = parse_key_table(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("MUTE_TOGGLE").unwrap().translate,
            Some(Intent::Custom(CustomIntent::MuteOn))
        );
    }

    #[test]
    fn test_parse_blast_table() {
        let json = r#"{
            "blastTable": [
                { "key": "VOLUME_UP", "devices": ["DEVICE_TYPE_TV", "DEVICE_TYPE_CBL_SAT"] },
                { "key": 9, "devices": ["DEVICE_TYPE_CBL_SAT"] }
            ]
        }"#;
        let table = parse_blast_table(json).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_blasted_key(KeyId::VOLUME_UP, "DEVICE_TYPE_TV"));
        assert!(table.is_blasted_key(KeyId::CHANNEL_UP, "DEVICE_TYPE_CBL_SAT"));
        assert!(!table.is_blasted_key(KeyId::CHANNEL_UP, "DEVICE_TYPE_TV"));
    }

    #[test]
    fn test_blast_table_unknown_key() {
        let json = r#"{ "blastTable": [ { "key": "WARP_DRIVE", "devices": ["DEVICE_TYPE_TV"] } ] }"#;
        assert!(matches!(parse_blast_table(json), Err(ConfigError::InvalidKey(_))));
    }
}
