// Keyintent Key Type
// Represents a single key value from the key controller

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/key_values.rs"));

/// Key values the controller synthesizes when it resolves a chord.
///
/// The release of one of these keys marks the start of the chord recovery window.
pub const CHORD_KEY_RANGE: RangeInclusive<KeyId> = KeyId::FD..=KeyId::USB_NET_SVR;

impl KeyId {
    /// Returns true if this key is a synthetic chord value
    pub fn is_chord_key(self) -> bool {
        CHORD_KEY_RANGE.contains(&self)
    }
}

/// Display name for a key value
pub fn key_name(value: u32) -> &'static str {
    KEY_TABLE
        .iter()
        .find(|(_, key)| key.0 == value)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

/// Try to parse a key name to a key value
///
/// Names are case-insensitive and may carry the controller's `BOSE_` prefix.
pub fn key_from_name(name: &str) -> Option<KeyId> {
    let name_upper = name.trim().to_uppercase();
    let bare = name_upper.strip_prefix("BOSE_").unwrap_or(&name_upper);
    KEY_TABLE
        .iter()
        .find(|(n, _)| *n == bare)
        .map(|(_, key)| *key)
}

impl FromStr for KeyId {
    type Err = String;

    /// Accepts a key name, a decimal value or a `0x` hex value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            return u32::from_str_radix(hex, 16)
                .map(KeyId)
                .map_err(|_| format!("Unknown key: {}", s));
        }
        if let Ok(value) = trimmed.parse::<u32>() {
            return Ok(KeyId(value));
        }
        key_from_name(trimmed).ok_or_else(|| format!("Unknown key: {}", s))
    }
}
