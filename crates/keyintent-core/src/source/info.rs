// Source Information
//
// Snapshot of the product's sources and the current selection. The engine
// reads this per event; it never owns or mutates the live source list.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Source name of the product's own inputs (TV and the HDMI slots)
pub const PRODUCT_SOURCE: &str = "PRODUCT";

/// Source name reported when nothing is selected
pub const INVALID_SOURCE: &str = "INVALID_SOURCE";

/// Device type of a television
pub const DEVICE_TYPE_TV: &str = "DEVICE_TYPE_TV";

/// Account names of the PRODUCT source
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Serialize, Deserialize,
)]
pub enum ProductSourceSlot {
    #[strum(serialize = "TV")]
    #[serde(rename = "TV")]
    Tv,
    #[strum(serialize = "SLOT_0")]
    #[serde(rename = "SLOT_0")]
    Slot0,
    #[strum(serialize = "SLOT_1")]
    #[serde(rename = "SLOT_1")]
    Slot1,
    #[strum(serialize = "SLOT_2")]
    #[serde(rename = "SLOT_2")]
    Slot2,
}

impl ProductSourceSlot {
    /// Account name used in source items
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ProductSourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration status of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    Available,
    #[default]
    NotConfigured,
    Unavailable,
}

/// Device metadata of a configured source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDetails {
    /// Device type (e.g. "DEVICE_TYPE_TV", "DEVICE_TYPE_CBL_SAT")
    #[serde(default)]
    pub device_type: String,
    /// IR code set of the device
    #[serde(default)]
    pub cicode: Option<String>,
}

/// One entry of the source list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub source_name: String,
    #[serde(default)]
    pub source_account_name: String,
    #[serde(default)]
    pub status: SourceStatus,
    #[serde(default)]
    pub details: Option<SourceDetails>,
}

impl SourceItem {
    /// Create a source item without device details
    pub fn new(source_name: impl Into<String>, source_account_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_account_name: source_account_name.into(),
            status: SourceStatus::NotConfigured,
            details: None,
        }
    }

    /// Create a PRODUCT source item for a slot
    pub fn product(slot: ProductSourceSlot) -> Self {
        Self::new(PRODUCT_SOURCE, slot.name())
    }

    /// Set the status
    pub fn with_status(mut self, status: SourceStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach device details
    pub fn with_details(mut self, device_type: impl Into<String>, cicode: Option<&str>) -> Self {
        self.details = Some(SourceDetails {
            device_type: device_type.into(),
            cicode: cicode.map(str::to_string),
        });
        self
    }

    /// Check if this is one of the product's own inputs
    pub fn is_product(&self) -> bool {
        self.source_name == PRODUCT_SOURCE
    }

    /// Check if this is the given PRODUCT slot
    pub fn is_product_slot(&self, slot: ProductSourceSlot) -> bool {
        self.is_product() && self.source_account_name == slot.name()
    }

    /// Check if the source has been configured
    pub fn is_available(&self) -> bool {
        self.status == SourceStatus::Available
    }

    /// Device type, if details are known
    pub fn device_type(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.device_type.as_str())
    }

    /// IR code set, if details carry one
    pub fn cicode(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.cicode.as_deref())
    }
}

/// The content item currently selected for playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub source: String,
    #[serde(default)]
    pub source_account: String,
}

impl ContentItem {
    pub fn new(source: impl Into<String>, source_account: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_account: source_account.into(),
        }
    }
}

/// Source list plus the now-selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    #[serde(default)]
    pub sources: Vec<SourceItem>,
    #[serde(default)]
    pub now_selection: Option<ContentItem>,
}

impl SourceInfo {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot from a source list
    pub fn with_sources(sources: Vec<SourceItem>) -> Self {
        Self {
            sources,
            now_selection: None,
        }
    }

    /// Replace the now-selection
    pub fn select(&mut self, item: Option<ContentItem>) {
        self.now_selection = item;
    }

    /// Find a source by name and account
    pub fn find_source(&self, source_name: &str, source_account: &str) -> Option<&SourceItem> {
        self.sources
            .iter()
            .find(|s| s.source_name == source_name && s.source_account_name == source_account)
    }

    /// Find a PRODUCT slot
    pub fn find_product_slot(&self, slot: ProductSourceSlot) -> Option<&SourceItem> {
        self.find_source(PRODUCT_SOURCE, slot.name())
    }

    /// Source item behind the now-selection
    pub fn now_selected_source(&self) -> Option<&SourceItem> {
        let selection = self.now_selection.as_ref()?;
        self.find_source(&selection.source, &selection.source_account)
    }

    /// Check if a source has been configured
    pub fn is_source_available(&self, item: &SourceItem) -> bool {
        item.is_available()
    }
}
