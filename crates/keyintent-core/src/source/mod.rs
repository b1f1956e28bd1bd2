//! Source context module
//!
//! This module describes the selectable sources the key path consults.

mod info;

pub use info::{
    ContentItem, ProductSourceSlot, SourceDetails, SourceInfo, SourceItem, SourceStatus,
    DEVICE_TYPE_TV, INVALID_SOURCE, PRODUCT_SOURCE,
};
