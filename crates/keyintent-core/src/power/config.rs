// Keyintent Power Macro Configuration
// What the power macro does, its validation and its JSON persistence

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::source::{ProductSourceSlot, SourceInfo};

/// Power macro errors
#[derive(Debug, thiserror::Error)]
pub enum PowerMacroError {
    #[error("TV is not configured but power on tv requested!")]
    TvNotConfigured,

    #[error("Requested source is not configured!")]
    SourceNotConfigured(ProductSourceSlot),

    #[error("No power on device provided!")]
    NoPowerOnDevice,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Compound power-on macro bound to the power key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerMacro {
    #[serde(default)]
    pub enabled: bool,
    /// Power the TV first and wait for its acknowledgment
    #[serde(default)]
    pub power_on_tv: bool,
    /// Product slot powered after the TV
    #[serde(default)]
    pub power_on_device: Option<ProductSourceSlot>,
}

impl PowerMacro {
    /// Check that every device the macro targets has IR codes
    pub fn validate(&self, sources: &SourceInfo) -> Result<(), PowerMacroError> {
        if self.power_on_tv && !slot_has_cicode(sources, ProductSourceSlot::Tv) {
            return Err(PowerMacroError::TvNotConfigured);
        }

        let device = self.power_on_device.ok_or(PowerMacroError::NoPowerOnDevice)?;
        if !slot_has_cicode(sources, device) {
            return Err(PowerMacroError::SourceNotConfigured(device));
        }

        Ok(())
    }
}

fn slot_has_cicode(sources: &SourceInfo, slot: ProductSourceSlot) -> bool {
    sources
        .find_product_slot(slot)
        .and_then(|source| source.cicode())
        .is_some()
}

/// JSON file holding the persisted power macro
#[derive(Debug, Clone)]
pub struct PowerMacroStore {
    path: PathBuf,
}

impl PowerMacroStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted macro, falling back to a disabled one
    pub fn load(&self) -> PowerMacro {
        match self.try_load() {
            Ok(power_macro) => power_macro,
            Err(e) => {
                log::error!("Power macro persistence error ({}): {}", self.path.display(), e);
                PowerMacro::default()
            }
        }
    }

    /// Load the persisted macro
    pub fn try_load(&self) -> Result<PowerMacro, PowerMacroError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist a macro
    pub fn store(&self, power_macro: &PowerMacro) -> Result<(), PowerMacroError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(power_macro)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Validate a macro against the sources and persist it
    pub fn update(
        &self,
        power_macro: &PowerMacro,
        sources: &SourceInfo,
    ) -> Result<(), PowerMacroError> {
        power_macro.validate(sources)?;
        self.store(power_macro)?;
        log::info!("Stored power macro {:?}", power_macro);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceItem, SourceStatus, DEVICE_TYPE_TV};

    fn sources() -> SourceInfo {
        SourceInfo::with_sources(vec![
            SourceItem::product(ProductSourceSlot::Tv)
                .with_status(SourceStatus::Available)
                .with_details(DEVICE_TYPE_TV, Some("0x1A")),
            SourceItem::product(ProductSourceSlot::Slot1).with_details("DEVICE_TYPE_GAME", None),
            SourceItem::product(ProductSourceSlot::Slot2)
                .with_details("DEVICE_TYPE_CBL_SAT", Some("0x2B")),
        ])
    }

    #[test]
    fn test_json_shape() {
        let power_macro: PowerMacro = serde_json::from_str(
            r#"{ "enabled": true, "powerOnTv": true, "powerOnDevice": "SLOT_2" }"#,
        )
        .unwrap();
        assert!(power_macro.enabled);
        assert!(power_macro.power_on_tv);
        assert_eq!(power_macro.power_on_device, Some(ProductSourceSlot::Slot2));

        let empty: PowerMacro = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PowerMacro::default());
    }

    #[test]
    fn test_validate() {
        let info = sources();
        let mut power_macro = PowerMacro {
            enabled: true,
            power_on_tv: true,
            power_on_device: Some(ProductSourceSlot::Slot2),
        };
        assert!(power_macro.validate(&info).is_ok());

        power_macro.power_on_device = Some(ProductSourceSlot::Slot1);
        assert!(matches!(
            power_macro.validate(&info),
            Err(PowerMacroError::SourceNotConfigured(ProductSourceSlot::Slot1))
        ));

        power_macro.power_on_device = None;
        let err = power_macro.validate(&info).unwrap_err();
        assert_eq!(err.to_string(), "No power on device provided!");

        power_macro.power_on_device = Some(ProductSourceSlot::Slot2);
        assert!(matches!(
            power_macro.validate(&SourceInfo::new()),
            Err(PowerMacroError::TvNotConfigured)
        ));
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist").join("PowerMacro.json");
        let store = PowerMacroStore::new(&path);
        let power_macro = PowerMacro {
            enabled: true,
            power_on_tv: false,
            power_on_device: Some(ProductSourceSlot::Slot0),
        };

        store.store(&power_macro).unwrap();
        assert_eq!(store.load(), power_macro);
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = PowerMacroStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.try_load(), Err(PowerMacroError::Io(_))));
        assert_eq!(store.load(), PowerMacro::default());

        let path = dir.path().join("PowerMacro.json");
        fs::write(&path, "{ not json").unwrap();
        let store = PowerMacroStore::new(&path);
        assert!(matches!(store.try_load(), Err(PowerMacroError::Json(_))));
        assert_eq!(store.load(), PowerMacro::default());
    }

    #[test]
    fn test_update_rejects_invalid_macro() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PowerMacro.json");
        let store = PowerMacroStore::new(&path);
        let power_macro = PowerMacro {
            enabled: true,
            power_on_tv: false,
            power_on_device: None,
        };
        assert!(store.update(&power_macro, &sources()).is_err());
        assert!(!path.exists());
    }
}
