// Keyintent Settings Module
// Locations of the configuration files the key path is built from

use std::path::{Path, PathBuf};

/// Settings for keyintent
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/keyintent/settings.toml). Relative paths are resolved against
/// the directory of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Key filter table (JSON)
    keys: Option<PathBuf>,

    /// Blasted key table (JSON)
    blast: Option<PathBuf>,

    /// Source snapshot (JSON)
    sources: Option<PathBuf>,

    /// Persisted power macro (JSON)
    power_macro: Option<PathBuf>,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    paths: Option<PathSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PathSettings {
    #[serde(default)]
    keys: Option<String>,

    #[serde(default)]
    blast: Option<String>,

    #[serde(default)]
    sources: Option<String>,

    #[serde(default)]
    power_macro: Option<String>,
}

impl Settings {
    /// Create a new empty settings object
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            settings.resolve_relative(base);
        }
        settings.source_path = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(paths) = toml_settings.paths {
            settings.keys = parse_path("paths.keys", paths.keys)?;
            settings.blast = parse_path("paths.blast", paths.blast)?;
            settings.sources = parse_path("paths.sources", paths.sources)?;
            settings.power_macro = parse_path("paths.power_macro", paths.power_macro)?;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyintent").join("settings.toml"))
    }

    /// Load from default location (~/.config/keyintent/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Key filter table path
    pub fn keys_path(&self) -> Option<&Path> {
        self.keys.as_deref()
    }

    /// Blasted key table path
    pub fn blast_path(&self) -> Option<&Path> {
        self.blast.as_deref()
    }

    /// Source snapshot path
    pub fn sources_path(&self) -> Option<&Path> {
        self.sources.as_deref()
    }

    /// Power macro persistence path
    pub fn power_macro_path(&self) -> Option<&Path> {
        self.power_macro.as_deref()
    }

    /// Override the key filter table path
    pub fn set_keys_path(&mut self, path: impl Into<PathBuf>) {
        self.keys = Some(path.into());
    }

    /// Override the blasted key table path
    pub fn set_blast_path(&mut self, path: impl Into<PathBuf>) {
        self.blast = Some(path.into());
    }

    /// Override the source snapshot path
    pub fn set_sources_path(&mut self, path: impl Into<PathBuf>) {
        self.sources = Some(path.into());
    }

    /// Reload settings from the file they were loaded from
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }

    fn resolve_relative(&mut self, base: &Path) {
        for path in [
            &mut self.keys,
            &mut self.blast,
            &mut self.sources,
            &mut self.power_macro,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Parse an optional path setting, rejecting empty strings
fn parse_path(name: &str, value: Option<String>) -> Result<Option<PathBuf>, SettingsError> {
    match value {
        Some(s) if s.trim().is_empty() => Err(SettingsError::InvalidValue(format!(
            "{} must not be empty",
            name
        ))),
        Some(s) => Ok(Some(PathBuf::from(s))),
        None => Ok(None),
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Keyintent Settings
# This file tells keyintent where its configuration lives
# Place this file at: ~/.config/keyintent/settings.toml

[paths]
# Key filter table: { "keytable": [ { "action", "filter", "translate" } ] }
keys = "KeyConfiguration.json"

# Keys blasted per device type: { "blastTable": [ { "key", "devices" } ] }
blast = "BlastConfiguration.json"

# Optional source snapshot used by the replay tool
# sources = "Sources.json"

# Persisted power macro
power_macro = "PowerMacro.json"
"#
}
