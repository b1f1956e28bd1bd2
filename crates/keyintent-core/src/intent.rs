// Keyintent Intents
// Logical product actions and their configuration names

use std::fmt;
use std::str::FromStr;

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Actions shared by every product.
///
/// Names are the upper snake case strings used in the key configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CommonIntent {
    PlayPause,
    NextTrack,
    PrevTrack,
    NetworkStandby,
    SendToApMode,
    ManualUpdate,
    DisableNetworking,
    FactoryReset,
    LowPowerStandby,
    CarouselDiscoverableConnectToLast,
    SendToDiscoverable,
    ClearPairingList,
    VolumeUp,
    VolumeDown,
    VolumeRampUp,
    VolumeRampDown,
    VolumeRampUpCancel,
    VolumeRampDownCancel,
    VoiceCarousel,
    #[strum(serialize = "PRESET_STORE_1")]
    PresetStore1,
    #[strum(serialize = "PRESET_STORE_2")]
    PresetStore2,
    #[strum(serialize = "PRESET_STORE_3")]
    PresetStore3,
    #[strum(serialize = "PRESET_STORE_4")]
    PresetStore4,
    #[strum(serialize = "PRESET_STORE_5")]
    PresetStore5,
    #[strum(serialize = "PRESET_STORE_6")]
    PresetStore6,
    #[strum(serialize = "PRESET_SELECT_1")]
    PresetSelect1,
    #[strum(serialize = "PRESET_SELECT_2")]
    PresetSelect2,
    #[strum(serialize = "PRESET_SELECT_3")]
    PresetSelect3,
    #[strum(serialize = "PRESET_SELECT_4")]
    PresetSelect4,
    #[strum(serialize = "PRESET_SELECT_5")]
    PresetSelect5,
    #[strum(serialize = "PRESET_SELECT_6")]
    PresetSelect6,
}

/// Actions specific to this product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomIntent {
    PowerToggle,
    PowerOn,
    PowerOff,
    MuteToggle,
    MuteOn,
    MuteOff,
    TvInput,
    AuxIn,
    SetupBluetooth,
    SystemInfo,
    AdaptIq,
    ToggleWifiRadio,
    ManualUpdateCountdown,
    FactoryResetCountdown,
    ManualSetupCountdown,
    ToggleWifiRadioCountdown,
    SystemInfoCountdown,
    ManualUpdateCancel,
    FactoryResetCancel,
    ManualSetupCancel,
    ToggleWifiRadioCancel,
    SystemInfoCancel,
}

/// An intent from either enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Common(CommonIntent),
    Custom(CustomIntent),
}

impl Intent {
    /// Resolve an action name, checking the common names before the custom ones
    pub fn resolve(name: &str) -> Option<Self> {
        CommonIntent::from_str(name)
            .map(Intent::Common)
            .or_else(|_| CustomIntent::from_str(name).map(Intent::Custom))
            .ok()
    }

    /// Configuration name of this intent
    pub fn name(self) -> &'static str {
        match self {
            Intent::Common(intent) => intent.into(),
            Intent::Custom(intent) => intent.into(),
        }
    }
}

impl From<CommonIntent> for Intent {
    fn from(intent: CommonIntent) -> Self {
        Intent::Common(intent)
    }
}

impl From<CustomIntent> for Intent {
    fn from(intent: CustomIntent) -> Self {
        Intent::Custom(intent)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::resolve(s).ok_or_else(|| format!("Unknown intent: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names() {
        assert_eq!(Intent::from(CommonIntent::VolumeUp).name(), "VOLUME_UP");
        assert_eq!(Intent::from(CommonIntent::PresetSelect3).name(), "PRESET_SELECT_3");
        assert_eq!(Intent::from(CustomIntent::TvInput).name(), "TV_INPUT");
        assert_eq!(Intent::from(CustomIntent::AdaptIq).to_string(), "ADAPT_IQ");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(Intent::resolve("PLAY_PAUSE"), Some(Intent::Common(CommonIntent::PlayPause)));
        assert_eq!(Intent::resolve("MUTE_TOGGLE"), Some(Intent::Custom(CustomIntent::MuteToggle)));
        assert_eq!(Intent::resolve("NOT_AN_INTENT"), None);
        assert!("play_pause".parse::<Intent>().is_err());
    }

    #[test]
    fn test_every_name_resolves_to_itself() {
        for intent in CommonIntent::iter().map(Intent::from) {
            assert_eq!(Intent::resolve(intent.name()), Some(intent));
        }
        for intent in CustomIntent::iter().map(Intent::from) {
            assert_eq!(Intent::resolve(intent.name()), Some(intent));
        }
    }

    #[test]
    fn test_enumerations_do_not_overlap() {
        for common in CommonIntent::iter() {
            let name: &'static str = common.into();
            assert!(CustomIntent::from_str(name).is_err(), "{} in both tables", name);
        }
    }
}
