use std::fmt;
use std::str::FromStr;

/// Represents the state transition carried by a key event.
///
/// The key controller only reports edges:
///   0 == 'released'
///   1 == 'pressed'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

impl KeyState {
    /// Returns true if this is a PRESSED event
    pub fn is_pressed(self) -> bool {
        matches!(self, KeyState::Pressed)
    }

    /// Returns true if this is a RELEASED event
    pub fn is_released(self) -> bool {
        matches!(self, KeyState::Released)
    }

    /// Create KeyState from i32 value (from the controller)
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            _ => None,
        }
    }

    /// Convert KeyState to its i32 representation
    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyState::Released => write!(f, "RELEASED"),
            KeyState::Pressed => write!(f, "PRESSED"),
        }
    }
}

impl FromStr for KeyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pressed" | "press" | "down" | "1" => Ok(KeyState::Pressed),
            "released" | "release" | "up" | "0" => Ok(KeyState::Released),
            _ => Err(format!("Unknown key state: {}", s)),
        }
    }
}

/// Transport a key event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum KeyOrigin {
    Console = 0,
    Capsense = 1,
    Ir = 2,
    Rf = 3,
    Cec = 4,
    Network = 5,
    Tap = 6,
}

impl KeyOrigin {
    /// All origins, in numeric order
    pub const ALL: [KeyOrigin; 7] = [
        KeyOrigin::Console,
        KeyOrigin::Capsense,
        KeyOrigin::Ir,
        KeyOrigin::Rf,
        KeyOrigin::Cec,
        KeyOrigin::Network,
        KeyOrigin::Tap,
    ];

    /// Create KeyOrigin from i32 value (from the controller)
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|origin| origin.to_i32() == value)
    }

    /// Convert KeyOrigin to its i32 representation
    pub fn to_i32(self) -> i32 {
        self as i32
    }

    /// Controller name of this origin
    pub fn name(self) -> &'static str {
        match self {
            KeyOrigin::Console => "CONSOLE",
            KeyOrigin::Capsense => "CAPSENSE",
            KeyOrigin::Ir => "IR",
            KeyOrigin::Rf => "RF",
            KeyOrigin::Cec => "CEC",
            KeyOrigin::Network => "NETWORK",
            KeyOrigin::Tap => "TAP",
        }
    }
}

impl fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KeyOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let bare = upper.strip_prefix("KEY_ORIGIN_").unwrap_or(&upper);
        Self::ALL
            .iter()
            .copied()
            .find(|origin| origin.name() == bare)
            .ok_or_else(|| format!("Unknown key origin: {}", s))
    }
}
