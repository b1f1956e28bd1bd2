use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Key values reported by the key controller, by name.
///
/// `FD ..= USB_NET_SVR` is the synthetic chord range: the controller folds a
/// press-and-hold combination into one of these values.
const KEY_VALUES: &[(&str, u32)] = &[
    ("INVALID", 0),
    ("POWER", 1),
    ("VOLUME_UP", 2),
    ("VOLUME_DOWN", 3),
    ("MUTE", 4),
    ("PLAY_PAUSE", 5),
    ("NEXT_TRACK", 6),
    ("PREV_TRACK", 7),
    ("TV_INPUT", 8),
    ("CHANNEL_UP", 9),
    ("CHANNEL_DOWN", 10),
    ("NUMBER_0", 11),
    ("NUMBER_1", 12),
    ("NUMBER_2", 13),
    ("NUMBER_3", 14),
    ("NUMBER_4", 15),
    ("NUMBER_5", 16),
    ("NUMBER_6", 17),
    ("NUMBER_7", 18),
    ("NUMBER_8", 19),
    ("NUMBER_9", 20),
    ("UP", 21),
    ("DOWN", 22),
    ("LEFT", 23),
    ("RIGHT", 24),
    ("OK", 25),
    ("MENU", 26),
    ("EXIT", 27),
    ("GUIDE", 28),
    ("INFO", 29),
    ("BLUETOOTH", 30),
    ("AUX", 31),
    ("ACTION", 32),
    ("PRESET_1", 33),
    ("PRESET_2", 34),
    ("PRESET_3", 35),
    ("PRESET_4", 36),
    ("PRESET_5", 37),
    ("PRESET_6", 38),
    ("DVR", 39),
    ("RECORD", 40),
    ("FAST_FORWARD", 41),
    ("REWIND", 42),
    ("STOP", 43),
    ("RED", 44),
    ("GREEN", 45),
    ("YELLOW", 46),
    ("BLUE", 47),
    ("SOUNDTOUCH", 48),
    ("GAME", 49),
    ("BD_DVD", 50),
    ("CBL_SAT", 51),
    ("ASSERT_ON", 60),
    ("ASSERT_OFF", 61),
    ("FD", 100),
    ("MANUAL_UPDATE", 101),
    ("AP_SETUP", 102),
    ("TOGGLE_WIFI", 103),
    ("SYSTEM_INFO", 104),
    ("LOW_POWER", 105),
    ("DISABLE_NETWORKING", 106),
    ("PAIRING_CLEAR", 107),
    ("DEMO_MODE", 108),
    ("ADAPTIQ", 109),
    ("USB_NET_SVR", 110),
];

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_values.rs");
    let mut f = File::create(&dest_path).unwrap();

    // Generate the KeyId newtype wrapper
    writeln!(
        f,
        r#"
/// A key value as reported by the key controller.
///
/// This is a newtype wrapper around u32 for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct KeyId(pub u32);

impl KeyId {{
    /// Get the raw numeric key value
    pub fn value(self) -> u32 {{
        self.0
    }}

    /// Get the name of this key
    pub fn name(self) -> &'static str {{
        key_name(self.0)
    }}
}}

impl From<u32> for KeyId {{
    fn from(value: u32) -> Self {{
        KeyId(value)
    }}
}}

impl From<KeyId> for u32 {{
    fn from(key: KeyId) -> Self {{
        key.0
    }}
}}

impl fmt::Display for KeyId {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}
"#
    )
    .unwrap();

    writeln!(f, "#[allow(missing_docs)]\nimpl KeyId {{").unwrap();
    for (name, value) in KEY_VALUES {
        writeln!(f, "    pub const {}: KeyId = KeyId({});", name, value).unwrap();
    }
    writeln!(f, "}}\n").unwrap();

    writeln!(f, "/// Name/value pairs for every known key").unwrap();
    writeln!(f, "pub const KEY_TABLE: &[(&str, KeyId)] = &[").unwrap();
    for (name, value) in KEY_VALUES {
        writeln!(f, "    (\"{}\", KeyId({})),", name, value).unwrap();
    }
    writeln!(f, "];").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
