use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// (constant name, Linux input-event code, extra lookup aliases)
const KEYS: &[(&str, u16, &[&str])] = &[
    ("ESC", 1, &["ESCAPE"]),
    ("KEY_1", 2, &["1"]),
    ("KEY_2", 3, &["2"]),
    ("KEY_3", 4, &["3"]),
    ("KEY_4", 5, &["4"]),
    ("KEY_5", 6, &["5"]),
    ("KEY_6", 7, &["6"]),
    ("KEY_7", 8, &["7"]),
    ("KEY_8", 9, &["8"]),
    ("KEY_9", 10, &["9"]),
    ("KEY_0", 11, &["0"]),
    ("MINUS", 12, &[]),
    ("EQUAL", 13, &[]),
    ("BACKSPACE", 14, &[]),
    ("TAB", 15, &[]),
    ("Q", 16, &[]),
    ("W", 17, &[]),
    ("E", 18, &[]),
    ("R", 19, &[]),
    ("T", 20, &[]),
    ("Y", 21, &[]),
    ("U", 22, &[]),
    ("I", 23, &[]),
    ("O", 24, &[]),
    ("P", 25, &[]),
    ("LEFT_BRACE", 26, &[]),
    ("RIGHT_BRACE", 27, &[]),
    ("ENTER", 28, &["RETURN"]),
    ("LEFT_CTRL", 29, &["LCTRL"]),
    ("A", 30, &[]),
    ("S", 31, &[]),
    ("D", 32, &[]),
    ("F", 33, &[]),
    ("G", 34, &[]),
    ("H", 35, &[]),
    ("J", 36, &[]),
    ("K", 37, &[]),
    ("L", 38, &[]),
    ("SEMICOLON", 39, &[]),
    ("APOSTROPHE", 40, &[]),
    ("GRAVE", 41, &[]),
    ("LEFT_SHIFT", 42, &["LSHIFT"]),
    ("BACKSLASH", 43, &[]),
    ("Z", 44, &[]),
    ("X", 45, &[]),
    ("C", 46, &[]),
    ("V", 47, &[]),
    ("B", 48, &[]),
    ("N", 49, &[]),
    ("M", 50, &[]),
    ("COMMA", 51, &[]),
    ("DOT", 52, &["PERIOD"]),
    ("SLASH", 53, &[]),
    ("RIGHT_SHIFT", 54, &["RSHIFT"]),
    ("LEFT_ALT", 56, &["LALT"]),
    ("SPACE", 57, &[]),
    ("CAPSLOCK", 58, &[]),
    ("F1", 59, &[]),
    ("F2", 60, &[]),
    ("F3", 61, &[]),
    ("F4", 62, &[]),
    ("F5", 63, &[]),
    ("F6", 64, &[]),
    ("F7", 65, &[]),
    ("F8", 66, &[]),
    ("F9", 67, &[]),
    ("F10", 68, &[]),
    ("F11", 87, &[]),
    ("F12", 88, &[]),
    ("RIGHT_CTRL", 97, &["RCTRL"]),
    ("RIGHT_ALT", 100, &["RALT"]),
    ("HOME", 102, &[]),
    ("UP", 103, &[]),
    ("PAGE_UP", 104, &[]),
    ("LEFT", 105, &[]),
    ("RIGHT", 106, &[]),
    ("END", 107, &[]),
    ("DOWN", 108, &[]),
    ("PAGE_DOWN", 109, &[]),
    ("INSERT", 110, &[]),
    ("DELETE", 111, &["FORWARD_DELETE"]),
    ("LEFT_META", 125, &[]),
    ("RIGHT_META", 126, &[]),
    ("COMPOSE", 127, &[]),
    ("MENU", 139, &[]),
    ("BACK", 158, &[]),
    ("FN", 0x1d0, &[]),
];

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_codes.rs");
    let mut f = File::create(&dest_path).unwrap();

    // Generate the Key newtype wrapper
    writeln!(
        f,
        r#"
/// Represents a single physical key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// The numeric values match Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl From<u16> for Key {{
    fn from(code: u16) -> Self {{
        Key(code)
    }}
}}

impl From<Key> for u16 {{
    fn from(key: Key) -> Self {{
        key.0
    }}
}}

impl fmt::Display for Key {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}

impl FromStr for Key {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        key_from_name(s).ok_or_else(|| format!("Unknown key: {{}}", s))
    }}
}}
"#
    )
    .unwrap();

    // Named constants
    writeln!(f, "impl Key {{").unwrap();
    for (name, code, _) in KEYS {
        writeln!(f, "    pub const {}: Key = Key({});", name, code).unwrap();
    }
    writeln!(f, "}}\n").unwrap();

    // Code -> display name
    writeln!(f, "/// Display name for a key code").unwrap();
    writeln!(f, "pub fn key_name(code: u16) -> &'static str {{").unwrap();
    writeln!(f, "    match code {{").unwrap();
    for (name, code, _) in KEYS {
        writeln!(f, "        {} => \"{}\",", code, name).unwrap();
    }
    writeln!(f, "        _ => \"UNKNOWN\",").unwrap();
    writeln!(f, "    }}\n}}\n").unwrap();

    // Name or alias -> key
    writeln!(f, "/// Try to parse a key name (or alias) to a key code").unwrap();
    writeln!(f, "pub fn key_from_name(name: &str) -> Option<Key> {{").unwrap();
    writeln!(f, "    match name.to_uppercase().as_str() {{").unwrap();
    for (name, code, aliases) in KEYS {
        let mut patterns = vec![format!("\"{}\"", name)];
        patterns.extend(aliases.iter().map(|a| format!("\"{}\"", a)));
        writeln!(f, "        {} => Some(Key({})),", patterns.join(" | "), code).unwrap();
    }
    writeln!(f, "        _ => None,").unwrap();
    writeln!(f, "    }}\n}}").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
