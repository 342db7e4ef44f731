// Titan IME Input Layer - On-screen Keys
// Codes delivered by the on-screen keyboard view

use std::fmt;

/// A key pressed on the on-screen keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftKey {
    /// Toggle the shifted symbol layout
    Shift,
    /// Switch between the base layer and the symbols
    ModeChange,
    /// Close the keyboard
    Cancel,
    CursorLeft,
    CursorRight,
    /// A printable glyph
    Char(char),
}

impl SoftKey {
    pub const SHIFT_CODE: i32 = -1;
    pub const MODE_CHANGE_CODE: i32 = -2;
    pub const CANCEL_CODE: i32 = -3;
    pub const CURSOR_LEFT_CODE: i32 = 1;
    pub const CURSOR_RIGHT_CODE: i32 = 2;

    /// Decode a view key code; other negative codes and invalid code points
    /// have no meaning to the input method.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::SHIFT_CODE => Some(SoftKey::Shift),
            Self::MODE_CHANGE_CODE => Some(SoftKey::ModeChange),
            Self::CANCEL_CODE => Some(SoftKey::Cancel),
            Self::CURSOR_LEFT_CODE => Some(SoftKey::CursorLeft),
            Self::CURSOR_RIGHT_CODE => Some(SoftKey::CursorRight),
            code => u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .filter(|ch| !ch.is_control())
                .map(SoftKey::Char),
        }
    }
}

impl fmt::Display for SoftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftKey::Shift => write!(f, "shift"),
            SoftKey::ModeChange => write!(f, "mode_change"),
            SoftKey::Cancel => write!(f, "cancel"),
            SoftKey::CursorLeft => write!(f, "cursor_left"),
            SoftKey::CursorRight => write!(f, "cursor_right"),
            SoftKey::Char(ch) => write!(f, "{:?}", ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(SoftKey::from_code(-1), Some(SoftKey::Shift));
        assert_eq!(SoftKey::from_code(-2), Some(SoftKey::ModeChange));
        assert_eq!(SoftKey::from_code(-3), Some(SoftKey::Cancel));
        assert_eq!(SoftKey::from_code(1), Some(SoftKey::CursorLeft));
        assert_eq!(SoftKey::from_code(2), Some(SoftKey::CursorRight));
        assert_eq!(SoftKey::from_code('@' as i32), Some(SoftKey::Char('@')));
        assert_eq!(SoftKey::from_code(0x20ac), Some(SoftKey::Char('€')));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(SoftKey::from_code(-5), None);
        assert_eq!(SoftKey::from_code(0), None);
        assert_eq!(SoftKey::from_code(0xd800), None);
    }
}
