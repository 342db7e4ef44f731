use std::fmt;

/// Direction of a physical key event.
///
/// Auto-repeat is not a separate state for the input method: a repeated
/// key is just another key-down delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    Down,
    Up,
}

impl KeyDirection {
    /// Returns true for key-down (including auto-repeat)
    pub fn is_down(self) -> bool {
        matches!(self, KeyDirection::Down)
    }

    /// Returns true for key-up
    pub fn is_up(self) -> bool {
        matches!(self, KeyDirection::Up)
    }

    /// Create a direction from an evdev value.
    ///
    ///   0 == 'released'
    ///   1 == 'pressed'
    ///   2 == 'repeated'
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyDirection::Up),
            1 | 2 => Some(KeyDirection::Down),
            _ => None,
        }
    }
}

impl fmt::Display for KeyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDirection::Down => write!(f, "down"),
            KeyDirection::Up => write!(f, "up"),
        }
    }
}
