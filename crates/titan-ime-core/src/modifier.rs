// Titan IME Modifier System
// Modifier kinds, their physical keys, and modifier masks for forwarded chords

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::Key;

/// A modifier the input method tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
pub enum ModifierKind {
    Shift,
    Alt,
    Ctrl,
}

impl ModifierKind {
    /// Physical keys that act as this modifier.
    ///
    /// The configurable Ctrl alias is not listed here; the processor
    /// resolves it from its own configuration.
    pub fn keys(self) -> &'static [Key] {
        match self {
            ModifierKind::Shift => &[Key::LEFT_SHIFT, Key::RIGHT_SHIFT],
            ModifierKind::Alt => &[Key::LEFT_ALT, Key::RIGHT_ALT],
            ModifierKind::Ctrl => &[Key::LEFT_CTRL, Key::RIGHT_CTRL],
        }
    }

    /// Get the modifier a physical key belongs to
    pub fn from_key(key: Key) -> Option<ModifierKind> {
        match key {
            Key::LEFT_SHIFT | Key::RIGHT_SHIFT => Some(ModifierKind::Shift),
            Key::LEFT_ALT | Key::RIGHT_ALT => Some(ModifierKind::Alt),
            Key::LEFT_CTRL | Key::RIGHT_CTRL => Some(ModifierKind::Ctrl),
            _ => None,
        }
    }

    /// The opposite lockable modifier (Shift <-> Alt)
    pub fn opposite(self) -> Option<ModifierKind> {
        match self {
            ModifierKind::Shift => Some(ModifierKind::Alt),
            ModifierKind::Alt => Some(ModifierKind::Shift),
            ModifierKind::Ctrl => None,
        }
    }

    /// The mask bit for this modifier
    pub fn mask(self) -> ModifierMask {
        match self {
            ModifierKind::Shift => ModifierMask::SHIFT,
            ModifierKind::Alt => ModifierMask::ALT,
            ModifierKind::Ctrl => ModifierMask::CTRL,
        }
    }
}

/// Set of modifiers applied to a forwarded key, or cleared on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const SHIFT: ModifierMask = ModifierMask(1 << 0);
    pub const ALT: ModifierMask = ModifierMask(1 << 1);
    pub const CTRL: ModifierMask = ModifierMask(1 << 2);

    /// Raw bit representation
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether every bit of `other` is set in `self`
    pub fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Modifiers present in this mask, in Ctrl, Alt, Shift order
    pub fn kinds(self) -> impl Iterator<Item = ModifierKind> {
        [ModifierKind::Ctrl, ModifierKind::Alt, ModifierKind::Shift]
            .into_iter()
            .filter(move |kind| self.contains(kind.mask()))
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierMask) -> ModifierMask {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: ModifierMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<String> = self.kinds().map(|k| k.to_string()).collect();
        write!(f, "{}", names.join("+"))
    }
}

/// Static array for O(1) lock-free modifier lookup
const MODIFIER_KEY_CODES: &[u16] = &[
    29, 97, // L_CONTROL, R_CONTROL
    56, 100, // L_ALT, R_ALT
    42, 54, // L_SHIFT, R_SHIFT
];

/// Check if a key code is a standard modifier key
#[inline]
pub const fn is_key_modifier_code(code: u16) -> bool {
    let mut i = 0;
    while i < MODIFIER_KEY_CODES.len() {
        if MODIFIER_KEY_CODES[i] == code {
            return true;
        }
        i += 1;
    }
    false
}
