// Titan IME Key Translation Table
// Maps letter keys to the glyph at the same position of the on-screen symbol layouts

use smallvec::SmallVec;

use crate::{Key, Layer};

/// Number of slots in an on-screen symbol layout
pub const LAYOUT_SLOTS: usize = 28;

/// Slot of the on-screen delete key (not reachable from a letter key)
pub const DELETE_SLOT: usize = 19;

/// Slot of the on-screen enter key (not reachable from a letter key)
pub const ENTER_SLOT: usize = 27;

/// Default primary symbol layout, row by row:
/// 10 top-row slots, 9 home-row slots, delete, 7 bottom-row slots, enter.
/// A stock glyph set; deployments replace it through the `[symbols]` settings.
pub const DEFAULT_SYMBOLS: &str = "1234567890@#$%&-+()⌫*\"':;!?⏎";

/// Default shifted symbol layout, same geometry as [`DEFAULT_SYMBOLS`]
pub const DEFAULT_SYMBOLS_SHIFTED: &str = "~`|•√π÷×¶∆£¢€¥^°={}⌫\\©®™✓[]⏎";

/// Layout strings that cannot be used as a symbol layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("symbol layout needs {expected} characters, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// One on-screen symbol layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLayout {
    slots: [char; LAYOUT_SLOTS],
}

impl SymbolLayout {
    /// Parse a layout from exactly [`LAYOUT_SLOTS`] characters
    pub fn parse(layout: &str) -> Result<Self, LayoutError> {
        let chars: Vec<char> = layout.chars().collect();
        let slots: [char; LAYOUT_SLOTS] = chars.as_slice().try_into().map_err(|_| {
            LayoutError::WrongLength {
                expected: LAYOUT_SLOTS,
                found: chars.len(),
            }
        })?;
        Ok(Self { slots })
    }

    /// Built-in primary symbol layout
    pub fn primary() -> Self {
        Self::from_const(DEFAULT_SYMBOLS)
    }

    /// Built-in shifted symbol layout
    pub fn shifted() -> Self {
        Self::from_const(DEFAULT_SYMBOLS_SHIFTED)
    }

    fn from_const(layout: &str) -> Self {
        let mut slots = [' '; LAYOUT_SLOTS];
        for (slot, ch) in slots.iter_mut().zip(layout.chars()) {
            *slot = ch;
        }
        Self { slots }
    }

    /// Glyph at a layout slot
    pub fn get(&self, slot: usize) -> Option<char> {
        self.slots.get(slot).copied()
    }
}

/// Position of a physical letter key on the on-screen layout.
///
/// Top row Q..P fills slots 0-9, home row A..L slots 10-18 and bottom row
/// Z..M slots 20-26. Everything else has no slot.
pub fn slot_for_key(key: Key) -> Option<usize> {
    match key.code() {
        code @ 16..=25 => Some((code - 16) as usize),
        code @ 30..=38 => Some((code - 30) as usize + 10),
        code @ 44..=50 => Some((code - 44) as usize + 20),
        _ => None,
    }
}

/// Static lookup used while a symbol layer is active
#[derive(Debug, Clone)]
pub struct KeyTranslationTable {
    primary: SymbolLayout,
    shifted: SymbolLayout,
    alt_chord_exclusions: SmallVec<[Key; 4]>,
}

impl Default for KeyTranslationTable {
    fn default() -> Self {
        Self::new(SymbolLayout::primary(), SymbolLayout::shifted())
    }
}

impl KeyTranslationTable {
    /// Create a table with the default Alt-chord exclusions (Space, Delete)
    pub fn new(primary: SymbolLayout, shifted: SymbolLayout) -> Self {
        Self {
            primary,
            shifted,
            alt_chord_exclusions: SmallVec::from_slice(&[Key::SPACE, Key::BACKSPACE]),
        }
    }

    /// Replace the keys that bypass Alt-chord forwarding
    pub fn with_alt_chord_exclusions(mut self, keys: &[Key]) -> Self {
        self.alt_chord_exclusions = SmallVec::from_slice(keys);
        self
    }

    /// Symbol for `key` on `layer`; `None` outside the symbol layers or for
    /// keys with no slot.
    pub fn translate(&self, layer: Layer, key: Key) -> Option<char> {
        let layout = match layer {
            Layer::Symbols => &self.primary,
            Layer::SymbolsShifted => &self.shifted,
            Layer::Default | Layer::Numeric => return None,
        };
        slot_for_key(key).and_then(|slot| layout.get(slot))
    }

    /// Keys that must not be forwarded as an Alt chord even while Alt is locked
    pub fn is_excluded_from_alt_chord(&self, key: Key) -> bool {
        self.alt_chord_exclusions.contains(&key)
    }
}
