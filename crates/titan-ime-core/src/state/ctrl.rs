// Titan IME Ctrl State
// Two-state Ctrl tracking, including a hardware key aliased to Ctrl

use crate::Key;

/// Ctrl is either off or held by one specific physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CtrlState {
    held_by: Option<Key>,
}

impl CtrlState {
    pub fn is_on(&self) -> bool {
        self.held_by.is_some()
    }

    /// The physical key that turned Ctrl on
    pub fn held_by(&self) -> Option<Key> {
        self.held_by
    }

    /// Turn Ctrl on for `key`. Returns false if Ctrl was already on.
    pub fn engage(&mut self, key: Key) -> bool {
        if self.held_by.is_some() {
            return false;
        }
        self.held_by = Some(key);
        true
    }

    /// Turn Ctrl off if `key` is the one holding it
    pub fn release(&mut self, key: Key) -> bool {
        if self.held_by == Some(key) {
            self.held_by = None;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.held_by = None;
    }
}
