// Titan IME Input Layer - Key Events
// Raw key events with host-supplied timestamps and transient modifier flags

use std::fmt;
use std::time::Duration;

use crate::{Key, KeyDirection};

/// Monotonic event time in milliseconds, supplied by the host with every
/// event. The core never reads a clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`; zero if the clock appears to go backwards
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Timestamp(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// The host's own transient modifier tracking for an event.
///
/// This is what the host reports as physically held, which is distinct
/// from the lock state kept by the input method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HostModifiers {
    pub alt: bool,
    pub shift: bool,
}

impl HostModifiers {
    pub const NONE: HostModifiers = HostModifiers {
        alt: false,
        shift: false,
    };

    pub fn alt() -> Self {
        Self {
            alt: true,
            shift: false,
        }
    }

    pub fn shift() -> Self {
        Self {
            alt: false,
            shift: true,
        }
    }
}

/// A single physical key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub direction: KeyDirection,
    pub timestamp: Timestamp,
    pub modifiers: HostModifiers,
}

impl KeyEvent {
    pub fn new(
        key: Key,
        direction: KeyDirection,
        timestamp: Timestamp,
        modifiers: HostModifiers,
    ) -> Self {
        Self {
            key,
            direction,
            timestamp,
            modifiers,
        }
    }

    /// Key-down with no host modifiers held
    pub fn down(key: Key, millis: u64) -> Self {
        Self::new(key, KeyDirection::Down, Timestamp(millis), HostModifiers::NONE)
    }

    /// Key-up with no host modifiers held
    pub fn up(key: Key, millis: u64) -> Self {
        Self::new(key, KeyDirection::Up, Timestamp(millis), HostModifiers::NONE)
    }

    /// Replace the host modifier flags
    pub fn with_modifiers(mut self, modifiers: HostModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @{}", self.key, self.direction, self.timestamp)?;
        if self.modifiers.alt {
            write!(f, " +alt")?;
        }
        if self.modifiers.shift {
            write!(f, " +shift")?;
        }
        Ok(())
    }
}
