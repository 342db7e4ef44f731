// Titan IME Modifier Latch
// Double-tap lock detection for Shift and Alt

use std::time::Duration;

use crate::output::Feedback;
use crate::{ModifierKind, Timestamp};

/// Default window in which two releases count as a double tap
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 800;

/// Default minimum time a lock stays on before a single release clears it
pub const DEFAULT_LOCK_COOLDOWN_MS: u64 = 300;

/// Outcome of releasing a lockable modifier key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTransition {
    /// Release recorded, lock state unchanged
    NoChange,
    /// Second tap inside the window engaged the lock
    LockedOn,
    /// Release after the cooldown cleared the lock
    LockedOff,
    /// The modifier was used in a chord; the release is absorbed
    ConsumedAsShortcut,
}

impl LockTransition {
    /// Acknowledgement the host should give for this transition
    pub fn feedback(self) -> Option<Feedback> {
        match self {
            LockTransition::LockedOn => Some(Feedback::LockOn),
            LockTransition::LockedOff => Some(Feedback::LockOff),
            LockTransition::NoChange | LockTransition::ConsumedAsShortcut => None,
        }
    }

    /// True when the release must not reach the host
    pub fn is_consumed(self) -> bool {
        !matches!(self, LockTransition::NoChange)
    }
}

/// Per-modifier latch: transient, pending chord, or locked
#[derive(Debug, Clone)]
pub struct ModifierLatch {
    kind: ModifierKind,
    locked: bool,
    pending_shortcut: bool,
    last_release: Option<Timestamp>,
    locked_at: Option<Timestamp>,
    double_tap_window: Duration,
    cooldown: Duration,
}

impl ModifierLatch {
    /// Create a latch with the default 800ms window and 300ms cooldown
    pub fn new(kind: ModifierKind) -> Self {
        Self::with_timing(
            kind,
            DEFAULT_DOUBLE_TAP_WINDOW_MS,
            DEFAULT_LOCK_COOLDOWN_MS,
        )
    }

    /// Create with custom timing in milliseconds
    pub fn with_timing(kind: ModifierKind, double_tap_window_ms: u64, cooldown_ms: u64) -> Self {
        Self {
            kind,
            locked: false,
            pending_shortcut: false,
            last_release: None,
            locked_at: None,
            double_tap_window: Duration::from_millis(double_tap_window_ms),
            cooldown: Duration::from_millis(cooldown_ms),
        }
    }

    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_pending_shortcut(&self) -> bool {
        self.pending_shortcut
    }

    pub fn double_tap_window(&self) -> Duration {
        self.double_tap_window
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// The modifier was held while a different key was used
    pub fn on_chord_use(&mut self) {
        self.pending_shortcut = true;
    }

    /// Handle a release of the modifier key itself
    pub fn on_modifier_release(&mut self, now: Timestamp) -> LockTransition {
        if self.pending_shortcut {
            self.pending_shortcut = false;
            return LockTransition::ConsumedAsShortcut;
        }

        if self.locked {
            let since_lock = self
                .locked_at
                .map(|at| now.saturating_since(at))
                .unwrap_or(Duration::MAX);
            if since_lock >= self.cooldown {
                self.locked = false;
                self.locked_at = None;
                self.last_release = None;
                log::debug!("{} lock off at {}", self.kind, now);
                return LockTransition::LockedOff;
            }
            return LockTransition::NoChange;
        }

        match self.last_release {
            Some(previous) if now.saturating_since(previous) < self.double_tap_window => {
                self.locked = true;
                self.locked_at = Some(now);
                // The tap that engaged the lock must not pair with the next one
                self.last_release = None;
                log::debug!("{} lock on at {}", self.kind, now);
                LockTransition::LockedOn
            }
            _ => {
                self.last_release = Some(now);
                LockTransition::NoChange
            }
        }
    }

    /// Drop the lock, keeping any recorded first tap.
    /// Returns true if a lock was actually cleared.
    pub fn clear_lock(&mut self) -> bool {
        let was_locked = self.locked;
        if was_locked {
            log::debug!("{} lock cleared", self.kind);
        }
        self.locked = false;
        self.locked_at = None;
        was_locked
    }

    /// Return to the unlocked, no-history state
    pub fn reset(&mut self) {
        self.locked = false;
        self.pending_shortcut = false;
        self.last_release = None;
        self.locked_at = None;
    }
}
