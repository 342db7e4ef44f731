// Titan IME State
// Per-session modifier and layer state

pub mod ctrl;
pub mod latch;
pub mod layer;

pub use ctrl::CtrlState;
pub use latch::{
    LockTransition, ModifierLatch, DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_LOCK_COOLDOWN_MS,
};
pub use layer::{Layer, LayerController, LayerError};
