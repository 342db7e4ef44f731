// Titan IME Core Library
// Modifier-lock and layer state machine for a hardware-keyboard input method

pub mod action;
pub mod input;
pub mod key;
pub mod modifier;
pub mod output;
pub mod state;
pub mod transform;

#[cfg(feature = "settings")]
pub mod settings;

pub use action::KeyDirection;
pub use input::{FieldClass, HostModifiers, KeyEvent, SoftKey, Timestamp};
pub use key::Key;
pub use modifier::{is_key_modifier_code, ModifierKind, ModifierMask};
pub use output::{dispatch, Effect, Feedback, InputHost, OutputAction};
pub use state::{CtrlState, Layer, LayerController, LayerError, LockTransition, ModifierLatch};
pub use transform::{KeyEventProcessor, KeyTranslationTable, ProcessorConfig, SymbolLayout};

#[cfg(feature = "settings")]
pub use settings::{default_settings_content, Settings, SettingsError};
