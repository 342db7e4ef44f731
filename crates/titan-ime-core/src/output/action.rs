// Titan IME Output Actions
// What the host should do with a processed key event

use std::fmt;

use crate::{Key, Layer, LockTransition, ModifierKind, ModifierMask};

/// Result of processing a single key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    /// Commit a character to the text connection
    CommitCharacter(char),
    /// Send the key to the editor with the given modifiers held
    ForwardKeyWithModifier(Key, ModifierMask),
    /// Send a plain key down/up pair to the editor
    ForwardRawKey(Key),
    /// The visible layer changed
    SwitchLayer(Layer),
    /// Run the editor's action (search, send, go...)
    TriggerEditorAction,
    /// Close the on-screen keyboard
    HideKeyboard,
    /// Swallow the event with no further effect
    Consumed,
    /// Let the host's default handling run
    NotHandled,
}

impl OutputAction {
    /// True unless the host should fall back to its default handling
    pub fn is_handled(self) -> bool {
        !matches!(self, OutputAction::NotHandled)
    }

    /// True for actions that put something into the editor
    pub fn produces_input(self) -> bool {
        matches!(
            self,
            OutputAction::CommitCharacter(_)
                | OutputAction::ForwardKeyWithModifier(..)
                | OutputAction::ForwardRawKey(_)
                | OutputAction::TriggerEditorAction
        )
    }
}

impl fmt::Display for OutputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputAction::CommitCharacter(ch) => write!(f, "commit {:?}", ch),
            OutputAction::ForwardKeyWithModifier(key, mask) => {
                write!(f, "forward {}+{}", mask, key)
            }
            OutputAction::ForwardRawKey(key) => write!(f, "forward {}", key),
            OutputAction::SwitchLayer(layer) => write!(f, "switch to {}", layer),
            OutputAction::TriggerEditorAction => write!(f, "editor action"),
            OutputAction::HideKeyboard => write!(f, "hide keyboard"),
            OutputAction::Consumed => write!(f, "consumed"),
            OutputAction::NotHandled => write!(f, "not handled"),
        }
    }
}

/// Acknowledgement signal the host renders (vibration, sound...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Feedback {
    KeyPress,
    /// Double pulse
    LockOn,
    /// Single pulse
    LockOff,
}

/// Side effect queued by the processor alongside the returned action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Clear host meta state for these modifiers on the text connection
    ClearMetaState(ModifierMask),
    /// A lockable modifier changed state
    Lock {
        modifier: ModifierKind,
        transition: LockTransition,
    },
    /// The active layer changed as a side effect of the event
    LayerChanged(Layer),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ClearMetaState(mask) => write!(f, "clear meta {}", mask),
            Effect::Lock {
                modifier,
                transition,
            } => write!(f, "{} {:?}", modifier, transition),
            Effect::LayerChanged(layer) => write!(f, "layer {}", layer),
        }
    }
}
