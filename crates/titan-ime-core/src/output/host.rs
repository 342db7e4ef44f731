// Titan IME Host Seam
// The narrow interface a host shell implements, and applying processed events to it

use crate::output::{Effect, Feedback, OutputAction};
use crate::{Key, Layer, ModifierMask};

/// Operations the input method needs from the host's text connection,
/// view and feedback hardware.
pub trait InputHost {
    type Error;

    fn commit_text(&mut self, text: &str) -> Result<(), Self::Error>;

    fn send_key_with_modifiers(&mut self, key: Key, mask: ModifierMask)
        -> Result<(), Self::Error>;

    /// Send a key down/up pair
    fn send_raw_key(&mut self, key: Key) -> Result<(), Self::Error>;

    fn perform_editor_action(&mut self) -> Result<(), Self::Error>;

    fn clear_meta_states(&mut self, mask: ModifierMask) -> Result<(), Self::Error>;

    /// Dismiss the input method
    fn hide_keyboard(&mut self) -> Result<(), Self::Error>;

    /// Show a layer on the on-screen keyboard, if any
    fn show_layer(&mut self, _layer: Layer) -> Result<(), Self::Error> {
        Ok(())
    }

    fn feedback(&mut self, _signal: Feedback) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Apply one processed event to a host.
///
/// Effects are applied before the action so that cleared meta state never
/// leaks into the committed input. Returns whether the event was handled;
/// `false` means the host should run its default key handling.
pub fn dispatch<H, I>(host: &mut H, action: OutputAction, effects: I) -> Result<bool, H::Error>
where
    H: InputHost + ?Sized,
    I: IntoIterator<Item = Effect>,
{
    for effect in effects {
        match effect {
            Effect::ClearMetaState(mask) => host.clear_meta_states(mask)?,
            Effect::Lock { transition, .. } => {
                if let Some(signal) = transition.feedback() {
                    host.feedback(signal)?;
                }
            }
            Effect::LayerChanged(layer) => host.show_layer(layer)?,
        }
    }

    match action {
        OutputAction::CommitCharacter(ch) => {
            let mut buf = [0u8; 4];
            host.commit_text(ch.encode_utf8(&mut buf))?;
        }
        OutputAction::ForwardKeyWithModifier(key, mask) => {
            host.send_key_with_modifiers(key, mask)?
        }
        OutputAction::ForwardRawKey(key) => host.send_raw_key(key)?,
        OutputAction::SwitchLayer(layer) => host.show_layer(layer)?,
        OutputAction::TriggerEditorAction => host.perform_editor_action()?,
        OutputAction::HideKeyboard => host.hide_keyboard()?,
        OutputAction::Consumed | OutputAction::NotHandled => {}
    }

    if action.produces_input() {
        host.feedback(Feedback::KeyPress)?;
    }

    Ok(action.is_handled())
}
