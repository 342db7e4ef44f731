// Titan IME Key Event Processor
// Per-session state machine turning raw key events into output actions

use smallvec::SmallVec;

use crate::output::{Effect, OutputAction};
use crate::state::{
    CtrlState, Layer, LayerController, LockTransition, ModifierLatch,
    DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_LOCK_COOLDOWN_MS,
};
use crate::transform::KeyTranslationTable;
use crate::{
    is_key_modifier_code, FieldClass, Key, KeyEvent, ModifierKind, ModifierMask, SoftKey,
};

/// Configuration for the key event processor
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Two releases closer than this lock a modifier (milliseconds)
    pub double_tap_window_ms: u64,
    /// A lock survives single releases for at least this long (milliseconds)
    pub lock_cooldown_ms: u64,
    /// Extra physical key treated as Ctrl
    pub ctrl_alias: Option<Key>,
    /// Keys that cycle the symbol layers on release
    pub cycle_keys: Vec<Key>,
    pub table: KeyTranslationTable,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            lock_cooldown_ms: DEFAULT_LOCK_COOLDOWN_MS,
            ctrl_alias: Some(Key::FN),
            cycle_keys: vec![Key::MENU],
            table: KeyTranslationTable::default(),
        }
    }
}

/// Modifier and layer state machine for one input session.
///
/// The processor never talks to the host directly. Every handler returns a
/// single [`OutputAction`]; side effects (meta-state clearing, lock feedback,
/// layer redraws) are queued and drained with [`take_effects`].
///
/// [`take_effects`]: KeyEventProcessor::take_effects
#[derive(Debug, Clone)]
pub struct KeyEventProcessor {
    config: ProcessorConfig,
    layers: LayerController,
    alt: ModifierLatch,
    shift: ModifierLatch,
    ctrl: CtrlState,
    in_session: bool,
    effects: SmallVec<[Effect; 4]>,
}

impl Default for KeyEventProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl KeyEventProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        let alt = ModifierLatch::with_timing(
            ModifierKind::Alt,
            config.double_tap_window_ms,
            config.lock_cooldown_ms,
        );
        let shift = ModifierLatch::with_timing(
            ModifierKind::Shift,
            config.double_tap_window_ms,
            config.lock_cooldown_ms,
        );
        Self {
            config,
            layers: LayerController::new(),
            alt,
            shift,
            ctrl: CtrlState::default(),
            in_session: false,
            effects: SmallVec::new(),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    // ==================== Lifecycle ====================

    /// Attach to a newly focused field
    pub fn start_session(&mut self, field: FieldClass) {
        self.reset();
        self.layers.set_field_hint(field);
        self.in_session = true;
        log::debug!("session started on {} field", field);
    }

    /// Detach from the field; the next session starts from scratch
    pub fn end_session(&mut self) {
        self.reset();
        self.layers.clear();
        self.in_session = false;
        log::debug!("session ended");
    }

    /// The keyboard view was (re)shown
    pub fn show_view(&mut self) {
        self.reset();
    }

    /// Return to the session base layer with every modifier released.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.layers.reset();
        self.alt.reset();
        self.shift.reset();
        self.ctrl.reset();
        self.effects.clear();
    }

    // ==================== Accessors ====================

    pub fn active_layer(&self) -> Layer {
        self.layers.active()
    }

    pub fn base_layer(&self) -> Layer {
        self.layers.base()
    }

    /// Whether a modifier is currently sticky (Ctrl: held)
    pub fn is_locked(&self, kind: ModifierKind) -> bool {
        match kind {
            ModifierKind::Alt => self.alt.is_locked(),
            ModifierKind::Shift => self.shift.is_locked(),
            ModifierKind::Ctrl => self.ctrl.is_on(),
        }
    }

    pub fn ctrl_active(&self) -> bool {
        self.ctrl.is_on()
    }

    pub fn in_session(&self) -> bool {
        self.in_session
    }

    /// Drain the effects queued since the last call
    pub fn take_effects(&mut self) -> SmallVec<[Effect; 4]> {
        std::mem::take(&mut self.effects)
    }

    // ==================== Event entry points ====================

    /// Route an event to the down or up handler by its direction
    pub fn handle(&mut self, event: &KeyEvent) -> OutputAction {
        if event.direction.is_down() {
            self.handle_key_down(event)
        } else {
            self.handle_key_up(event)
        }
    }

    pub fn handle_key_down(&mut self, event: &KeyEvent) -> OutputAction {
        self.check_session("handle_key_down");
        let action = self.key_down(event);
        log::trace!("{} -> {}", event, action);
        action
    }

    pub fn handle_key_up(&mut self, event: &KeyEvent) -> OutputAction {
        self.check_session("handle_key_up");
        let action = self.key_up(event);
        log::trace!("{} -> {}", event, action);
        action
    }

    /// An on-screen key asked for the next symbol layer
    pub fn on_layer_cycle_requested(&mut self) -> OutputAction {
        self.check_session("on_layer_cycle_requested");
        OutputAction::SwitchLayer(self.advance_layer())
    }

    /// A key on the on-screen keyboard was pressed
    pub fn on_soft_key(&mut self, key: SoftKey) -> OutputAction {
        self.check_session("on_soft_key");
        let action = match key {
            SoftKey::Shift => self
                .layers
                .toggle_shifted()
                .map(OutputAction::SwitchLayer)
                .unwrap_or(OutputAction::Consumed),
            SoftKey::ModeChange => OutputAction::SwitchLayer(self.layers.toggle_symbols()),
            SoftKey::Cancel => OutputAction::HideKeyboard,
            SoftKey::CursorLeft => OutputAction::ForwardRawKey(Key::LEFT),
            SoftKey::CursorRight => OutputAction::ForwardRawKey(Key::RIGHT),
            SoftKey::Char(ch) if self.layers.active() == Layer::SymbolsShifted => {
                OutputAction::CommitCharacter(to_upper(ch))
            }
            SoftKey::Char(ch) => OutputAction::CommitCharacter(ch),
        };
        log::trace!("soft {} -> {}", key, action);
        action
    }

    fn check_session(&self, op: &str) {
        if !self.in_session {
            log::warn!("{} called outside an input session", op);
        }
        debug_assert!(self.in_session, "{} called outside an input session", op);
    }

    // ==================== Key down ====================

    fn key_down(&mut self, event: &KeyEvent) -> OutputAction {
        let key = event.key;
        let host = event.modifiers;
        let layer = self.layers.active();

        if key == Key::BACK {
            if layer.is_symbols() && self.layers.return_to_base() {
                self.effects.push(Effect::LayerChanged(self.layers.active()));
            }
            return OutputAction::NotHandled;
        }

        if self.is_ctrl_key(key) && self.ctrl.engage(key) {
            log::debug!("ctrl on via {}", key);
            return OutputAction::Consumed;
        }

        if self.ctrl.is_on() {
            if self.is_ctrl_key(key) {
                return OutputAction::Consumed;
            }
            return OutputAction::ForwardKeyWithModifier(key, ModifierMask::CTRL);
        }

        match key {
            Key::SPACE => {
                if self.alt_chords(key) {
                    return OutputAction::ForwardKeyWithModifier(key, ModifierMask::ALT);
                }
                let ch = if host.alt { '\t' } else { ' ' };
                return OutputAction::CommitCharacter(ch);
            }
            Key::BACKSPACE => return self.delete_down(event),
            Key::ENTER => {
                return if host.alt {
                    OutputAction::TriggerEditorAction
                } else if host.shift {
                    OutputAction::CommitCharacter('\n')
                } else {
                    OutputAction::NotHandled
                };
            }
            _ => {}
        }

        if self.is_cycle_key(key) {
            return OutputAction::Consumed;
        }

        // Ctrl keys never get here; Shift and Alt are left to the host
        if is_key_modifier_code(key.code()) {
            return OutputAction::NotHandled;
        }

        let excluded = self.config.table.is_excluded_from_alt_chord(key);

        match layer {
            Layer::Default => {
                if !excluded {
                    if self.alt.is_locked() {
                        return OutputAction::ForwardKeyWithModifier(key, ModifierMask::ALT);
                    }
                    if self.shift.is_locked() {
                        return OutputAction::ForwardKeyWithModifier(key, ModifierMask::SHIFT);
                    }
                }
                // Alt+letter types the glyph printed on the key
                if host.alt {
                    return OutputAction::NotHandled;
                }
                key.to_char(host.shift)
                    .map(OutputAction::CommitCharacter)
                    .unwrap_or(OutputAction::NotHandled)
            }
            Layer::Symbols | Layer::SymbolsShifted => self
                .config
                .table
                .translate(layer, key)
                .map(OutputAction::CommitCharacter)
                .unwrap_or(OutputAction::NotHandled),
            Layer::Numeric if !excluded => {
                OutputAction::ForwardKeyWithModifier(key, ModifierMask::ALT)
            }
            Layer::Numeric => OutputAction::NotHandled,
        }
    }

    fn delete_down(&mut self, event: &KeyEvent) -> OutputAction {
        if self.alt_chords(Key::BACKSPACE) {
            return OutputAction::ForwardKeyWithModifier(Key::BACKSPACE, ModifierMask::ALT);
        }
        if self.layers.active() == Layer::Numeric || self.alt.is_locked() {
            return OutputAction::ForwardRawKey(Key::BACKSPACE);
        }
        if event.modifiers.alt {
            return OutputAction::NotHandled;
        }
        if event.modifiers.shift {
            return OutputAction::ForwardRawKey(Key::DELETE);
        }
        self.effects.push(Effect::ClearMetaState(ModifierMask::ALT));
        OutputAction::NotHandled
    }

    // ==================== Key up ====================

    fn key_up(&mut self, event: &KeyEvent) -> OutputAction {
        let key = event.key;
        let host = event.modifiers;
        let kind = ModifierKind::from_key(key);

        if self.ctrl.release(key) {
            log::debug!("ctrl off via {}", key);
            return OutputAction::Consumed;
        }

        // Releases under a held Ctrl belong to the chord
        if self.ctrl.is_on() && !self.is_ctrl_key(key) {
            return OutputAction::NotHandled;
        }

        if host.alt && kind != Some(ModifierKind::Alt) {
            self.alt.on_chord_use();
            if kind == Some(ModifierKind::Shift) {
                self.cycle_layer();
                self.effects.push(Effect::ClearMetaState(
                    ModifierMask::ALT | ModifierMask::SHIFT,
                ));
                return OutputAction::Consumed;
            }
        }

        if host.shift && kind != Some(ModifierKind::Shift) {
            self.shift.on_chord_use();
        }

        if self.is_cycle_key(key) {
            self.cycle_layer();
            return OutputAction::Consumed;
        }

        match kind {
            Some(kind) => self.release_latch(kind, event),
            None => OutputAction::NotHandled,
        }
    }

    /// Release a lockable modifier key, dropping the opposite lock
    fn release_latch(&mut self, kind: ModifierKind, event: &KeyEvent) -> OutputAction {
        let Some(latch) = self.latch_mut(kind) else {
            return OutputAction::NotHandled;
        };
        let transition = latch.on_modifier_release(event.timestamp);

        if let Some(other) = kind.opposite() {
            let cleared = self.latch_mut(other).is_some_and(|latch| latch.clear_lock());
            if cleared {
                self.effects.push(Effect::Lock {
                    modifier: other,
                    transition: LockTransition::LockedOff,
                });
            }
        }

        if transition.feedback().is_some() {
            self.effects.push(Effect::Lock {
                modifier: kind,
                transition,
            });
        }

        if transition.is_consumed() {
            OutputAction::Consumed
        } else {
            OutputAction::NotHandled
        }
    }

    // ==================== Layers ====================

    fn cycle_layer(&mut self) {
        let layer = self.advance_layer();
        self.effects.push(Effect::LayerChanged(layer));
    }

    fn advance_layer(&mut self) -> Layer {
        match self.layers.cycle() {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("{}; returning to base layer", e);
                self.layers.reset();
                self.layers.active()
            }
        }
    }

    fn latch_mut(&mut self, kind: ModifierKind) -> Option<&mut ModifierLatch> {
        match kind {
            ModifierKind::Alt => Some(&mut self.alt),
            ModifierKind::Shift => Some(&mut self.shift),
            ModifierKind::Ctrl => None,
        }
    }

    /// Whether Alt is locked and `key` may be sent as an Alt chord
    fn alt_chords(&self, key: Key) -> bool {
        self.alt.is_locked() && !self.config.table.is_excluded_from_alt_chord(key)
    }

    fn is_ctrl_key(&self, key: Key) -> bool {
        ModifierKind::from_key(key) == Some(ModifierKind::Ctrl)
            || self.config.ctrl_alias == Some(key)
    }

    fn is_cycle_key(&self, key: Key) -> bool {
        self.config.cycle_keys.contains(&key)
    }
}

/// Single-character upper case; glyphs that expand stay as they are
fn to_upper(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostModifiers;
    use pretty_assertions::assert_eq;

    fn session(field: FieldClass) -> KeyEventProcessor {
        let mut processor = KeyEventProcessor::default();
        processor.start_session(field);
        processor
    }

    fn down(p: &mut KeyEventProcessor, key: Key, ms: u64) -> OutputAction {
        p.handle_key_down(&KeyEvent::down(key, ms))
    }

    fn up(p: &mut KeyEventProcessor, key: Key, ms: u64) -> OutputAction {
        p.handle_key_up(&KeyEvent::up(key, ms))
    }

    fn tap(p: &mut KeyEventProcessor, key: Key, ms: u64) -> OutputAction {
        down(p, key, ms);
        up(p, key, ms)
    }

    fn lock_alt(p: &mut KeyEventProcessor, start: u64) {
        tap(p, Key::LEFT_ALT, start);
        tap(p, Key::LEFT_ALT, start + 100);
        assert!(p.is_locked(ModifierKind::Alt));
    }

    #[test]
    fn test_plain_letter_commits() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::Q, 0), OutputAction::CommitCharacter('q'));
        let shifted = KeyEvent::down(Key::Q, 10).with_modifiers(HostModifiers::shift());
        assert_eq!(p.handle_key_down(&shifted), OutputAction::CommitCharacter('Q'));
    }

    #[test]
    fn test_alt_held_letter_goes_to_host() {
        let mut p = session(FieldClass::Text);
        let alted = KeyEvent::down(Key::Q, 10).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_down(&alted), OutputAction::NotHandled);
        let both = KeyEvent::down(Key::A, 20).with_modifiers(HostModifiers {
            alt: true,
            shift: true,
        });
        assert_eq!(p.handle_key_down(&both), OutputAction::NotHandled);
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_back_is_never_handled() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::BACK, 0), OutputAction::NotHandled);
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_back_in_symbols_returns_to_base() {
        let mut p = session(FieldClass::Text);
        tap(&mut p, Key::MENU, 0);
        p.take_effects();
        assert_eq!(p.active_layer(), Layer::Symbols);
        assert_eq!(down(&mut p, Key::BACK, 10), OutputAction::NotHandled);
        assert_eq!(p.active_layer(), Layer::Default);
        assert_eq!(
            p.take_effects().as_slice(),
            &[Effect::LayerChanged(Layer::Default)]
        );
    }

    #[test]
    fn test_ctrl_alias_chords() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::FN, 0), OutputAction::Consumed);
        assert!(p.ctrl_active());
        // auto-repeat of the holding key
        assert_eq!(down(&mut p, Key::FN, 30), OutputAction::Consumed);
        assert_eq!(
            down(&mut p, Key::C, 50),
            OutputAction::ForwardKeyWithModifier(Key::C, ModifierMask::CTRL)
        );
        assert_eq!(up(&mut p, Key::C, 60), OutputAction::NotHandled);
        assert_eq!(up(&mut p, Key::FN, 70), OutputAction::Consumed);
        assert!(!p.ctrl_active());
        assert_eq!(down(&mut p, Key::C, 80), OutputAction::CommitCharacter('c'));
    }

    #[test]
    fn test_ctrl_menu_does_not_cycle() {
        let mut p = session(FieldClass::Text);
        down(&mut p, Key::LEFT_CTRL, 0);
        assert_eq!(
            down(&mut p, Key::MENU, 10),
            OutputAction::ForwardKeyWithModifier(Key::MENU, ModifierMask::CTRL)
        );
        assert_eq!(up(&mut p, Key::MENU, 20), OutputAction::NotHandled);
        assert_eq!(p.active_layer(), Layer::Default);
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_ctrl_held_modifier_release_does_not_latch() {
        let mut p = session(FieldClass::Text);
        down(&mut p, Key::FN, 0);
        tap(&mut p, Key::LEFT_ALT, 10);
        tap(&mut p, Key::LEFT_ALT, 100);
        assert!(!p.is_locked(ModifierKind::Alt));
        up(&mut p, Key::FN, 150);
        assert!(!p.ctrl_active());
    }

    #[test]
    fn test_ctrl_released_only_by_holding_key() {
        let mut p = session(FieldClass::Text);
        down(&mut p, Key::LEFT_CTRL, 0);
        assert_eq!(down(&mut p, Key::RIGHT_CTRL, 10), OutputAction::Consumed);
        assert_eq!(up(&mut p, Key::RIGHT_CTRL, 20), OutputAction::NotHandled);
        assert!(p.ctrl_active());
        assert_eq!(up(&mut p, Key::LEFT_CTRL, 30), OutputAction::Consumed);
        assert!(!p.ctrl_active());
    }

    #[test]
    fn test_ctrl_chord_ignores_layer() {
        let mut p = session(FieldClass::Number);
        down(&mut p, Key::RIGHT_CTRL, 0);
        assert_eq!(
            down(&mut p, Key::SPACE, 10),
            OutputAction::ForwardKeyWithModifier(Key::SPACE, ModifierMask::CTRL)
        );
    }

    #[test]
    fn test_no_ctrl_alias() {
        let config = ProcessorConfig {
            ctrl_alias: None,
            ..ProcessorConfig::default()
        };
        let mut p = KeyEventProcessor::new(config);
        p.start_session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::FN, 0), OutputAction::NotHandled);
        assert!(!p.ctrl_active());
    }

    #[test]
    fn test_space() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::SPACE, 0), OutputAction::CommitCharacter(' '));
        let with_alt = KeyEvent::down(Key::SPACE, 10).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_down(&with_alt), OutputAction::CommitCharacter('\t'));
    }

    #[test]
    fn test_space_ignores_alt_lock() {
        let mut p = session(FieldClass::Text);
        lock_alt(&mut p, 0);
        assert_eq!(down(&mut p, Key::SPACE, 500), OutputAction::CommitCharacter(' '));
    }

    #[test]
    fn test_alt_lock_chords_space_and_delete_without_exclusions() {
        let config = ProcessorConfig {
            table: KeyTranslationTable::default().with_alt_chord_exclusions(&[]),
            ..ProcessorConfig::default()
        };
        let mut p = KeyEventProcessor::new(config);
        p.start_session(FieldClass::Text);
        lock_alt(&mut p, 0);
        p.take_effects();
        assert_eq!(
            down(&mut p, Key::SPACE, 500),
            OutputAction::ForwardKeyWithModifier(Key::SPACE, ModifierMask::ALT)
        );
        assert_eq!(
            down(&mut p, Key::BACKSPACE, 510),
            OutputAction::ForwardKeyWithModifier(Key::BACKSPACE, ModifierMask::ALT)
        );
    }

    #[test]
    fn test_delete_plain_clears_alt_meta() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::BACKSPACE, 0), OutputAction::NotHandled);
        assert_eq!(
            p.take_effects().as_slice(),
            &[Effect::ClearMetaState(ModifierMask::ALT)]
        );
    }

    #[test]
    fn test_delete_variants() {
        let mut p = session(FieldClass::Text);
        let shifted = KeyEvent::down(Key::BACKSPACE, 0).with_modifiers(HostModifiers::shift());
        assert_eq!(p.handle_key_down(&shifted), OutputAction::ForwardRawKey(Key::DELETE));

        let alted = KeyEvent::down(Key::BACKSPACE, 10).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_down(&alted), OutputAction::NotHandled);
        assert!(p.take_effects().is_empty());

        lock_alt(&mut p, 100);
        p.take_effects();
        assert_eq!(
            down(&mut p, Key::BACKSPACE, 500),
            OutputAction::ForwardRawKey(Key::BACKSPACE)
        );
    }

    #[test]
    fn test_delete_in_numeric() {
        let mut p = session(FieldClass::Number);
        assert_eq!(
            down(&mut p, Key::BACKSPACE, 0),
            OutputAction::ForwardRawKey(Key::BACKSPACE)
        );
    }

    #[test]
    fn test_enter() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::ENTER, 0), OutputAction::NotHandled);
        let alted = KeyEvent::down(Key::ENTER, 10).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_down(&alted), OutputAction::TriggerEditorAction);
        let shifted = KeyEvent::down(Key::ENTER, 20).with_modifiers(HostModifiers::shift());
        assert_eq!(p.handle_key_down(&shifted), OutputAction::CommitCharacter('\n'));
    }

    #[test]
    fn test_modifier_keys_pass_through_on_down() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key::LEFT_ALT, 0), OutputAction::NotHandled);
        assert_eq!(down(&mut p, Key::RIGHT_SHIFT, 0), OutputAction::NotHandled);
        assert_eq!(down(&mut p, Key::MENU, 0), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Default);
    }

    #[test]
    fn test_alt_lock_forwards_chords() {
        let mut p = session(FieldClass::Text);
        assert_eq!(tap(&mut p, Key::LEFT_ALT, 0), OutputAction::NotHandled);
        assert_eq!(tap(&mut p, Key::LEFT_ALT, 300), OutputAction::Consumed);
        assert_eq!(
            p.take_effects().as_slice(),
            &[Effect::Lock {
                modifier: ModifierKind::Alt,
                transition: LockTransition::LockedOn,
            }]
        );
        assert_eq!(
            down(&mut p, Key::Q, 400),
            OutputAction::ForwardKeyWithModifier(Key::Q, ModifierMask::ALT)
        );
    }

    #[test]
    fn test_shift_lock_forwards_chords() {
        let mut p = session(FieldClass::Text);
        tap(&mut p, Key::RIGHT_SHIFT, 0);
        tap(&mut p, Key::LEFT_SHIFT, 200);
        assert!(p.is_locked(ModifierKind::Shift));
        assert_eq!(
            down(&mut p, Key::A, 400),
            OutputAction::ForwardKeyWithModifier(Key::A, ModifierMask::SHIFT)
        );
    }

    #[test]
    fn test_locks_are_mutually_exclusive() {
        let mut p = session(FieldClass::Text);
        lock_alt(&mut p, 0);
        p.take_effects();

        tap(&mut p, Key::LEFT_SHIFT, 1000);
        assert!(!p.is_locked(ModifierKind::Alt));
        assert_eq!(
            p.take_effects().as_slice(),
            &[Effect::Lock {
                modifier: ModifierKind::Alt,
                transition: LockTransition::LockedOff,
            }]
        );

        tap(&mut p, Key::LEFT_SHIFT, 1100);
        assert!(p.is_locked(ModifierKind::Shift));
        assert!(!p.is_locked(ModifierKind::Alt));
    }

    #[test]
    fn test_alt_unlock_after_cooldown() {
        let mut p = session(FieldClass::Text);
        lock_alt(&mut p, 0);
        p.take_effects();
        assert_eq!(tap(&mut p, Key::LEFT_ALT, 200), OutputAction::NotHandled);
        assert!(p.is_locked(ModifierKind::Alt));
        assert_eq!(tap(&mut p, Key::LEFT_ALT, 400), OutputAction::Consumed);
        assert!(!p.is_locked(ModifierKind::Alt));
    }

    #[test]
    fn test_alt_chord_release_is_consumed() {
        let mut p = session(FieldClass::Text);
        tap(&mut p, Key::LEFT_ALT, 0);
        down(&mut p, Key::LEFT_ALT, 100);
        let chord = KeyEvent::up(Key::X, 150).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_up(&chord), OutputAction::NotHandled);
        assert_eq!(up(&mut p, Key::LEFT_ALT, 200), OutputAction::Consumed);
        assert!(!p.is_locked(ModifierKind::Alt));
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_alt_shift_cycles_layer() {
        let mut p = session(FieldClass::Text);
        let chord = KeyEvent::up(Key::LEFT_SHIFT, 100).with_modifiers(HostModifiers::alt());
        assert_eq!(p.handle_key_up(&chord), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Symbols);
        assert_eq!(
            p.take_effects().as_slice(),
            &[
                Effect::LayerChanged(Layer::Symbols),
                Effect::ClearMetaState(ModifierMask::ALT | ModifierMask::SHIFT),
            ]
        );
        // the Alt release that ends the chord does not count as a tap
        assert_eq!(up(&mut p, Key::LEFT_ALT, 150), OutputAction::Consumed);
        assert_eq!(tap(&mut p, Key::LEFT_ALT, 200), OutputAction::NotHandled);
        assert!(!p.is_locked(ModifierKind::Alt));
    }

    #[test]
    fn test_menu_cycles_symbol_layers() {
        let mut p = session(FieldClass::Text);
        assert_eq!(tap(&mut p, Key::MENU, 0), OutputAction::Consumed);
        assert_eq!(down(&mut p, Key::Q, 10), OutputAction::CommitCharacter('1'));
        assert_eq!(down(&mut p, Key::A, 20), OutputAction::CommitCharacter('@'));
        tap(&mut p, Key::MENU, 30);
        assert_eq!(p.active_layer(), Layer::SymbolsShifted);
        assert_eq!(down(&mut p, Key::Q, 40), OutputAction::CommitCharacter('~'));
        tap(&mut p, Key::MENU, 50);
        assert_eq!(p.active_layer(), Layer::Default);
    }

    #[test]
    fn test_symbol_layer_miss_is_not_handled() {
        let mut p = session(FieldClass::Text);
        tap(&mut p, Key::MENU, 0);
        assert_eq!(down(&mut p, Key::KEY_1, 10), OutputAction::NotHandled);
        assert_eq!(down(&mut p, Key::COMMA, 10), OutputAction::NotHandled);
    }

    #[test]
    fn test_numeric_layer_forwards_alt_chords() {
        let mut p = session(FieldClass::Phone);
        assert_eq!(p.active_layer(), Layer::Numeric);
        assert_eq!(
            down(&mut p, Key::W, 0),
            OutputAction::ForwardKeyWithModifier(Key::W, ModifierMask::ALT)
        );
        assert_eq!(down(&mut p, Key::SPACE, 10), OutputAction::CommitCharacter(' '));
    }

    #[test]
    fn test_numeric_cycle_returns_to_numeric() {
        let mut p = session(FieldClass::DateTime);
        assert_eq!(p.on_layer_cycle_requested(), OutputAction::SwitchLayer(Layer::Symbols));
        assert_eq!(
            p.on_layer_cycle_requested(),
            OutputAction::SwitchLayer(Layer::SymbolsShifted)
        );
        assert_eq!(p.on_layer_cycle_requested(), OutputAction::SwitchLayer(Layer::Numeric));
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_stray_layer_recovers_to_base() {
        let mut p = session(FieldClass::Text);
        p.layers.force_active(Layer::Numeric);
        assert_eq!(p.on_layer_cycle_requested(), OutputAction::SwitchLayer(Layer::Default));
        assert_eq!(p.active_layer(), Layer::Default);

        p.layers.force_active(Layer::Numeric);
        assert_eq!(tap(&mut p, Key::MENU, 0), OutputAction::Consumed);
        assert_eq!(
            p.take_effects().as_slice(),
            &[Effect::LayerChanged(Layer::Default)]
        );
    }

    #[test]
    fn test_soft_mode_change_toggles_symbols() {
        let mut p = session(FieldClass::Phone);
        assert_eq!(
            p.on_soft_key(SoftKey::ModeChange),
            OutputAction::SwitchLayer(Layer::Symbols)
        );
        p.on_soft_key(SoftKey::Shift);
        assert_eq!(
            p.on_soft_key(SoftKey::ModeChange),
            OutputAction::SwitchLayer(Layer::Numeric)
        );
    }

    #[test]
    fn test_soft_shift_toggles_symbol_layouts() {
        let mut p = session(FieldClass::Text);
        assert_eq!(p.on_soft_key(SoftKey::Shift), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Default);
        p.on_soft_key(SoftKey::ModeChange);
        assert_eq!(
            p.on_soft_key(SoftKey::Shift),
            OutputAction::SwitchLayer(Layer::SymbolsShifted)
        );
        assert_eq!(
            p.on_soft_key(SoftKey::Shift),
            OutputAction::SwitchLayer(Layer::Symbols)
        );
    }

    #[test]
    fn test_soft_characters_and_cursor() {
        let mut p = session(FieldClass::Text);
        assert_eq!(p.on_soft_key(SoftKey::Char('a')), OutputAction::CommitCharacter('a'));
        assert_eq!(
            p.on_soft_key(SoftKey::CursorLeft),
            OutputAction::ForwardRawKey(Key::LEFT)
        );
        assert_eq!(
            p.on_soft_key(SoftKey::CursorRight),
            OutputAction::ForwardRawKey(Key::RIGHT)
        );
        p.on_soft_key(SoftKey::ModeChange);
        p.on_soft_key(SoftKey::Shift);
        assert_eq!(p.on_soft_key(SoftKey::Char('ä')), OutputAction::CommitCharacter('Ä'));
        assert_eq!(p.on_soft_key(SoftKey::Char('ß')), OutputAction::CommitCharacter('ß'));
        assert_eq!(p.on_soft_key(SoftKey::Char('€')), OutputAction::CommitCharacter('€'));
    }

    #[test]
    fn test_soft_cancel_hides() {
        let mut p = session(FieldClass::Text);
        assert_eq!(p.on_soft_key(SoftKey::Cancel), OutputAction::HideKeyboard);
        assert!(p.take_effects().is_empty());
    }

    #[test]
    fn test_unknown_key_is_not_handled() {
        let mut p = session(FieldClass::Text);
        assert_eq!(down(&mut p, Key(0x2ff), 0), OutputAction::NotHandled);
        assert_eq!(up(&mut p, Key(0x2ff), 0), OutputAction::NotHandled);
    }

    #[test]
    fn test_show_view_resets_state() {
        let mut p = session(FieldClass::Number);
        lock_alt(&mut p, 0);
        down(&mut p, Key::FN, 200);
        p.on_layer_cycle_requested();
        p.show_view();
        assert_eq!(p.active_layer(), Layer::Numeric);
        assert!(!p.is_locked(ModifierKind::Alt));
        assert!(!p.ctrl_active());
        assert!(p.take_effects().is_empty());
        assert!(p.in_session());
    }

    #[test]
    fn test_end_session_forgets_base() {
        let mut p = session(FieldClass::Number);
        p.end_session();
        assert!(!p.in_session());
        assert_eq!(p.active_layer(), Layer::Default);
        assert_eq!(p.base_layer(), Layer::Default);
        p.start_session(FieldClass::Text);
        assert_eq!(p.active_layer(), Layer::Default);
    }

    #[test]
    fn test_custom_cycle_keys() {
        let config = ProcessorConfig {
            cycle_keys: vec![Key::COMPOSE, Key::RIGHT_META],
            ..ProcessorConfig::default()
        };
        let mut p = KeyEventProcessor::new(config);
        p.start_session(FieldClass::Text);
        assert_eq!(tap(&mut p, Key::MENU, 0), OutputAction::NotHandled);
        assert_eq!(p.active_layer(), Layer::Default);
        assert_eq!(tap(&mut p, Key::RIGHT_META, 10), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Symbols);
    }

    #[test]
    fn test_handle_routes_by_direction() {
        let mut p = session(FieldClass::Text);
        assert_eq!(p.handle(&KeyEvent::down(Key::MENU, 0)), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Default);
        assert_eq!(p.handle(&KeyEvent::up(Key::MENU, 5)), OutputAction::Consumed);
        assert_eq!(p.active_layer(), Layer::Symbols);
    }
}
