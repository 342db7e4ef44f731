// Titan IME Layer Controller
// Active character layer, the session's base layer, and symbol-layer cycling

use crate::FieldClass;

/// Character-mapping mode of the keyboard
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Layer {
    /// Alphabetic layer
    #[default]
    Default,
    Numeric,
    Symbols,
    SymbolsShifted,
}

impl Layer {
    pub fn is_symbols(self) -> bool {
        matches!(self, Layer::Symbols | Layer::SymbolsShifted)
    }

    /// Layers a session can start on
    pub fn is_base(self) -> bool {
        matches!(self, Layer::Default | Layer::Numeric)
    }
}

/// Errors from layer transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("cannot cycle from {from} with session base {base}")]
    InvalidTransition { from: Layer, base: Layer },
}

/// Tracks the active layer and the layer a session returns to
#[derive(Debug, Clone, Default)]
pub struct LayerController {
    active: Layer,
    base: Layer,
}

impl LayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Layer {
        self.active
    }

    /// The layer the session started on (Default or Numeric)
    pub fn base(&self) -> Layer {
        self.base
    }

    /// Pick the base layer for a newly focused field and switch to it
    pub fn set_field_hint(&mut self, hint: FieldClass) {
        self.base = if hint.is_numeric() {
            Layer::Numeric
        } else {
            Layer::Default
        };
        self.active = self.base;
        log::debug!("field hint {} -> base layer {}", hint, self.base);
    }

    /// Advance Base -> Symbols -> SymbolsShifted -> Base
    pub fn cycle(&mut self) -> Result<Layer, LayerError> {
        let next = match self.active {
            Layer::Symbols => Layer::SymbolsShifted,
            Layer::SymbolsShifted => self.base,
            layer if layer == self.base => Layer::Symbols,
            from => {
                return Err(LayerError::InvalidTransition {
                    from,
                    base: self.base,
                })
            }
        };
        log::debug!("layer {} -> {}", self.active, next);
        self.active = next;
        Ok(next)
    }

    /// Mode-change key: base <-> Symbols, from either symbol layer back to base
    pub fn toggle_symbols(&mut self) -> Layer {
        let next = if self.active.is_symbols() {
            self.base
        } else {
            Layer::Symbols
        };
        log::debug!("layer {} -> {}", self.active, next);
        self.active = next;
        next
    }

    /// Symbols <-> SymbolsShifted; `None` outside the symbol layers
    pub fn toggle_shifted(&mut self) -> Option<Layer> {
        let next = match self.active {
            Layer::Symbols => Layer::SymbolsShifted,
            Layer::SymbolsShifted => Layer::Symbols,
            _ => return None,
        };
        self.active = next;
        Some(next)
    }

    /// Leave a symbol layer for the session base
    pub fn return_to_base(&mut self) -> bool {
        if self.active == self.base {
            return false;
        }
        self.active = self.base;
        true
    }

    /// Force the active layer back to the session base
    pub fn reset(&mut self) {
        self.active = self.base;
    }

    /// Forget the session entirely (base becomes Default)
    pub fn clear(&mut self) {
        self.base = Layer::Default;
        self.active = Layer::Default;
    }

    #[cfg(test)]
    pub(crate) fn force_active(&mut self, layer: Layer) {
        self.active = layer;
    }
}
