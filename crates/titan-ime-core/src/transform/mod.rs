// Titan IME Transform Module
// Turning key events into output actions

pub mod processor;
pub mod translate;

pub use processor::{KeyEventProcessor, ProcessorConfig};
pub use translate::{
    slot_for_key, KeyTranslationTable, LayoutError, SymbolLayout, DEFAULT_SYMBOLS,
    DEFAULT_SYMBOLS_SHIFTED, LAYOUT_SLOTS,
};
