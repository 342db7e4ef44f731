// Titan IME Input Layer
// Key events as delivered by the host, and the class of the focused field

mod event;
pub mod field_class;
mod soft_key;

pub use event::{HostModifiers, KeyEvent, Timestamp};
pub use field_class::FieldClass;
pub use soft_key::SoftKey;
