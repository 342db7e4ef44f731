// Titan IME Output Layer
// Actions and effects produced by the processor, and the host they are applied to

mod action;
pub mod host;

pub use action::{Effect, Feedback, OutputAction};
pub use host::{dispatch, InputHost};
