// Titan IME
// Scripted replay of key-event sessions through the input-method core

pub mod replay;

pub use replay::{parse_script, Command, RecordingHost, Replay, ScriptError, ScriptLine};
