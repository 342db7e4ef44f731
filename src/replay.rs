// Titan IME Replay
// Scripted key-event sessions run against the processor and a recording host

use std::convert::Infallible;
use std::str::FromStr;

use titan_ime_core::{
    dispatch, Feedback, FieldClass, HostModifiers, InputHost, Key, KeyDirection, KeyEvent,
    KeyEventProcessor, Layer, ModifierMask, OutputAction, ProcessorConfig, SoftKey, Timestamp,
};

/// Errors from parsing or replaying a script, tagged with the 1-based line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: missing {what}")]
    MissingArgument { line: usize, what: &'static str },

    #[error("line {line}: unknown key '{name}'")]
    UnknownKey { line: usize, name: String },

    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    #[error("line {line}: unknown on-screen key '{token}'")]
    UnknownSoftKey { line: usize, token: String },

    #[error("line {line}: unknown field class '{name}'")]
    UnknownField { line: usize, name: String },

    #[error("line {line}: unexpected '{token}'")]
    UnexpectedToken { line: usize, token: String },

    #[error("line {line}: key event outside a session (missing 'start')")]
    OutsideSession { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Verb {
    Start,
    End,
    Show,
    Cycle,
    Down,
    Up,
    Tap,
    Soft,
}

/// One parsed script instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start(FieldClass),
    End,
    Show,
    Cycle,
    Event(KeyEvent),
    /// Down and up at the same instant
    Tap(Key, Timestamp),
    /// On-screen key press
    Soft(SoftKey),
}

/// A command and the script line it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(script: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let command = parse_command(line, text)?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

fn parse_command(line: usize, text: &str) -> Result<Command, ScriptError> {
    let mut tokens = text.split_whitespace();
    let word = tokens.next().unwrap_or_default();
    let verb = Verb::from_str(&word.to_lowercase()).map_err(|_| ScriptError::UnknownCommand {
        line,
        command: word.to_string(),
    })?;

    let command = match verb {
        Verb::Start => {
            let name = tokens.next().ok_or(ScriptError::MissingArgument {
                line,
                what: "field class",
            })?;
            let field = FieldClass::from_str(name).ok_or_else(|| ScriptError::UnknownField {
                line,
                name: name.to_string(),
            })?;
            Command::Start(field)
        }
        Verb::End => Command::End,
        Verb::Show => Command::Show,
        Verb::Cycle => Command::Cycle,
        Verb::Soft => Command::Soft(parse_soft_key(line, tokens.next())?),
        Verb::Down | Verb::Up | Verb::Tap => {
            let key = parse_key(line, tokens.next())?;
            let timestamp = parse_timestamp(line, tokens.next())?;
            if verb == Verb::Tap {
                Command::Tap(key, timestamp)
            } else {
                let modifiers = parse_modifiers(line, &mut tokens)?;
                let direction = if verb == Verb::Down {
                    KeyDirection::Down
                } else {
                    KeyDirection::Up
                };
                Command::Event(KeyEvent::new(key, direction, timestamp, modifiers))
            }
        }
    };

    if let Some(token) = tokens.next() {
        return Err(ScriptError::UnexpectedToken {
            line,
            token: token.to_string(),
        });
    }
    Ok(command)
}

fn parse_key(line: usize, token: Option<&str>) -> Result<Key, ScriptError> {
    let name = token.ok_or(ScriptError::MissingArgument { line, what: "key" })?;
    name.parse::<Key>().map_err(|_| ScriptError::UnknownKey {
        line,
        name: name.to_string(),
    })
}

/// A view key code, or a single glyph
fn parse_soft_key(line: usize, token: Option<&str>) -> Result<SoftKey, ScriptError> {
    let token = token.ok_or(ScriptError::MissingArgument {
        line,
        what: "on-screen key",
    })?;
    let mut chars = token.chars();
    let key = match (token.parse::<i32>(), chars.next(), chars.next()) {
        (Ok(code), _, _) => SoftKey::from_code(code),
        (Err(_), Some(ch), None) => Some(SoftKey::Char(ch)),
        _ => None,
    };
    key.ok_or_else(|| ScriptError::UnknownSoftKey {
        line,
        token: token.to_string(),
    })
}

fn parse_timestamp(line: usize, token: Option<&str>) -> Result<Timestamp, ScriptError> {
    let value = token.ok_or(ScriptError::MissingArgument {
        line,
        what: "timestamp",
    })?;
    let millis = value
        .trim_end_matches("ms")
        .parse::<u64>()
        .map_err(|_| ScriptError::InvalidTimestamp {
            line,
            value: value.to_string(),
        })?;
    Ok(Timestamp::from_millis(millis))
}

fn parse_modifiers<'a>(
    line: usize,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<HostModifiers, ScriptError> {
    let mut modifiers = HostModifiers::NONE;
    for token in tokens {
        match token.to_lowercase().as_str() {
            "alt" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            _ => {
                return Err(ScriptError::UnexpectedToken {
                    line,
                    token: token.to_string(),
                })
            }
        }
    }
    Ok(modifiers)
}

/// Host that keeps committed text and a log of every call
#[derive(Debug, Default)]
pub struct RecordingHost {
    text: String,
    calls: Vec<String>,
    layer: Layer,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything committed so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Drain the calls recorded since the last drain
    pub fn take_calls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }

    /// The last layer the host was asked to show
    pub fn shown_layer(&self) -> Layer {
        self.layer
    }
}

impl InputHost for RecordingHost {
    type Error = Infallible;

    fn commit_text(&mut self, text: &str) -> Result<(), Infallible> {
        self.text.push_str(text);
        self.calls.push(format!("commit {:?}", text));
        Ok(())
    }

    fn send_key_with_modifiers(&mut self, key: Key, mask: ModifierMask) -> Result<(), Infallible> {
        self.calls.push(format!("send {}+{}", mask, key));
        Ok(())
    }

    fn send_raw_key(&mut self, key: Key) -> Result<(), Infallible> {
        self.calls.push(format!("send {}", key));
        Ok(())
    }

    fn perform_editor_action(&mut self) -> Result<(), Infallible> {
        self.calls.push("editor action".to_string());
        Ok(())
    }

    fn clear_meta_states(&mut self, mask: ModifierMask) -> Result<(), Infallible> {
        self.calls.push(format!("clear meta {}", mask));
        Ok(())
    }

    fn hide_keyboard(&mut self) -> Result<(), Infallible> {
        self.calls.push("hide keyboard".to_string());
        Ok(())
    }

    fn show_layer(&mut self, layer: Layer) -> Result<(), Infallible> {
        self.layer = layer;
        self.calls.push(format!("show {}", layer));
        Ok(())
    }

    fn feedback(&mut self, signal: Feedback) -> Result<(), Infallible> {
        self.calls.push(format!("feedback {}", signal));
        Ok(())
    }
}

/// Drives a processor through script commands and reports each step
#[derive(Debug)]
pub struct Replay {
    processor: KeyEventProcessor,
    host: RecordingHost,
}

impl Replay {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            processor: KeyEventProcessor::new(config),
            host: RecordingHost::new(),
        }
    }

    pub fn processor(&self) -> &KeyEventProcessor {
        &self.processor
    }

    pub fn host(&self) -> &RecordingHost {
        &self.host
    }

    /// Run every line, returning one report line per processed step
    pub fn run(&mut self, script: &[ScriptLine]) -> Result<Vec<String>, ScriptError> {
        let mut report = Vec::new();
        for line in script {
            self.step(line, &mut report)?;
        }
        Ok(report)
    }

    fn step(&mut self, script_line: &ScriptLine, report: &mut Vec<String>) -> Result<(), ScriptError> {
        let line = script_line.line;
        match script_line.command {
            Command::Start(field) => {
                self.processor.start_session(field);
                report.push(format!(
                    "{:>4}: start {} -> {}",
                    line,
                    field,
                    self.processor.active_layer()
                ));
            }
            Command::End => {
                self.processor.end_session();
                report.push(format!("{:>4}: end", line));
            }
            Command::Show => {
                self.require_session(line)?;
                self.processor.show_view();
                report.push(format!("{:>4}: show -> {}", line, self.processor.active_layer()));
            }
            Command::Cycle => {
                self.require_session(line)?;
                let action = self.processor.on_layer_cycle_requested();
                self.apply(line, "cycle".to_string(), action, report);
            }
            Command::Event(event) => {
                self.require_session(line)?;
                let action = self.processor.handle(&event);
                self.apply(line, event.to_string(), action, report);
            }
            Command::Soft(key) => {
                self.require_session(line)?;
                let action = self.processor.on_soft_key(key);
                self.apply(line, format!("soft {}", key), action, report);
            }
            Command::Tap(key, timestamp) => {
                self.require_session(line)?;
                for direction in [KeyDirection::Down, KeyDirection::Up] {
                    let event = KeyEvent::new(key, direction, timestamp, HostModifiers::NONE);
                    let action = self.processor.handle(&event);
                    self.apply(line, event.to_string(), action, report);
                }
            }
        }
        Ok(())
    }

    fn require_session(&self, line: usize) -> Result<(), ScriptError> {
        if self.processor.in_session() {
            Ok(())
        } else {
            Err(ScriptError::OutsideSession { line })
        }
    }

    fn apply(&mut self, line: usize, what: String, action: OutputAction, report: &mut Vec<String>) {
        let effects = self.processor.take_effects();
        // The recording host cannot fail
        let handled = match dispatch(&mut self.host, action, effects) {
            Ok(handled) => handled,
            Err(never) => match never {},
        };
        let calls = self.host.take_calls();
        let mut entry = format!("{:>4}: {} -> {}", line, what, action);
        if !handled {
            entry.push_str(" (host default)");
        }
        if !calls.is_empty() {
            entry.push_str(&format!(" [{}]", calls.join(", ")));
        }
        report.push(entry);
    }
}
