// Titan IME Settings Module
// User-tunable timing, key assignments and symbol layouts

#![cfg(feature = "settings")]

use std::path::{Path, PathBuf};

use crate::state::{DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_LOCK_COOLDOWN_MS};
use crate::transform::{KeyTranslationTable, LayoutError, ProcessorConfig, SymbolLayout};
use crate::Key;

/// Longest accepted double-tap window
pub const MAX_DOUBLE_TAP_WINDOW_MS: u64 = 5000;

/// Settings for titan-ime
///
/// Loaded from a TOML file (default: ~/.config/titan-ime/settings.toml).
/// Every section and field is optional; missing values keep their defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    double_tap_window_ms: u64,
    lock_cooldown_ms: u64,
    ctrl_alias: Option<Key>,
    cycle_keys: Vec<Key>,
    alt_chord_exclusions: Vec<Key>,
    primary: SymbolLayout,
    shifted: SymbolLayout,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid {name} layout: {source}")]
    InvalidLayout {
        name: &'static str,
        #[source]
        source: LayoutError,
    },
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    timing: Option<TimingSettings>,

    #[serde(default)]
    keys: Option<KeySettings>,

    #[serde(default)]
    symbols: Option<SymbolSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TimingSettings {
    #[serde(default)]
    double_tap_window_ms: Option<u64>,
    #[serde(default)]
    lock_cooldown_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct KeySettings {
    /// Key name, or "" / "none" to disable the alias
    #[serde(default)]
    ctrl_alias: Option<String>,
    #[serde(default)]
    cycle_keys: Option<Vec<String>>,
    #[serde(default)]
    alt_chord_exclusions: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SymbolSettings {
    #[serde(default)]
    primary: Option<String>,
    #[serde(default)]
    shifted: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with the built-in defaults
    pub fn new() -> Self {
        Self {
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            lock_cooldown_ms: DEFAULT_LOCK_COOLDOWN_MS,
            ctrl_alias: Some(Key::FN),
            cycle_keys: vec![Key::MENU],
            alt_chord_exclusions: vec![Key::SPACE, Key::BACKSPACE],
            primary: SymbolLayout::primary(),
            shifted: SymbolLayout::shifted(),
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(timing) = toml_settings.timing {
            if let Some(window) = timing.double_tap_window_ms {
                settings.double_tap_window_ms = window;
            }
            if let Some(cooldown) = timing.lock_cooldown_ms {
                settings.lock_cooldown_ms = cooldown;
            }
        }

        if let Some(keys) = toml_settings.keys {
            if let Some(alias) = keys.ctrl_alias {
                settings.ctrl_alias = parse_optional_key(&alias)?;
            }
            if let Some(cycle) = keys.cycle_keys {
                settings.cycle_keys = parse_key_list(&cycle)?;
            }
            if let Some(exclusions) = keys.alt_chord_exclusions {
                settings.alt_chord_exclusions = parse_key_list(&exclusions)?;
            }
        }

        if let Some(symbols) = toml_settings.symbols {
            if let Some(primary) = symbols.primary {
                settings.primary = parse_layout("primary", &primary)?;
            }
            if let Some(shifted) = symbols.shifted {
                settings.shifted = parse_layout("shifted", &shifted)?;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("titan-ime").join("settings.toml"))
    }

    /// Load from default location (~/.config/titan-ime/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Reload settings from the file they were loaded from
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.double_tap_window_ms == 0 || self.double_tap_window_ms > MAX_DOUBLE_TAP_WINDOW_MS {
            return Err(SettingsError::InvalidValue(format!(
                "double_tap_window_ms must be 1-{}ms, got {}",
                MAX_DOUBLE_TAP_WINDOW_MS, self.double_tap_window_ms
            )));
        }
        if self.lock_cooldown_ms > self.double_tap_window_ms {
            return Err(SettingsError::InvalidValue(format!(
                "lock_cooldown_ms ({}) must not exceed double_tap_window_ms ({})",
                self.lock_cooldown_ms, self.double_tap_window_ms
            )));
        }
        if let Some(alias) = self.ctrl_alias {
            if self.cycle_keys.contains(&alias) {
                return Err(SettingsError::InvalidKey(format!(
                    "{} cannot be both the Ctrl alias and a cycle key",
                    alias
                )));
            }
        }
        Ok(())
    }

    pub fn double_tap_window_ms(&self) -> u64 {
        self.double_tap_window_ms
    }

    pub fn lock_cooldown_ms(&self) -> u64 {
        self.lock_cooldown_ms
    }

    pub fn ctrl_alias(&self) -> Option<Key> {
        self.ctrl_alias
    }

    pub fn cycle_keys(&self) -> &[Key] {
        &self.cycle_keys
    }

    pub fn alt_chord_exclusions(&self) -> &[Key] {
        &self.alt_chord_exclusions
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Build the processor configuration these settings describe
    pub fn to_processor_config(&self) -> ProcessorConfig {
        let table = KeyTranslationTable::new(self.primary.clone(), self.shifted.clone())
            .with_alt_chord_exclusions(&self.alt_chord_exclusions);
        ProcessorConfig {
            double_tap_window_ms: self.double_tap_window_ms,
            lock_cooldown_ms: self.lock_cooldown_ms,
            ctrl_alias: self.ctrl_alias,
            cycle_keys: self.cycle_keys.clone(),
            table,
        }
    }
}

fn parse_key(name: &str) -> Result<Key, SettingsError> {
    name.trim().parse::<Key>().map_err(SettingsError::InvalidKey)
}

fn parse_optional_key(name: &str) -> Result<Option<Key>, SettingsError> {
    match name.trim() {
        "" => Ok(None),
        s if s.eq_ignore_ascii_case("none") => Ok(None),
        s => parse_key(s).map(Some),
    }
}

fn parse_key_list(names: &[String]) -> Result<Vec<Key>, SettingsError> {
    names.iter().map(|name| parse_key(name)).collect()
}

fn parse_layout(name: &'static str, layout: &str) -> Result<SymbolLayout, SettingsError> {
    SymbolLayout::parse(layout).map_err(|source| SettingsError::InvalidLayout { name, source })
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Titan IME Settings
# Place this file at: ~/.config/titan-ime/settings.toml

[timing]
# Two releases of Shift or Alt closer than this lock the modifier
double_tap_window_ms = 800
# A lock ignores single releases for this long after it was set
lock_cooldown_ms = 300

[keys]
# Extra physical key that acts as Ctrl ("none" to disable)
ctrl_alias = "FN"
# Keys that cycle Symbols -> Shifted symbols -> base on release
cycle_keys = ["MENU"]
# Keys never forwarded as an Alt chord while Alt is locked
alt_chord_exclusions = ["SPACE", "BACKSPACE"]

[symbols]
# 28 slots: Q..P, A..L, delete, Z..M, enter
primary = "1234567890@#$%&-+()⌫*\"':;!?⏎"
shifted = "~`|•√π÷×¶∆£¢€¥^°={}⌫\\©®™✓[]⏎"
"#
}
