//! Keyboard shortcuts

use crate::{Command, ConfigError};
use std::fmt;
use std::str::FromStr;

/// A key press as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Parsed chord such as `Mod+S`. `Mod` is Ctrl or Cmd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    key: String,
    command_modifier: bool,
    shift: bool,
    alt: bool,
}

impl KeyChord {
    pub fn matches(&self, press: &KeyPress) -> bool {
        press.key.eq_ignore_ascii_case(&self.key)
            && (press.ctrl || press.meta) == self.command_modifier
            && press.shift == self.shift
            && press.alt == self.alt
    }
}

impl FromStr for KeyChord {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(ConfigError::KeyChord(s.to_string())),
        };

        let mut chord = KeyChord {
            key,
            command_modifier: false,
            shift: false,
            alt: false,
        };

        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "mod" | "ctrl" | "cmd" | "meta" => chord.command_modifier = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                _ => return Err(ConfigError::KeyChord(s.to_string())),
            }
        }

        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.command_modifier {
            f.write_str("Mod+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        f.write_str(&self.key)
    }
}

/// Chord → command bindings, first match wins
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyChord, Command)>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    pub fn bind(&mut self, chord: &str, command: Command) -> Result<(), ConfigError> {
        self.bindings.push((chord.parse()?, command));
        Ok(())
    }

    pub fn resolve(&self, press: &KeyPress) -> Option<&Command> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(press))
            .map(|(_, command)| command)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: vec![
                (
                    KeyChord {
                        key: "s".to_string(),
                        command_modifier: true,
                        shift: false,
                        alt: false,
                    },
                    Command::SaveNow,
                ),
                (
                    KeyChord {
                        key: "Enter".to_string(),
                        command_modifier: true,
                        shift: false,
                        alt: false,
                    },
                    Command::Run,
                ),
            ],
        }
    }
}
