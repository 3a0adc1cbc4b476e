use crate::char_map::{CharLookup, UsAscii};
use crate::mod_tap::ModTapKeyDef;
use crate::sequence::SequenceKeyDef;
use crate::shift_level::{LevelKey, ShiftLevelKeyDef};
use crate::toggle::ToggleKeyDef;
use crate::types::KeyCode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Problems found when a keymap is loaded. None of these can happen at
/// event time.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("key {key} is defined as {first} and as {second}")]
    DuplicateKey {
        key: KeyCode,
        first: &'static str,
        second: &'static str,
    },

    #[error("{kind} key {key} uses a modifier keycode as its id")]
    ModifierAsId { kind: &'static str, key: KeyCode },

    #[error("{kind} key {key} outputs {ch:?}, which has no keycode")]
    UnmappedChar {
        kind: &'static str,
        key: KeyCode,
        ch: char,
    },

    #[error("sequence key {0} has no strokes")]
    EmptySequence(KeyCode),

    #[error("tap timeout must be positive")]
    ZeroTimeout,
}

/// Static definition tables, supplied once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
    pub mod_tap: Vec<ModTapKeyDef>,
    pub shift_level: Vec<ShiftLevelKeyDef>,
    pub toggle: Vec<ToggleKeyDef>,
    pub sequence: Vec<SequenceKeyDef>,
}

fn default_tap_timeout_ms() -> u64 {
    300
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            tap_timeout_ms: default_tap_timeout_ms(),
            mod_tap: Vec::new(),
            shift_level: Vec::new(),
            toggle: Vec::new(),
            sequence: Vec::new(),
        }
    }
}

impl KeymapConfig {
    pub fn tap_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_timeout_ms)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.validate_with(&UsAscii)
    }

    pub fn validate_with(&self, chars: &dyn CharLookup) -> std::result::Result<(), ConfigError> {
        if self.tap_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        // 1. Ids: unique across all tables and never a literal modifier.
        let ids = self
            .mod_tap
            .iter()
            .map(|d| (d.id, "mod-tap"))
            .chain(self.shift_level.iter().map(|d| (d.id, "shift-level")))
            .chain(self.toggle.iter().map(|d| (d.id, "toggle")))
            .chain(self.sequence.iter().map(|d| (d.id, "sequence")));

        let mut seen: HashMap<KeyCode, &'static str> = HashMap::new();
        for (key, kind) in ids {
            if key.is_modifier() {
                return Err(ConfigError::ModifierAsId { kind, key });
            }
            if let Some(first) = seen.insert(key, kind) {
                return Err(ConfigError::DuplicateKey {
                    key,
                    first,
                    second: kind,
                });
            }
        }

        // 2. Every character output must be typeable.
        let check = |kind: &'static str, key: KeyCode, level_key: &LevelKey| {
            match *level_key {
                LevelKey::Char(ch) if chars.lookup(ch).is_none() => {
                    Err(ConfigError::UnmappedChar { kind, key, ch })
                }
                _ => Ok(()),
            }
        };
        for def in &self.shift_level {
            check("shift-level", def.id, &def.low.key)?;
            check("shift-level", def.id, &def.high.key)?;
        }
        for def in &self.sequence {
            if def.low.is_empty() && def.high.is_empty() {
                return Err(ConfigError::EmptySequence(def.id));
            }
            for stroke in def.low.iter().chain(def.high.iter()) {
                check("sequence", def.id, &stroke.key)?;
            }
        }

        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<KeymapConfig> {
    let config: KeymapConfig =
        serde_json::from_str(content).context("keymap is not valid JSON for this schema")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<KeymapConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read keymap {}", path.display()))?;
    let config =
        parse_config(&content).with_context(|| format!("invalid keymap {}", path.display()))?;
    info!(
        "Loaded keymap {}: {} mod-tap, {} shift-level, {} toggle, {} sequence keys.",
        path.display(),
        config.mod_tap.len(),
        config.shift_level.len(),
        config.toggle.len(),
        config.sequence.len()
    );
    Ok(config)
}
