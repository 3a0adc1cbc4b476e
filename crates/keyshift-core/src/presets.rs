//! Built-in keymaps.

use crate::config::KeymapConfig;
use crate::keycodes::KC_MINUS;
use crate::sequence::{SequenceKeyDef, Stroke};
use crate::shift_level::ShiftLevelKeyDef;
use crate::types::{KeyCode, ModifierSet};

// User keycodes of the kwf layout, in firmware order. 1 and 3 were the
// EEPROM reset and LED mode keys, which have no output.
pub const VRSN: KeyCode = KeyCode::user(2);
pub const LPAREN: KeyCode = KeyCode::user(4);
pub const RPAREN: KeyCode = KeyCode::user(5);
pub const LANGLE: KeyCode = KeyCode::user(6);
pub const RANGLE: KeyCode = KeyCode::user(7);
pub const PERIOD: KeyCode = KeyCode::user(8);
pub const COMMA: KeyCode = KeyCode::user(9);
pub const SLASH: KeyCode = KeyCode::user(10);
pub const ATSIGN: KeyCode = KeyCode::user(11);
pub const CARET: KeyCode = KeyCode::user(12);
pub const DOLLAR: KeyCode = KeyCode::user(13);

/// Keys with custom capitalization: each types its second character when Shift is held.
const CAPITALIZED: &[(KeyCode, char, char)] = &[
    (LPAREN, '(', '['),
    (RPAREN, ')', ']'),
    (LANGLE, '<', '{'),
    (RANGLE, '>', '}'),
    (PERIOD, '.', ':'),
    (COMMA, ',', ';'),
    (ATSIGN, '@', '#'),
    (CARET, '^', '&'),
    (DOLLAR, '$', '%'),
];

/// What the version key types, with or without Shift.
pub fn version_string() -> String {
    format!("ergodox_ez/kwf @ {}", env!("CARGO_PKG_VERSION"))
}

/// The ErgoDox "kwf" keymap: punctuation pairs chosen by Shift, `/` that
/// becomes an em-dash (Shift+Alt+`-` on macOS) while Shift is held, and a key
/// that types the keymap version.
pub fn kwf() -> KeymapConfig {
    let version = version_string();
    KeymapConfig {
        shift_level: CAPITALIZED
            .iter()
            .map(|&(id, low, high)| ShiftLevelKeyDef::chars(id, low, high))
            .collect(),
        sequence: vec![
            SequenceKeyDef {
                id: SLASH,
                low: vec![Stroke::char('/')],
                high: vec![Stroke::code(ModifierSet::LALT, KC_MINUS)],
            },
            SequenceKeyDef::text(VRSN, &version, &version),
        ],
        ..KeymapConfig::default()
    }
}
