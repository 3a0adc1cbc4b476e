//! HID keyboard usages and their QMK-style names.

use crate::types::KeyCode;
use std::collections::HashMap;

pub const KC_NO: KeyCode = KeyCode(0x00);

pub const KC_A: KeyCode = KeyCode(0x04);
pub const KC_B: KeyCode = KeyCode(0x05);
pub const KC_C: KeyCode = KeyCode(0x06);
pub const KC_D: KeyCode = KeyCode(0x07);
pub const KC_E: KeyCode = KeyCode(0x08);
pub const KC_F: KeyCode = KeyCode(0x09);
pub const KC_G: KeyCode = KeyCode(0x0A);
pub const KC_H: KeyCode = KeyCode(0x0B);
pub const KC_I: KeyCode = KeyCode(0x0C);
pub const KC_J: KeyCode = KeyCode(0x0D);
pub const KC_K: KeyCode = KeyCode(0x0E);
pub const KC_L: KeyCode = KeyCode(0x0F);
pub const KC_M: KeyCode = KeyCode(0x10);
pub const KC_N: KeyCode = KeyCode(0x11);
pub const KC_O: KeyCode = KeyCode(0x12);
pub const KC_P: KeyCode = KeyCode(0x13);
pub const KC_Q: KeyCode = KeyCode(0x14);
pub const KC_R: KeyCode = KeyCode(0x15);
pub const KC_S: KeyCode = KeyCode(0x16);
pub const KC_T: KeyCode = KeyCode(0x17);
pub const KC_U: KeyCode = KeyCode(0x18);
pub const KC_V: KeyCode = KeyCode(0x19);
pub const KC_W: KeyCode = KeyCode(0x1A);
pub const KC_X: KeyCode = KeyCode(0x1B);
pub const KC_Y: KeyCode = KeyCode(0x1C);
pub const KC_Z: KeyCode = KeyCode(0x1D);

pub const KC_1: KeyCode = KeyCode(0x1E);
pub const KC_2: KeyCode = KeyCode(0x1F);
pub const KC_3: KeyCode = KeyCode(0x20);
pub const KC_4: KeyCode = KeyCode(0x21);
pub const KC_5: KeyCode = KeyCode(0x22);
pub const KC_6: KeyCode = KeyCode(0x23);
pub const KC_7: KeyCode = KeyCode(0x24);
pub const KC_8: KeyCode = KeyCode(0x25);
pub const KC_9: KeyCode = KeyCode(0x26);
pub const KC_0: KeyCode = KeyCode(0x27);

pub const KC_ENTER: KeyCode = KeyCode(0x28);
pub const KC_ESCAPE: KeyCode = KeyCode(0x29);
pub const KC_BSPACE: KeyCode = KeyCode(0x2A);
pub const KC_TAB: KeyCode = KeyCode(0x2B);
pub const KC_SPACE: KeyCode = KeyCode(0x2C);
pub const KC_MINUS: KeyCode = KeyCode(0x2D);
pub const KC_EQUAL: KeyCode = KeyCode(0x2E);
pub const KC_LBRACKET: KeyCode = KeyCode(0x2F);
pub const KC_RBRACKET: KeyCode = KeyCode(0x30);
pub const KC_BSLASH: KeyCode = KeyCode(0x31);
pub const KC_SCOLON: KeyCode = KeyCode(0x33);
pub const KC_QUOTE: KeyCode = KeyCode(0x34);
pub const KC_GRAVE: KeyCode = KeyCode(0x35);
pub const KC_COMMA: KeyCode = KeyCode(0x36);
pub const KC_DOT: KeyCode = KeyCode(0x37);
pub const KC_SLASH: KeyCode = KeyCode(0x38);
pub const KC_CAPSLOCK: KeyCode = KeyCode(0x39);

pub const KC_RIGHT: KeyCode = KeyCode(0x4F);
pub const KC_LEFT: KeyCode = KeyCode(0x50);
pub const KC_DOWN: KeyCode = KeyCode(0x51);
pub const KC_UP: KeyCode = KeyCode(0x52);

pub const KC_LCTRL: KeyCode = KeyCode(0xE0);
pub const KC_LSHIFT: KeyCode = KeyCode(0xE1);
pub const KC_LALT: KeyCode = KeyCode(0xE2);
pub const KC_LGUI: KeyCode = KeyCode(0xE3);
pub const KC_RCTRL: KeyCode = KeyCode(0xE4);
pub const KC_RSHIFT: KeyCode = KeyCode(0xE5);
pub const KC_RALT: KeyCode = KeyCode(0xE6);
pub const KC_RGUI: KeyCode = KeyCode(0xE7);

/// Canonical names, first entry per code wins when formatting.
const KEY_NAMES: &[(&str, u16)] = &[
    ("KC_NO", 0x00),
    ("KC_A", 0x04),
    ("KC_B", 0x05),
    ("KC_C", 0x06),
    ("KC_D", 0x07),
    ("KC_E", 0x08),
    ("KC_F", 0x09),
    ("KC_G", 0x0A),
    ("KC_H", 0x0B),
    ("KC_I", 0x0C),
    ("KC_J", 0x0D),
    ("KC_K", 0x0E),
    ("KC_L", 0x0F),
    ("KC_M", 0x10),
    ("KC_N", 0x11),
    ("KC_O", 0x12),
    ("KC_P", 0x13),
    ("KC_Q", 0x14),
    ("KC_R", 0x15),
    ("KC_S", 0x16),
    ("KC_T", 0x17),
    ("KC_U", 0x18),
    ("KC_V", 0x19),
    ("KC_W", 0x1A),
    ("KC_X", 0x1B),
    ("KC_Y", 0x1C),
    ("KC_Z", 0x1D),
    ("KC_1", 0x1E),
    ("KC_2", 0x1F),
    ("KC_3", 0x20),
    ("KC_4", 0x21),
    ("KC_5", 0x22),
    ("KC_6", 0x23),
    ("KC_7", 0x24),
    ("KC_8", 0x25),
    ("KC_9", 0x26),
    ("KC_0", 0x27),
    ("KC_ENTER", 0x28),
    ("KC_ENT", 0x28),
    ("KC_ESCAPE", 0x29),
    ("KC_ESC", 0x29),
    ("KC_BSPACE", 0x2A),
    ("KC_BSPC", 0x2A),
    ("KC_TAB", 0x2B),
    ("KC_SPACE", 0x2C),
    ("KC_SPC", 0x2C),
    ("KC_MINUS", 0x2D),
    ("KC_MINS", 0x2D),
    ("KC_EQUAL", 0x2E),
    ("KC_EQL", 0x2E),
    ("KC_LBRACKET", 0x2F),
    ("KC_LBRC", 0x2F),
    ("KC_RBRACKET", 0x30),
    ("KC_RBRC", 0x30),
    ("KC_BSLASH", 0x31),
    ("KC_BSLS", 0x31),
    ("KC_NONUS_HASH", 0x32),
    ("KC_SCOLON", 0x33),
    ("KC_SCLN", 0x33),
    ("KC_QUOTE", 0x34),
    ("KC_QUOT", 0x34),
    ("KC_GRAVE", 0x35),
    ("KC_GRV", 0x35),
    ("KC_COMMA", 0x36),
    ("KC_COMM", 0x36),
    ("KC_DOT", 0x37),
    ("KC_SLASH", 0x38),
    ("KC_SLSH", 0x38),
    ("KC_CAPSLOCK", 0x39),
    ("KC_F1", 0x3A),
    ("KC_F2", 0x3B),
    ("KC_F3", 0x3C),
    ("KC_F4", 0x3D),
    ("KC_F5", 0x3E),
    ("KC_F6", 0x3F),
    ("KC_F7", 0x40),
    ("KC_F8", 0x41),
    ("KC_F9", 0x42),
    ("KC_F10", 0x43),
    ("KC_F11", 0x44),
    ("KC_F12", 0x45),
    ("KC_PSCREEN", 0x46),
    ("KC_SCROLLLOCK", 0x47),
    ("KC_PAUSE", 0x48),
    ("KC_INSERT", 0x49),
    ("KC_HOME", 0x4A),
    ("KC_PGUP", 0x4B),
    ("KC_DELETE", 0x4C),
    ("KC_DEL", 0x4C),
    ("KC_END", 0x4D),
    ("KC_PGDOWN", 0x4E),
    ("KC_RIGHT", 0x4F),
    ("KC_LEFT", 0x50),
    ("KC_DOWN", 0x51),
    ("KC_UP", 0x52),
    ("KC_LCTRL", 0xE0),
    ("KC_LCTL", 0xE0),
    ("KC_LSHIFT", 0xE1),
    ("KC_LSFT", 0xE1),
    ("KC_LALT", 0xE2),
    ("KC_LGUI", 0xE3),
    ("KC_LCMD", 0xE3),
    ("KC_RCTRL", 0xE4),
    ("KC_RCTL", 0xE4),
    ("KC_RSHIFT", 0xE5),
    ("KC_RSFT", 0xE5),
    ("KC_RALT", 0xE6),
    ("KC_RGUI", 0xE7),
    ("KC_RCMD", 0xE7),
];

lazy_static::lazy_static! {
    static ref NAME_TO_CODE: HashMap<&'static str, u16> = {
        let mut map = HashMap::new();
        for (name, code) in KEY_NAMES {
            map.insert(*name, *code);
        }
        map
    };
    static ref CODE_TO_NAME: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        for (name, code) in KEY_NAMES {
            map.entry(*code).or_insert(*name);
        }
        map
    };
}

pub fn name_of(code: KeyCode) -> Option<&'static str> {
    CODE_TO_NAME.get(&code.0).copied()
}

impl KeyCode {
    /// Resolves `KC_A`, `a`, `LSFT`, `USER_3` and similar spellings.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let upper = name.trim().to_ascii_uppercase();
        if let Some(n) = upper.strip_prefix("USER_") {
            return n
                .parse::<u16>()
                .ok()
                .filter(|n| *n <= u16::MAX - KeyCode::SAFE_RANGE)
                .map(KeyCode::user);
        }
        if let Some(code) = NAME_TO_CODE.get(upper.as_str()) {
            return Some(KeyCode(*code));
        }
        let prefixed = format!("KC_{}", upper);
        NAME_TO_CODE.get(prefixed.as_str()).map(|c| KeyCode(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_spellings() {
        assert_eq!(KeyCode::from_name("KC_A"), Some(KC_A));
        assert_eq!(KeyCode::from_name("a"), Some(KC_A));
        assert_eq!(KeyCode::from_name("lsft"), Some(KC_LSHIFT));
        assert_eq!(KeyCode::from_name("KC_SCLN"), Some(KC_SCOLON));
        assert_eq!(KeyCode::from_name("USER_4"), Some(KeyCode::user(4)));
        assert_eq!(KeyCode::from_name("bogus"), None);
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(KC_ENTER.to_string(), "KC_ENTER");
        assert_eq!(KC_LSHIFT.to_string(), "KC_LSHIFT");
        assert_eq!(KeyCode::user(7).to_string(), "USER_7");
        assert_eq!(KeyCode(0x1234).to_string(), "0x1234");
    }
}
