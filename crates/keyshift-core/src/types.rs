use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// QMK-style 16-bit keycode.
///
/// Values up to 0xFF are HID keyboard usages and are sent to the host as-is.
/// Values from [`KeyCode::SAFE_RANGE`] upward are user keycodes: they only
/// exist as logical key ids and have to be claimed by a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "KeyCodeRepr", into = "KeyCodeRepr")]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const SAFE_RANGE: u16 = 0x7E40;

    pub const fn user(n: u16) -> Self {
        Self(Self::SAFE_RANGE + n)
    }

    pub const fn is_user(self) -> bool {
        self.0 >= Self::SAFE_RANGE
    }

    /// 0xE0..=0xE7 (LCTRL through RGUI).
    pub const fn is_modifier(self) -> bool {
        self.0 >= 0xE0 && self.0 <= 0xE7
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::keycodes::name_of(*self) {
            Some(name) => f.write_str(name),
            None if self.is_user() => write!(f, "USER_{}", self.0 - Self::SAFE_RANGE),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

/// Serialized form of a keycode: either a name (`"KC_A"`, `"USER_3"`) or a raw number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum KeyCodeRepr {
    Num(u16),
    Name(String),
}

impl TryFrom<KeyCodeRepr> for KeyCode {
    type Error = String;

    fn try_from(repr: KeyCodeRepr) -> Result<Self, Self::Error> {
        match repr {
            KeyCodeRepr::Num(n) => Ok(KeyCode(n)),
            KeyCodeRepr::Name(name) => {
                KeyCode::from_name(&name).ok_or_else(|| format!("unknown keycode name: {}", name))
            }
        }
    }
}

impl From<KeyCode> for KeyCodeRepr {
    fn from(code: KeyCode) -> Self {
        if crate::keycodes::name_of(code).is_some() || code.is_user() {
            KeyCodeRepr::Name(code.to_string())
        } else {
            KeyCodeRepr::Num(code.0)
        }
    }
}

bitflags! {
    /// One bit per HID modifier usage: bit `i` is keycode `0xE0 + i`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ModifierSet: u8 {
        const LCTRL  = 0b0000_0001;
        const LSHIFT = 0b0000_0010;
        const LALT   = 0b0000_0100;
        const LGUI   = 0b0000_1000;
        const RCTRL  = 0b0001_0000;
        const RSHIFT = 0b0010_0000;
        const RALT   = 0b0100_0000;
        const RGUI   = 0b1000_0000;

        const CTRL  = Self::LCTRL.bits() | Self::RCTRL.bits();
        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const ALT   = Self::LALT.bits() | Self::RALT.bits();
        const GUI   = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

impl ModifierSet {
    pub fn from_keycode(code: KeyCode) -> Option<Self> {
        if code.is_modifier() {
            Some(Self::from_bits_retain(1 << (code.0 - 0xE0)))
        } else {
            None
        }
    }

    /// Modifier keycodes of the set, lowest bit first.
    ///
    /// Composite flags like `SHIFT` expand to both sides.
    pub fn keycodes(self) -> impl Iterator<Item = KeyCode> {
        let bits = self.bits();
        (0..8u16)
            .filter(move |i| bits & (1 << i) != 0)
            .map(|i| KeyCode(0xE0 + i))
    }
}

/// A single modifier, used where exactly one bit is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierBit {
    #[serde(rename = "LCTRL")]
    LeftCtrl,
    #[serde(rename = "LSHIFT")]
    LeftShift,
    #[serde(rename = "LALT")]
    LeftAlt,
    #[serde(rename = "LGUI")]
    LeftGui,
    #[serde(rename = "RCTRL")]
    RightCtrl,
    #[serde(rename = "RSHIFT")]
    RightShift,
    #[serde(rename = "RALT")]
    RightAlt,
    #[serde(rename = "RGUI")]
    RightGui,
}

impl ModifierBit {
    pub const fn set(self) -> ModifierSet {
        match self {
            ModifierBit::LeftCtrl => ModifierSet::LCTRL,
            ModifierBit::LeftShift => ModifierSet::LSHIFT,
            ModifierBit::LeftAlt => ModifierSet::LALT,
            ModifierBit::LeftGui => ModifierSet::LGUI,
            ModifierBit::RightCtrl => ModifierSet::RCTRL,
            ModifierBit::RightShift => ModifierSet::RSHIFT,
            ModifierBit::RightAlt => ModifierSet::RALT,
            ModifierBit::RightGui => ModifierSet::RGUI,
        }
    }

    pub const fn keycode(self) -> KeyCode {
        KeyCode(0xE0 + self.set().bits().trailing_zeros() as u16)
    }
}

impl From<ModifierBit> for ModifierSet {
    fn from(bit: ModifierBit) -> Self {
        bit.set()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down,
    Up,
}

/// A debounced key transition as delivered by the matrix scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub edge: KeyEdge,
    pub t: Instant,
}

impl KeyEvent {
    pub fn new(key: KeyCode, pressed: bool, t: Instant) -> Self {
        Self {
            key,
            edge: if pressed { KeyEdge::Down } else { KeyEdge::Up },
            t,
        }
    }

    pub fn pressed(&self) -> bool {
        self.edge == KeyEdge::Down
    }
}

/// Primitive output handed to the HID transport. Order is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Press(KeyCode),
    Release(KeyCode),
}

impl Action {
    pub fn from_edge(code: KeyCode, edge: KeyEdge) -> Self {
        match edge {
            KeyEdge::Down => Action::Press(code),
            KeyEdge::Up => Action::Release(code),
        }
    }

    pub fn code(self) -> KeyCode {
        match self {
            Action::Press(c) | Action::Release(c) => c,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Press(c) => write!(f, "press({})", c),
            Action::Release(c) => write!(f, "release({})", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_keycodes_ascending() {
        let set = ModifierSet::RSHIFT | ModifierSet::LCTRL | ModifierSet::LALT;
        let codes: Vec<u16> = set.keycodes().map(|c| c.0).collect();
        assert_eq!(codes, vec![0xE0, 0xE2, 0xE5]);
    }

    #[test]
    fn test_composite_shift_expands() {
        let codes: Vec<u16> = ModifierSet::SHIFT.keycodes().map(|c| c.0).collect();
        assert_eq!(codes, vec![0xE1, 0xE5]);
    }

    #[test]
    fn test_modifier_bit_keycode() {
        assert_eq!(ModifierBit::LeftCtrl.keycode(), KeyCode(0xE0));
        assert_eq!(ModifierBit::LeftShift.keycode(), KeyCode(0xE1));
        assert_eq!(ModifierBit::RightGui.keycode(), KeyCode(0xE7));
        assert_eq!(
            ModifierSet::from_keycode(KeyCode(0xE6)),
            Some(ModifierSet::RALT)
        );
        assert_eq!(ModifierSet::from_keycode(KeyCode(0x04)), None);
    }

    #[test]
    fn test_keycode_serde_accepts_names_and_numbers() {
        let codes: Vec<KeyCode> = serde_json::from_str(r#"["KC_A", 5, "USER_2"]"#).unwrap();
        assert_eq!(codes, vec![KeyCode(0x04), KeyCode(0x05), KeyCode::user(2)]);
        assert!(serde_json::from_str::<KeyCode>(r#""KC_NOPE""#).is_err());
    }

    #[test]
    fn test_modifier_set_serde() {
        let set: ModifierSet = serde_json::from_str(r#""LSHIFT | LALT""#).unwrap();
        assert_eq!(set, ModifierSet::LSHIFT | ModifierSet::LALT);
        let empty: ModifierSet = serde_json::from_str(r#""""#).unwrap();
        assert!(empty.is_empty());
    }
}
