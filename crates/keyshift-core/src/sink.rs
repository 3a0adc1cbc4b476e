use crate::types::{Action, KeyCode, ModifierSet};
use tracing::warn;

/// Receiver of the engine's output, normally the HID transport.
pub trait OutputSink {
    fn press(&mut self, code: KeyCode);
    fn release(&mut self, code: KeyCode);

    fn emit(&mut self, action: Action) {
        match action {
            Action::Press(code) => self.press(code),
            Action::Release(code) => self.release(code),
        }
    }
}

/// Records actions in order.
impl OutputSink for Vec<Action> {
    fn press(&mut self, code: KeyCode) {
        self.push(Action::Press(code));
    }

    fn release(&mut self, code: KeyCode) {
        self.push(Action::Release(code));
    }
}

pub const REPORT_KEYS: usize = 6;

/// 6-key-rollover boot keyboard report.
///
/// Pressing something already down and releasing something already up are
/// no-ops, as they are for the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HidReport {
    pub modifiers: ModifierSet,
    pub keys: [u8; REPORT_KEYS],
}

impl HidReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clear(&self) -> bool {
        self.modifiers.is_empty() && self.keys.iter().all(|k| *k == 0)
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys
            .iter()
            .filter(|k| **k != 0)
            .map(|k| KeyCode(*k as u16))
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        match ModifierSet::from_keycode(code) {
            Some(bit) => self.modifiers.contains(bit),
            None => self.pressed_keys().any(|k| k == code),
        }
    }

    /// Wire layout: modifier byte, reserved byte, six key slots.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0] = self.modifiers.bits();
        bytes[2..].copy_from_slice(&self.keys);
        bytes
    }
}

impl OutputSink for HidReport {
    fn press(&mut self, code: KeyCode) {
        if let Some(bit) = ModifierSet::from_keycode(code) {
            self.modifiers |= bit;
            return;
        }
        if code.0 == 0 || code.0 > 0xFF {
            warn!("{} is not a keyboard usage, not reported", code);
            return;
        }
        let usage = code.0 as u8;
        if self.keys.contains(&usage) {
            return;
        }
        match self.keys.iter_mut().find(|k| **k == 0) {
            Some(slot) => *slot = usage,
            None => warn!("report full, dropping {}", code),
        }
    }

    fn release(&mut self, code: KeyCode) {
        if let Some(bit) = ModifierSet::from_keycode(code) {
            self.modifiers -= bit;
            return;
        }
        if code.0 > 0xFF {
            return;
        }
        let usage = code.0 as u8;
        if let Some(slot) = self.keys.iter_mut().find(|k| **k == usage) {
            *slot = 0;
        }
    }
}
