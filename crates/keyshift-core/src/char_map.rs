use crate::keycodes::*;
use crate::types::KeyCode;

/// Maps an output character to the keycode that types it and whether Shift
/// has to be down for it.
pub trait CharLookup {
    fn lookup(&self, c: char) -> Option<(KeyCode, bool)>;
}

/// US ANSI layout, printable ASCII plus a few control characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsAscii;

impl CharLookup for UsAscii {
    fn lookup(&self, c: char) -> Option<(KeyCode, bool)> {
        ascii_to_keycode(c)
    }
}

fn ascii_to_keycode(c: char) -> Option<(KeyCode, bool)> {
    let plain = |k| Some((k, false));
    let shifted = |k| Some((k, true));
    match c {
        'a'..='z' => plain(KeyCode(KC_A.0 + (c as u16 - 'a' as u16))),
        'A'..='Z' => shifted(KeyCode(KC_A.0 + (c as u16 - 'A' as u16))),
        '1'..='9' => plain(KeyCode(KC_1.0 + (c as u16 - '1' as u16))),
        '0' => plain(KC_0),
        '!' => shifted(KC_1),
        '@' => shifted(KC_2),
        '#' => shifted(KC_3),
        '$' => shifted(KC_4),
        '%' => shifted(KC_5),
        '^' => shifted(KC_6),
        '&' => shifted(KC_7),
        '*' => shifted(KC_8),
        '(' => shifted(KC_9),
        ')' => shifted(KC_0),
        ' ' => plain(KC_SPACE),
        '-' => plain(KC_MINUS),
        '_' => shifted(KC_MINUS),
        '=' => plain(KC_EQUAL),
        '+' => shifted(KC_EQUAL),
        '[' => plain(KC_LBRACKET),
        '{' => shifted(KC_LBRACKET),
        ']' => plain(KC_RBRACKET),
        '}' => shifted(KC_RBRACKET),
        '\\' => plain(KC_BSLASH),
        '|' => shifted(KC_BSLASH),
        ';' => plain(KC_SCOLON),
        ':' => shifted(KC_SCOLON),
        '\'' => plain(KC_QUOTE),
        '"' => shifted(KC_QUOTE),
        '`' => plain(KC_GRAVE),
        '~' => shifted(KC_GRAVE),
        ',' => plain(KC_COMMA),
        '<' => shifted(KC_COMMA),
        '.' => plain(KC_DOT),
        '>' => shifted(KC_DOT),
        '/' => plain(KC_SLASH),
        '?' => shifted(KC_SLASH),
        '\n' => plain(KC_ENTER),
        '\t' => plain(KC_TAB),
        '\u{0008}' => plain(KC_BSPACE), // BS
        '\u{001B}' => plain(KC_ESCAPE), // ESC
        _ => None,
    }
}
