use crate::char_map::CharLookup;
use crate::matcher::{KeyMatcher, MatchContext};
use crate::modifiers::{with_shift, ModifierTracker};
use crate::types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What a level types: a raw keycode, or a character resolved through the
/// character table (which also decides whether Shift must be down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKey {
    Code(KeyCode),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub modifiers: ModifierSet,
    pub key: LevelKey,
}

impl Level {
    pub const fn code(modifiers: ModifierSet, code: KeyCode) -> Self {
        Self {
            modifiers,
            key: LevelKey::Code(code),
        }
    }

    pub const fn char(c: char) -> Self {
        Self {
            modifiers: ModifierSet::empty(),
            key: LevelKey::Char(c),
        }
    }
}

/// A key typing `low` normally and `high` while Shift is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftLevelKeyDef {
    pub id: KeyCode,
    pub low: Level,
    pub high: Level,
}

impl ShiftLevelKeyDef {
    pub fn chars(id: KeyCode, low: char, high: char) -> Self {
        Self {
            id,
            low: Level::char(low),
            high: Level::char(high),
        }
    }

    pub fn codes(
        id: KeyCode,
        low_modifiers: ModifierSet,
        low_code: KeyCode,
        high_modifiers: ModifierSet,
        high_code: KeyCode,
    ) -> Self {
        Self {
            id,
            low: Level::code(low_modifiers, low_code),
            high: Level::code(high_modifiers, high_code),
        }
    }
}

fn resolve(level: &Level, chars: &dyn CharLookup) -> Option<(KeyCode, Option<bool>)> {
    match level.key {
        LevelKey::Code(code) => Some((code, None)),
        LevelKey::Char(c) => chars.lookup(c).map(|(code, shift)| (code, Some(shift))),
    }
}

/// Handles one event for one definition. Returns false if the event is for another key.
///
/// On release both levels' codes and the union of both levels' modifiers are
/// released no matter which level was pressed: Shift may have changed between
/// press and release, and releasing only the level computed at release time
/// would leave the pressed one stuck. Modifiers the user is still holding are
/// pressed again afterwards.
pub fn on_event(
    def: &ShiftLevelKeyDef,
    shift_active: bool,
    tracker: &mut ModifierTracker,
    chars: &dyn CharLookup,
    event: &KeyEvent,
    out: &mut Vec<Action>,
) -> bool {
    if event.key != def.id {
        return false;
    }

    match event.edge {
        KeyEdge::Down => {
            let level = if shift_active { &def.high } else { &def.low };
            let Some((code, needs_shift)) = resolve(level, chars) else {
                warn!("{}: no keycode for {:?}", def.id, level.key);
                return true;
            };
            debug!("{}: press {} (shift={})", def.id, code, shift_active);
            match needs_shift {
                None => tracker.press_literal(level.modifiers, out),
                // Shift stays adjusted until this key's release so key repeat
                // keeps producing the same character.
                Some(needs_shift) => {
                    let desired = with_shift(tracker.live(), needs_shift) | level.modifiers;
                    tracker.transition(desired, out);
                }
            }
            out.push(Action::Press(code));
        }
        KeyEdge::Up => {
            // Both candidates, even when they share a code: a second release
            // of the same code is a no-op downstream.
            for level in [&def.high, &def.low] {
                if let Some((code, _)) = resolve(level, chars) {
                    out.push(Action::Release(code));
                }
            }
            tracker.release_literal(def.high.modifiers | def.low.modifiers, out);
            tracker.restore(out);
        }
    }
    true
}

pub struct ShiftLevelMatcher {
    defs: HashMap<KeyCode, ShiftLevelKeyDef>,
}

impl ShiftLevelMatcher {
    pub fn new(defs: Vec<ShiftLevelKeyDef>) -> Self {
        Self {
            defs: defs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }
}

impl KeyMatcher for ShiftLevelMatcher {
    fn kind(&self) -> &'static str {
        "shift-level"
    }

    fn claims(&self, key: KeyCode) -> bool {
        self.defs.contains_key(&key)
    }

    fn try_claim(&mut self, cx: &mut MatchContext<'_>, event: &KeyEvent) -> Option<Vec<Action>> {
        let def = self.defs.get(&event.key)?;
        let mut out = Vec::new();
        let shift_active = cx.tracker.shift_active();
        on_event(def, shift_active, cx.tracker, cx.chars, event, &mut out);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_map::UsAscii;
    use crate::keycodes::*;
    use std::time::Instant;

    fn make_event(key: KeyCode, edge: KeyEdge) -> KeyEvent {
        KeyEvent {
            key,
            edge,
            t: Instant::now(),
        }
    }

    fn period_colon_codes() -> ShiftLevelKeyDef {
        // ':' is Shift + ';'
        ShiftLevelKeyDef::codes(
            KeyCode::user(8),
            ModifierSet::empty(),
            KC_DOT,
            ModifierSet::LSHIFT,
            KC_SCOLON,
        )
    }

    fn run(
        def: &ShiftLevelKeyDef,
        tracker: &mut ModifierTracker,
        edge: KeyEdge,
    ) -> Vec<Action> {
        let mut out = Vec::new();
        let shift = tracker.shift_active();
        assert!(on_event(
            def,
            shift,
            tracker,
            &UsAscii,
            &make_event(def.id, edge),
            &mut out
        ));
        out
    }

    #[test]
    fn test_release_covers_both_levels() {
        let def = period_colon_codes();
        let mut tracker = ModifierTracker::new();

        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert_eq!(res, vec![Action::Press(KC_DOT)]);

        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![
                Action::Release(KC_SCOLON),
                Action::Release(KC_DOT),
                Action::Release(KC_LSHIFT),
            ]
        );
        assert!(tracker.live().is_empty());
    }

    #[test]
    fn test_high_level_with_shift_held() {
        let def = period_colon_codes();
        let mut tracker = ModifierTracker::new();
        let mut out = Vec::new();
        tracker.hold(ModifierSet::LSHIFT, &mut out);

        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert_eq!(res, vec![Action::Press(KC_LSHIFT), Action::Press(KC_SCOLON)]);

        // Shift is still physically down: it comes back after both codes are released.
        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![
                Action::Release(KC_SCOLON),
                Action::Release(KC_DOT),
                Action::Release(KC_LSHIFT),
                Action::Press(KC_LSHIFT),
            ]
        );
        assert!(tracker.is_settled());
    }

    #[test]
    fn test_shift_released_before_key() {
        // shift down, key down, shift up, key up
        let def = period_colon_codes();
        let mut tracker = ModifierTracker::new();
        let mut out = Vec::new();
        tracker.hold(ModifierSet::LSHIFT, &mut out);
        run(&def, &mut tracker, KeyEdge::Down);

        out.clear();
        tracker.unhold(ModifierSet::LSHIFT, &mut out);
        assert_eq!(out, vec![Action::Release(KC_LSHIFT)]);

        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert!(res.contains(&Action::Release(KC_SCOLON)));
        assert!(!res.contains(&Action::Press(KC_LSHIFT)));
        assert!(tracker.live().is_empty());
    }

    #[test]
    fn test_char_variant_lifts_shift_for_unshifted_char() {
        // '(' normally, '[' with Shift. '[' needs Shift up.
        let def = ShiftLevelKeyDef::chars(KeyCode::user(4), '(', '[');
        let mut tracker = ModifierTracker::new();
        let mut out = Vec::new();
        tracker.hold(ModifierSet::LSHIFT, &mut out);

        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert_eq!(
            res,
            vec![Action::Release(KC_LSHIFT), Action::Press(KC_LBRACKET)]
        );
        // Held for key repeat.
        assert!(!tracker.live().contains(ModifierSet::LSHIFT));

        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![
                Action::Release(KC_LBRACKET),
                Action::Release(KC_9),
                Action::Press(KC_LSHIFT),
            ]
        );
        assert!(tracker.is_settled());
    }

    #[test]
    fn test_char_variant_adds_shift_for_shifted_char() {
        let def = ShiftLevelKeyDef::chars(KeyCode::user(4), '(', '[');
        let mut tracker = ModifierTracker::new();

        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert_eq!(res, vec![Action::Press(KC_LSHIFT), Action::Press(KC_9)]);

        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![
                Action::Release(KC_LBRACKET),
                Action::Release(KC_9),
                Action::Release(KC_LSHIFT),
            ]
        );
    }

    #[test]
    fn test_char_variant_shared_code_released_twice() {
        // ',' and '<' share a keycode.
        let def = ShiftLevelKeyDef::chars(KeyCode::user(9), ',', '<');
        let mut tracker = ModifierTracker::new();
        run(&def, &mut tracker, KeyEdge::Down);
        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![Action::Release(KC_COMMA), Action::Release(KC_COMMA)]
        );
    }

    #[test]
    fn test_code_variant_shared_code_released_twice() {
        let def = ShiftLevelKeyDef::codes(
            KeyCode::user(9),
            ModifierSet::empty(),
            KC_COMMA,
            ModifierSet::LSHIFT,
            KC_COMMA,
        );
        let mut tracker = ModifierTracker::new();

        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert_eq!(res, vec![Action::Press(KC_COMMA)]);

        let res = run(&def, &mut tracker, KeyEdge::Up);
        assert_eq!(
            res,
            vec![
                Action::Release(KC_COMMA),
                Action::Release(KC_COMMA),
                Action::Release(KC_LSHIFT),
            ]
        );
        assert!(tracker.live().is_empty());
    }

    #[test]
    fn test_unknown_char_is_claimed_without_output() {
        let def = ShiftLevelKeyDef::chars(KeyCode::user(4), '\u{2014}', '-');
        let mut tracker = ModifierTracker::new();
        let res = run(&def, &mut tracker, KeyEdge::Down);
        assert!(res.is_empty());
    }
}
