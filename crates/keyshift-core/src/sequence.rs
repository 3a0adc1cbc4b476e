use crate::char_map::CharLookup;
use crate::matcher::{KeyMatcher, MatchContext};
use crate::modifiers::{with_shift, ModifierTracker};
use crate::shift_level::LevelKey;
use crate::types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One complete tap inside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub modifiers: ModifierSet,
    pub key: LevelKey,
}

impl Stroke {
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

/// A key that types a short sequence of taps on press, choosing `high` while
/// Shift is held. Nothing is left down afterwards, so the release only has to
/// be swallowed. No key repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceKeyDef {
    pub id: KeyCode,
    #[serde(default)]
    pub low: Vec<Stroke>,
    #[serde(default)]
    pub high: Vec<Stroke>,
}

impl SequenceKeyDef {
    pub fn text(id: KeyCode, low: &str, high: &str) -> Self {
        Self {
            id,
            low: low.chars().map(Stroke::char).collect(),
            high: high.chars().map(Stroke::char).collect(),
        }
    }
}

pub fn on_event(
    def: &SequenceKeyDef,
    tracker: &mut ModifierTracker,
    chars: &dyn CharLookup,
    event: &KeyEvent,
    out: &mut Vec<Action>,
) -> bool {
    if event.key != def.id {
        return false;
    }
    if event.edge == KeyEdge::Up {
        return true;
    }

    let strokes = if tracker.shift_active() {
        &def.high
    } else {
        &def.low
    };
    debug!("{}: typing {} strokes", def.id, strokes.len());

    let entry = tracker.live();
    for stroke in strokes {
        let (code, desired) = match stroke.key {
            // Code strokes add their modifiers to whatever is live.
            LevelKey::Code(code) => (code, entry | stroke.modifiers),
            LevelKey::Char(c) => match chars.lookup(c) {
                Some((code, needs_shift)) => {
                    (code, with_shift(entry, needs_shift) | stroke.modifiers)
                }
                None => {
                    warn!("{}: no keycode for {:?}, skipped", def.id, c);
                    continue;
                }
            },
        };
        tracker.transition(desired, out);
        out.push(Action::Press(code));
        out.push(Action::Release(code));
    }
    tracker.transition(entry, out);
    true
}

pub struct SequenceMatcher {
    defs: HashMap<KeyCode, SequenceKeyDef>,
}

impl SequenceMatcher {
    pub fn new(defs: Vec<SequenceKeyDef>) -> Self {
        Self {
            defs: defs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }
}

impl KeyMatcher for SequenceMatcher {
    fn kind(&self) -> &'static str {
        "sequence"
    }

    fn claims(&self, key: KeyCode) -> bool {
        self.defs.contains_key(&key)
    }

    fn try_claim(&mut self, cx: &mut MatchContext<'_>, event: &KeyEvent) -> Option<Vec<Action>> {
        let def = self.defs.get(&event.key)?;
        let mut out = Vec::new();
        on_event(def, cx.tracker, cx.chars, event, &mut out);
        Some(out)
    }
}
