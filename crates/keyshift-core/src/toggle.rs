use crate::matcher::{KeyMatcher, MatchContext};
use crate::modifiers::ModifierTracker;
use crate::types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A key that forces the live modifiers to `high_modifiers` (and types
/// `high_code`) when every bit of `threshold` is held, or to `low_modifiers`
/// (typing `low_code`) otherwise. The override lasts for the key's own action
/// only.
///
/// Every bit of `threshold` must be held, so `"SHIFT"` means both Shift keys.
/// Shift-level keys instead accept either side, which a single-bit threshold
/// like `LSHIFT` only matches for the left key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleKeyDef {
    pub id: KeyCode,
    pub threshold: ModifierSet,
    #[serde(default)]
    pub low_modifiers: ModifierSet,
    pub low_code: KeyCode,
    #[serde(default)]
    pub high_modifiers: ModifierSet,
    pub high_code: KeyCode,
}

/// Handles one event for one definition. Returns false if the event is for another key.
///
/// The live modifiers are moved to the desired set with a minimal diff, the
/// code is pressed or released, and the live set is moved back to exactly the
/// bits it had on entry. A real modifier pressed inside that window is masked
/// until the next event.
pub fn on_event(
    def: &ToggleKeyDef,
    tracker: &mut ModifierTracker,
    event: &KeyEvent,
    out: &mut Vec<Action>,
) -> bool {
    if event.key != def.id {
        return false;
    }

    let entry = tracker.live();
    let hi_state = tracker.held().contains(def.threshold);
    let (desired, code, other) = if hi_state {
        (def.high_modifiers, def.high_code, def.low_code)
    } else {
        (def.low_modifiers, def.low_code, def.high_code)
    };
    debug!(
        "{}: {} level, {:?} -> {:?}",
        def.id,
        if hi_state { "high" } else { "low" },
        entry,
        desired
    );

    tracker.transition(desired, out);
    match event.edge {
        KeyEdge::Down => out.push(Action::Press(code)),
        KeyEdge::Up => {
            out.push(Action::Release(code));
            // The threshold may have changed since the press.
            if other != code {
                out.push(Action::Release(other));
            }
        }
    }
    tracker.transition(entry, out);
    true
}

pub struct ToggleMatcher {
    defs: HashMap<KeyCode, ToggleKeyDef>,
}

impl ToggleMatcher {
    pub fn new(defs: Vec<ToggleKeyDef>) -> Self {
        Self {
            defs: defs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }
}

impl KeyMatcher for ToggleMatcher {
    fn kind(&self) -> &'static str {
        "toggle"
    }

    fn claims(&self, key: KeyCode) -> bool {
        self.defs.contains_key(&key)
    }

    fn try_claim(&mut self, cx: &mut MatchContext<'_>, event: &KeyEvent) -> Option<Vec<Action>> {
        let def = self.defs.get(&event.key)?;
        let mut out = Vec::new();
        on_event(def, cx.tracker, event, &mut out);
        Some(out)
    }
}
