use crate::matcher::{KeyMatcher, MatchContext};
use crate::modifiers::ModifierTracker;
use crate::types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierBit, ModifierSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A key that holds `hold_modifier` while down and types `tap_code` (wrapped
/// in `tap_modifiers`) if released before the tap timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModTapKeyDef {
    pub id: KeyCode,
    pub hold_modifier: ModifierBit,
    #[serde(default)]
    pub tap_modifiers: ModifierSet,
    pub tap_code: KeyCode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModTapKeyState {
    pub is_armed: bool,
    pub press_instant: Option<Instant>,
}

/// Handles one event for one definition. Returns false if the event is for another key.
///
/// Hold vs. tap is decided at release time from the elapsed duration only.
/// Other keys pressed in between do not cancel the tap, so rolled sequences
/// like down-A, down-B, up-A, up-B still produce A's tap.
pub fn on_event(
    def: &ModTapKeyDef,
    state: &mut ModTapKeyState,
    tracker: &mut ModifierTracker,
    event: &KeyEvent,
    timeout: Duration,
    out: &mut Vec<Action>,
) -> bool {
    if event.key != def.id {
        return false;
    }

    match event.edge {
        KeyEdge::Down => {
            tracker.hold(def.hold_modifier.set(), out);
            state.is_armed = true;
            state.press_instant = Some(event.t);
        }
        KeyEdge::Up => {
            tracker.unhold(def.hold_modifier.set(), out);

            let armed = std::mem::take(&mut state.is_armed);
            let elapsed = state
                .press_instant
                .take()
                .map(|t0| event.t.saturating_duration_since(t0));

            match elapsed {
                Some(elapsed) if armed && elapsed < timeout => {
                    debug!("{}: tap after {:?}", def.id, elapsed);
                    // The tap's own modifiers go on top of whatever is live and
                    // come off again afterwards.
                    let before = tracker.live();
                    tracker.transition(before | def.tap_modifiers, out);
                    out.push(Action::Press(def.tap_code));
                    out.push(Action::Release(def.tap_code));
                    tracker.transition(before, out);
                }
                Some(elapsed) => debug!("{}: held {:?}, no tap", def.id, elapsed),
                None => debug!("{}: release without press", def.id),
            }
        }
    }
    true
}

/// Definition table plus one state record per definition, indexed by key id.
pub struct ModTapMatcher {
    defs: Vec<ModTapKeyDef>,
    states: Vec<ModTapKeyState>,
    index: HashMap<KeyCode, usize>,
}

impl ModTapMatcher {
    pub fn new(defs: Vec<ModTapKeyDef>) -> Self {
        let index = defs.iter().enumerate().map(|(i, d)| (d.id, i)).collect();
        let states = vec![ModTapKeyState::default(); defs.len()];
        Self {
            defs,
            states,
            index,
        }
    }

    pub fn state(&self, key: KeyCode) -> Option<&ModTapKeyState> {
        self.index.get(&key).map(|&i| &self.states[i])
    }
}

impl KeyMatcher for ModTapMatcher {
    fn kind(&self) -> &'static str {
        "mod-tap"
    }

    fn claims(&self, key: KeyCode) -> bool {
        self.index.contains_key(&key)
    }

    fn try_claim(&mut self, cx: &mut MatchContext<'_>, event: &KeyEvent) -> Option<Vec<Action>> {
        let &i = self.index.get(&event.key)?;
        let mut out = Vec::new();
        on_event(
            &self.defs[i],
            &mut self.states[i],
            cx.tracker,
            event,
            cx.tap_timeout,
            &mut out,
        );
        Some(out)
    }
}
