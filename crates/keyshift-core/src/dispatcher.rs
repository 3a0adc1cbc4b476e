use crate::char_map::{CharLookup, UsAscii};
use crate::clock::{Clock, SystemClock};
use crate::config::KeymapConfig;
use crate::matcher::{KeyMatcher, MatchContext};
use crate::mod_tap::ModTapMatcher;
use crate::modifiers::ModifierTracker;
use crate::sequence::SequenceMatcher;
use crate::shift_level::ShiftLevelMatcher;
use crate::sink::OutputSink;
use crate::toggle::ToggleMatcher;
use crate::types::{Action, KeyCode, KeyEdge, KeyEvent, ModifierSet};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Owns all engine state for the lifetime of the keyboard.
///
/// Events are processed one at a time and each one runs to completion: the
/// returned actions are the full effect of that event.
pub struct Dispatcher {
    tracker: ModifierTracker,
    matchers: Vec<Box<dyn KeyMatcher>>,
    chars: Box<dyn CharLookup + Send>,
    clock: Box<dyn Clock>,
    tap_timeout: Duration,
}

impl Dispatcher {
    pub fn new(config: KeymapConfig) -> Self {
        Self::with_parts(config, Box::new(UsAscii), Box::new(SystemClock))
    }

    pub fn with_parts(
        config: KeymapConfig,
        chars: Box<dyn CharLookup + Send>,
        clock: Box<dyn Clock>,
    ) -> Self {
        info!(
            "Dispatcher: {} mod-tap, {} shift-level, {} toggle, {} sequence keys, tap timeout {}ms.",
            config.mod_tap.len(),
            config.shift_level.len(),
            config.toggle.len(),
            config.sequence.len(),
            config.tap_timeout_ms
        );
        let tap_timeout = config.tap_timeout();

        // Priority order: a mod-tap key may be the Shift source later matchers read.
        let matchers: Vec<Box<dyn KeyMatcher>> = vec![
            Box::new(ModTapMatcher::new(config.mod_tap)),
            Box::new(ShiftLevelMatcher::new(config.shift_level)),
            Box::new(ToggleMatcher::new(config.toggle)),
            Box::new(SequenceMatcher::new(config.sequence)),
        ];

        Self {
            tracker: ModifierTracker::new(),
            matchers,
            chars,
            clock,
            tap_timeout,
        }
    }

    pub fn modifiers(&self) -> &ModifierTracker {
        &self.tracker
    }

    pub fn tap_timeout(&self) -> Duration {
        self.tap_timeout
    }

    /// Which matcher kind owns `key`, if any.
    pub fn owner_of(&self, key: KeyCode) -> Option<&'static str> {
        self.matchers
            .iter()
            .find(|m| m.claims(key))
            .map(|m| m.kind())
    }

    /// Stamps the transition with the clock and processes it.
    pub fn process_key(&mut self, key: KeyCode, pressed: bool) -> Vec<Action> {
        let event = KeyEvent::new(key, pressed, self.clock.now());
        self.on_event(event)
    }

    pub fn on_event(&mut self, event: KeyEvent) -> Vec<Action> {
        let mut out = Vec::new();

        // 1. Literal modifier keys feed the tracker before any matcher runs.
        if let Some(bit) = ModifierSet::from_keycode(event.key) {
            match event.edge {
                KeyEdge::Down => self.tracker.hold(bit, &mut out),
                KeyEdge::Up => self.tracker.unhold(bit, &mut out),
            }
            trace!("{} {:?}: held={:?}", event.key, event.edge, self.tracker.held());
            return out;
        }

        // 2. First matcher to claim the event handles it.
        let mut cx = MatchContext {
            tracker: &mut self.tracker,
            chars: self.chars.as_ref(),
            tap_timeout: self.tap_timeout,
        };
        for matcher in self.matchers.iter_mut() {
            if let Some(actions) = matcher.try_claim(&mut cx, &event) {
                debug!(
                    "{} {:?} claimed by {}: {:?}",
                    event.key,
                    event.edge,
                    matcher.kind(),
                    actions
                );
                return actions;
            }
        }

        // 3. Nobody claimed it: forward unchanged.
        trace!("{} {:?} forwarded", event.key, event.edge);
        out.push(Action::from_edge(event.key, event.edge));
        out
    }

    /// Processes `event` and hands every resulting action to `sink`, in order.
    pub fn drive(&mut self, event: KeyEvent, sink: &mut dyn OutputSink) -> usize {
        let actions = self.on_event(event);
        for action in &actions {
            sink.emit(*action);
        }
        actions.len()
    }
}
