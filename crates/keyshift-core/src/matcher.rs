use crate::char_map::CharLookup;
use crate::modifiers::ModifierTracker;
use crate::types::{Action, KeyCode, KeyEvent};
use std::time::Duration;

/// Shared state a matcher may read or mutate while handling one event.
pub struct MatchContext<'a> {
    pub tracker: &'a mut ModifierTracker,
    pub chars: &'a dyn CharLookup,
    pub tap_timeout: Duration,
}

/// One kind of key definition table.
///
/// `try_claim` returns `None` when the event's key is not in the table and
/// must not touch any state in that case. A claim returns the complete action
/// sequence for the event.
pub trait KeyMatcher: Send {
    fn kind(&self) -> &'static str;

    fn claims(&self, key: KeyCode) -> bool;

    fn try_claim(&mut self, cx: &mut MatchContext<'_>, event: &KeyEvent) -> Option<Vec<Action>>;
}
