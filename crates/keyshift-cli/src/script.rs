//! Replay scripts: one key transition per line, `<ms> <down|up> <key>`.
//!
//! Blank lines and everything after `#` are ignored. Times are milliseconds
//! from the start of the script and may not go backwards.

use anyhow::{anyhow, bail, Context, Result};
use keyshift_core::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub key: KeyCode,
    pub pressed: bool,
}

/// Parses a single line. `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<ScriptEvent>> {
    let content = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let mut fields = content.split_whitespace();
    let Some(at) = fields.next() else {
        return Ok(None);
    };

    let at_ms = at
        .parse::<u64>()
        .with_context(|| format!("bad time {:?}", at))?;
    let pressed = match fields.next() {
        Some(edge) if edge.eq_ignore_ascii_case("down") => true,
        Some(edge) if edge.eq_ignore_ascii_case("up") => false,
        Some(edge) => bail!("expected down or up, got {:?}", edge),
        None => bail!("missing edge"),
    };
    let name = fields.next().ok_or_else(|| anyhow!("missing key name"))?;
    let key = KeyCode::from_name(name).ok_or_else(|| anyhow!("unknown key {:?}", name))?;
    if let Some(extra) = fields.next() {
        bail!("unexpected {:?} after key name", extra);
    }

    Ok(Some(ScriptEvent {
        at_ms,
        key,
        pressed,
    }))
}

/// Tracks line numbers and the time ordering across a whole script.
#[derive(Debug, Default)]
pub struct ScriptReader {
    line_no: usize,
    last_ms: u64,
}

impl ScriptReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Result<Option<ScriptEvent>> {
        self.line_no += 1;
        let event = parse_line(line).with_context(|| format!("line {}", self.line_no))?;
        if let Some(ev) = &event {
            if ev.at_ms < self.last_ms {
                bail!(
                    "line {}: time {}ms is before the previous event at {}ms",
                    self.line_no,
                    ev.at_ms,
                    self.last_ms
                );
            }
            self.last_ms = ev.at_ms;
        }
        Ok(event)
    }

    /// Turns the last fed event into a `KeyEvent` timed from `t0`.
    pub fn stamp(&self, t0: Instant, ev: &ScriptEvent) -> Result<KeyEvent> {
        let t = t0
            .checked_add(Duration::from_millis(ev.at_ms))
            .ok_or_else(|| anyhow!("line {}: time {}ms is out of range", self.line_no, ev.at_ms))?;
        Ok(KeyEvent::new(ev.key, ev.pressed, t))
    }
}
