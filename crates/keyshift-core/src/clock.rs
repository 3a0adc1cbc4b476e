use std::time::Instant;

/// Monotonic time source read once per event. Durations are measured between
/// event timestamps, never against the clock directly.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
