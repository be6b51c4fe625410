//! Monotonic time source used for the analysis budget.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// A monotonic clock.
///
/// `now` is measured from an arbitrary origin; only differences between two
/// readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// [`Clock`] backed by [`Instant`], measured from the first reading in the
/// process.
///
/// Constructing one never touches `Instant`, but reading it panics on
/// `wasm32-unknown-unknown`; the wasm bindings swap in their own clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        ORIGIN.elapsed()
    }
}
