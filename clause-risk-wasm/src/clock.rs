use std::time::Duration;

use clause_risk::Clock;

/// [`Clock`] backed by `Date.now()`, the only wall clock available to
/// `wasm32-unknown-unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let millis = js_sys::Date::now();
        if millis.is_finite() && millis > 0.0 {
            Duration::from_secs_f64(millis / 1000.0)
        } else {
            Duration::ZERO
        }
    }
}
