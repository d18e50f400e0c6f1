use crate::clock::{Clock, ReasonablyRealtime};
use crate::timestamp::Timestamp;
use std::thread;
use std::time::Duration;

/// A clock using the default [`quanta::Clock`] structure.
///
/// This clock uses [`quanta::Clock.now`], which does retrieve the time synchronously.
/// Timestamps count from the moment the clock was constructed.
#[derive(Debug, Clone)]
pub struct QuantaClock {
    clock: quanta::Clock,
    origin: quanta::Instant,
}

impl Default for QuantaClock {
    fn default() -> Self {
        let clock = quanta::Clock::new();
        let origin = clock.now();
        QuantaClock { clock, origin }
    }
}

impl Clock for QuantaClock {
    fn now(&self) -> Timestamp {
        self.clock.now().duration_since(self.origin).into()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl ReasonablyRealtime for QuantaClock {}
