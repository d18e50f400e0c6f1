use std::{marker::PhantomData, time::Duration};

use ratepace::{middleware::PacingMiddleware, Direction, ScheduleSnapshot, TimeDelta};
use tracing::{event, span, Level};

/// Middleware that emits `TRACE` level events whenever a chunk is scheduled or transferred
/// by the rate limiter, then hands over to the inner middleware `I`.
pub struct TracingMiddleware<I: PacingMiddleware> {
    _phantom: PhantomData<I>,
}

impl<I: PacingMiddleware> core::fmt::Debug for TracingMiddleware<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingMiddleware").finish()
    }
}

impl<I: PacingMiddleware> PacingMiddleware for TracingMiddleware<I> {
    fn reserved(direction: Direction, bytes: usize, state: ScheduleSnapshot, delay: Duration) {
        let span = span!(Level::TRACE, "reserved", %direction, bytes);
        let _enter = span.enter();
        event!(
            Level::TRACE,
            ?delay,
            next_eligible = ?state.next_eligible(),
            credit_secs = state.credit_secs()
        );
        I::reserved(direction, bytes, state, delay);
    }

    fn transferred(direction: Direction, bytes: usize, elapsed: TimeDelta) {
        let span = span!(Level::TRACE, "transferred", %direction, bytes);
        let _enter = span.enter();
        event!(Level::TRACE, elapsed_secs = elapsed.as_secs_f64());
        I::transferred(direction, bytes, elapsed);
    }
}
