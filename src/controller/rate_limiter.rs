use std::time::Duration;
use tokio::time::Instant;

/// Tracks elapsed time since the last accepted computation and reports how
/// much longer a caller must wait to honor the minimum inter-computation
/// interval.
///
/// The limiter never suspends anything itself; the controller owns the
/// cooperative wait. That keeps this unit testable with constructed instants
/// instead of wall clocks.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    time_variance: Duration,
    last_accepted: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter enforcing the given minimum interval.
    pub fn new(time_variance: Duration) -> Self {
        Self {
            time_variance,
            last_accepted: None,
        }
    }

    /// How much longer the caller must wait before the next computation.
    ///
    /// Zero when no computation has been accepted yet, or when the interval
    /// has already elapsed.
    pub fn wait_required(&self, now: Instant) -> Duration {
        match self.last_accepted {
            Some(last) => self
                .time_variance
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Record an accepted computation attempt.
    pub fn mark_accepted(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }

    /// Forget the last accepted computation, so the next `wait_required`
    /// reports zero. The controller deliberately never resets its limiter:
    /// the minimum interval spans stop/run cycles, keeping a stop-and-rerun
    /// loop from bypassing the throttle.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    /// The enforced minimum interval.
    #[inline]
    pub fn time_variance(&self) -> Duration {
        self.time_variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_computation_never_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(70));
        assert_eq!(limiter.wait_required(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_wait_is_remaining_interval() {
        let mut limiter = RateLimiter::new(Duration::from_millis(70));
        let start = Instant::now();
        limiter.mark_accepted(start);

        let wait = limiter.wait_required(start + Duration::from_millis(30));
        assert_eq!(wait, Duration::from_millis(40));
    }

    #[test]
    fn test_no_wait_after_interval_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_millis(70));
        let start = Instant::now();
        limiter.mark_accepted(start);

        assert_eq!(
            limiter.wait_required(start + Duration::from_millis(70)),
            Duration::ZERO
        );
        assert_eq!(
            limiter.wait_required(start + Duration::from_millis(200)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_reset_forgets_last_computation() {
        let mut limiter = RateLimiter::new(Duration::from_millis(70));
        let start = Instant::now();
        limiter.mark_accepted(start);
        limiter.reset();
        assert_eq!(limiter.wait_required(start), Duration::ZERO);
    }
}
