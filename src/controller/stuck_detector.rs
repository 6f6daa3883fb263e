use nalgebra::Point3;

/// Verdict for one observed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The agent moved meaningfully since the last tick
    Moving,
    /// No meaningful movement, but still within the tolerated window
    Idle,
    /// No meaningful movement for `comparison_checks + 1` consecutive ticks
    Stuck,
}

/// Observes the agent's position across successive ticks and declares it
/// stuck after a configured number of consecutive ticks without meaningful
/// positional change.
///
/// The first observation is the comparison baseline; the controller feeds
/// the agent's start position right after a computation so that the next
/// tick already counts toward the window. Stuck is then declared on the
/// `(comparison_checks + 1)`-th consecutive no-movement observation after
/// the baseline was set.
///
/// After a stuck declaration the counter re-arms, so a continuing
/// stand-still fires again only after another full window rather than on
/// every subsequent tick. The detector holds no recovery policy; the
/// controller reads the verdict.
#[derive(Debug, Clone)]
pub struct StuckDetector {
    comparison_checks: u32,
    movement_epsilon: f32,
    counter: u32,
    last_position: Option<Point3<f32>>,
}

impl StuckDetector {
    /// Create a detector tolerating `comparison_checks` no-movement ticks,
    /// comparing positions with the given movement-significance threshold.
    pub fn new(comparison_checks: u32, movement_epsilon: f32) -> Self {
        Self {
            comparison_checks,
            movement_epsilon,
            counter: 0,
            last_position: None,
        }
    }

    /// Feed the agent's position for this tick.
    pub fn observe(&mut self, position: Point3<f32>) -> Verdict {
        let last = match self.last_position.replace(position) {
            Some(last) => last,
            // First observation has nothing to compare against.
            None => return Verdict::Moving,
        };

        if nalgebra::distance(&last, &position) > self.movement_epsilon {
            self.counter = 0;
            return Verdict::Moving;
        }

        self.counter += 1;
        if self.counter > self.comparison_checks {
            self.counter = 0;
            Verdict::Stuck
        } else {
            Verdict::Idle
        }
    }

    /// Clear the counter and reference position, as on a new computation.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.last_position = None;
    }

    /// Current count of consecutive no-movement ticks.
    #[inline]
    pub fn idle_ticks(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen() -> Point3<f32> {
        Point3::new(1.0, 2.0, 3.0)
    }

    #[test]
    fn test_baseline_observation_is_moving() {
        let mut detector = StuckDetector::new(4, 1e-3);
        assert_eq!(detector.observe(frozen()), Verdict::Moving);
    }

    #[test]
    fn test_stuck_on_fifth_tick_after_baseline() {
        let mut detector = StuckDetector::new(4, 1e-3);
        // Baseline, as seeded with the start position on a computation.
        detector.observe(frozen());

        // Frozen ticks 1..=4 stay within the window; the 5th declares stuck.
        for _ in 0..4 {
            assert_eq!(detector.observe(frozen()), Verdict::Idle);
        }
        assert_eq!(detector.observe(frozen()), Verdict::Stuck);
    }

    #[test]
    fn test_zero_checks_triggers_on_first_frozen_tick() {
        let mut detector = StuckDetector::new(0, 1e-3);
        detector.observe(frozen());
        assert_eq!(detector.observe(frozen()), Verdict::Stuck);
    }

    #[test]
    fn test_movement_resets_counter() {
        let mut detector = StuckDetector::new(3, 1e-3);
        detector.observe(frozen());
        assert_eq!(detector.observe(frozen()), Verdict::Idle);
        assert_eq!(detector.observe(frozen()), Verdict::Idle);
        assert_eq!(
            detector.observe(Point3::new(2.0, 2.0, 3.0)),
            Verdict::Moving
        );
        assert_eq!(detector.idle_ticks(), 0);
        assert_eq!(detector.observe(Point3::new(2.0, 2.0, 3.0)), Verdict::Idle);
    }

    #[test]
    fn test_rearms_after_declaration() {
        let mut detector = StuckDetector::new(1, 1e-3);
        detector.observe(frozen());
        assert_eq!(detector.observe(frozen()), Verdict::Idle);
        assert_eq!(detector.observe(frozen()), Verdict::Stuck);

        // Still frozen: a full window must elapse again.
        assert_eq!(detector.observe(frozen()), Verdict::Idle);
        assert_eq!(detector.observe(frozen()), Verdict::Stuck);
    }

    #[test]
    fn test_sub_epsilon_drift_counts_as_idle() {
        let mut detector = StuckDetector::new(1, 1e-2);
        detector.observe(frozen());
        assert_eq!(
            detector.observe(Point3::new(1.0005, 2.0, 3.0)),
            Verdict::Idle
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut detector = StuckDetector::new(1, 1e-3);
        detector.observe(frozen());
        detector.observe(frozen());
        detector.reset();
        assert_eq!(detector.idle_ticks(), 0);
        assert_eq!(detector.observe(frozen()), Verdict::Moving);
    }
}
