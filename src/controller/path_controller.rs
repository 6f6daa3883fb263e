use crate::config::{NavConfig, NavConfigOverride};
use crate::controller::rate_limiter::RateLimiter;
use crate::controller::stuck_detector::{StuckDetector, Verdict};
use crate::event::{EventDispatcher, ListenerId, NavEvent, SharedListener};
use crate::status::{ErrorType, Status};
use crate::target::Target;
use crate::waypoint::{Waypoint, WaypointTracker};
use crate::world::{ComputeError, ObjectId, PathComputer, TraversalParams, Visualizer, World};
use crate::Result;
use tokio::time::Instant;

/// Public-facing navigation state machine for one agent.
///
/// On each `run` the controller consults the rate limiter, requests a fresh
/// waypoint sequence from the external computation capability, and installs
/// it; on each `tick` it drives waypoint advancement and stuck detection.
/// Every controller instance owns its target, sequence, and counters
/// exclusively; the agent itself is only ever mutated through the
/// [`World`] trait.
pub struct PathController {
    agent: ObjectId,
    params: TraversalParams,
    config: NavConfig,
    status: Status,
    last_error: Option<ErrorType>,
    target: Option<Target>,
    tracker: WaypointTracker,
    limiter: RateLimiter,
    detector: StuckDetector,
    dispatcher: EventDispatcher,
    /// Set before the first `run` to hand computed waypoints to the
    /// visualizer collaborator.
    pub visualize: bool,
    visualizer: Option<Box<dyn Visualizer>>,
    destroyed: bool,
}

impl PathController {
    /// Create a controller for an agent, with optional traversal parameters
    /// for the computation capability and an optional partial configuration
    /// override.
    pub fn new(
        agent: ObjectId,
        params: Option<TraversalParams>,
        overrides: Option<NavConfigOverride>,
    ) -> Result<Self> {
        let config = match overrides {
            Some(overrides) => NavConfig::with_overrides(&overrides),
            None => NavConfig::default(),
        };
        config.validate()?;

        Ok(Self {
            agent,
            params: params.unwrap_or_default(),
            limiter: RateLimiter::new(config.time_variance),
            detector: StuckDetector::new(config.comparison_checks, config.movement_epsilon),
            config,
            status: Status::Idle,
            last_error: None,
            target: None,
            tracker: WaypointTracker::new(),
            dispatcher: EventDispatcher::new(),
            visualize: false,
            visualizer: None,
            destroyed: false,
        })
    }

    /// Current navigation status.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The last failure condition, if any occurred.
    #[inline]
    pub fn last_error(&self) -> Option<ErrorType> {
        self.last_error
    }

    /// The agent this controller navigates.
    #[inline]
    pub fn agent(&self) -> ObjectId {
        self.agent
    }

    /// The controller's configuration.
    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The next unreached waypoint of the active sequence, if any.
    #[inline]
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.tracker.current()
    }

    /// The active navigation target, if any.
    #[inline]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Subscribe a listener to this controller's events.
    pub fn subscribe(&mut self, listener: SharedListener) -> ListenerId {
        self.ensure_alive();
        self.dispatcher.add_listener(listener)
    }

    /// Remove a previously subscribed listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.ensure_alive();
        self.dispatcher.remove_listener(id)
    }

    /// Install the rendering collaborator used when `visualize` is set.
    pub fn set_visualizer(&mut self, visualizer: Box<dyn Visualizer>) {
        self.visualizer = Some(visualizer);
    }

    /// Compute and follow a path to `target`.
    ///
    /// If less than the configured minimum interval has elapsed since the
    /// last accepted computation, the call suspends cooperatively for the
    /// remainder, fires `Error(LimitReached)` for observability once the wait
    /// completes, and then still proceeds with the computation. The returned
    /// boolean reflects only the immediate computation outcome; a later
    /// stuck or blocked condition never travels through it.
    pub async fn run(
        &mut self,
        target: impl Into<Target>,
        computer: &mut dyn PathComputer,
        world: &mut dyn World,
    ) -> bool {
        self.ensure_alive();
        let target = target.into();

        let wait = self.limiter.wait_required(Instant::now());
        if !wait.is_zero() {
            log::debug!(
                "agent {}: run throttled, waiting {:?} of {:?}",
                self.agent,
                wait,
                self.config.time_variance
            );
            tokio::time::sleep(wait).await;
            self.fail(ErrorType::LimitReached);
        }
        self.limiter.mark_accepted(Instant::now());

        // Dynamic references resolve freshly on every computation.
        let destination = match target.resolve(world) {
            Some(destination) => destination,
            None => {
                log::warn!("agent {}: target object no longer exists", self.agent);
                return self.abort_run(ErrorType::ComputationError);
            }
        };
        let start = match world.current_position(self.agent) {
            Some(start) => start,
            None => {
                log::warn!("agent {}: agent no longer exists in world", self.agent);
                return self.abort_run(ErrorType::ComputationError);
            }
        };

        let sequence = match computer.compute(self.agent, start, destination, &self.params) {
            Ok(sequence) => sequence,
            Err(ComputeError::Unreachable) => {
                return self.abort_run(ErrorType::TargetUnreachable);
            }
            Err(ComputeError::Failure { reason }) => {
                log::warn!("agent {}: path computation failed: {}", self.agent, reason);
                return self.abort_run(ErrorType::ComputationError);
            }
        };

        if self.visualize {
            if let Some(visualizer) = self.visualizer.as_mut() {
                visualizer.render(&sequence);
            }
        }

        log::debug!(
            "agent {}: new path with {} waypoints",
            self.agent,
            sequence.len()
        );

        let first = *sequence.first();
        self.tracker.reset(sequence);
        self.detector.reset();
        // The start position is the comparison baseline, so the first tick
        // after a computation already counts toward the no-movement window.
        self.detector.observe(start);
        self.target = Some(target);
        world.move_to(self.agent, first.position);
        self.status = Status::Active;
        true
    }

    /// Advance the state machine by one frame while navigation is active.
    ///
    /// Queries the movement actuator for proximity to the current waypoint,
    /// advances the cursor on a reach, and feeds the stuck detector.
    /// Waypoint events fire in strictly increasing index order; `Reached` is
    /// always the last event for a sequence.
    pub fn tick(&mut self, world: &mut dyn World) {
        self.ensure_alive();
        if !self.status.is_active() {
            return;
        }

        if let Some(position) = world.current_position(self.agent) {
            if self.detector.observe(position) == Verdict::Stuck {
                log::debug!("agent {}: stuck, no movement detected", self.agent);
                self.fail(ErrorType::AgentStuck);
                if self.config.jump_when_stuck {
                    world.jump(self.agent);
                }
            }
        }

        let current = match self.tracker.current() {
            Some(current) => *current,
            None => return,
        };
        if !world.has_reached(self.agent, current.position) {
            return;
        }

        if self.tracker.is_terminal() {
            let terminal = match self.tracker.finish() {
                Some(terminal) => terminal,
                None => return,
            };
            log::debug!("agent {}: reached target", self.agent);
            self.tracker.clear();
            self.target = None;
            self.status = Status::Idle;
            self.dispatcher.dispatch(NavEvent::reached(self.agent, terminal));
        } else if let Some((reached, next)) = self.tracker.advance() {
            world.move_to(self.agent, next.position);
            self.dispatcher
                .dispatch(NavEvent::waypoint_reached(self.agent, reached, next));
        }
    }

    /// Report that a waypoint near the cursor became blocked.
    ///
    /// Only honored while navigation is active and the index falls within
    /// `[current, current + 1]`; anything else is ignored.
    pub fn report_blocked(&mut self, index: u32) {
        self.ensure_alive();
        if !self.status.is_active() {
            return;
        }
        let current = match self.tracker.current() {
            Some(current) => current.index,
            None => return,
        };
        if index < current || index > current + 1 {
            return;
        }
        let blocked = match self
            .tracker
            .sequence()
            .and_then(|sequence| sequence.get(index as usize))
        {
            Some(blocked) => *blocked,
            None => return,
        };
        self.dispatcher.dispatch(NavEvent::blocked(self.agent, blocked));
    }

    /// Stop the current navigation.
    ///
    /// No-op when idle. When active, discards the sequence and cursor, sets
    /// the status to idle, and fires `Stopped` exactly once. Takes effect
    /// before the next tick processes further waypoint advancement.
    pub fn stop(&mut self) {
        self.ensure_alive();
        if !self.status.is_active() {
            return;
        }
        log::debug!("agent {}: navigation stopped", self.agent);
        self.discard_navigation();
        self.dispatcher.dispatch(NavEvent::stopped(self.agent));
    }

    /// Release all resources. Any operation invoked afterwards panics.
    pub fn destroy(&mut self) {
        self.ensure_alive();
        if self.status.is_active() {
            self.discard_navigation();
            self.dispatcher.dispatch(NavEvent::stopped(self.agent));
        }
        self.dispatcher.clear_listeners();
        self.visualizer = None;
        self.destroyed = true;
    }

    /// Whether `destroy` has been called.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn discard_navigation(&mut self) {
        self.tracker.clear();
        self.target = None;
        self.detector.reset();
        self.status = Status::Idle;
    }

    /// Record a failure condition and fire the Error event. Does not touch
    /// the status; callers decide the transition.
    fn fail(&mut self, error: ErrorType) {
        self.last_error = Some(error);
        self.dispatcher.dispatch(NavEvent::error(self.agent, error));
    }

    fn abort_run(&mut self, error: ErrorType) -> bool {
        self.fail(error);
        self.discard_navigation();
        false
    }

    fn ensure_alive(&self) {
        assert!(
            !self.destroyed,
            "operation on destroyed PathController for agent {}",
            self.agent
        );
    }
}

impl Drop for PathController {
    fn drop(&mut self) {
        // Same cleanup as destroy, without events.
        if !self.destroyed {
            self.dispatcher.set_enabled(false);
            self.dispatcher.clear_listeners();
            self.destroyed = true;
        }
    }
}

impl std::fmt::Debug for PathController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathController")
            .field("agent", &self.agent)
            .field("status", &self.status)
            .field("last_error", &self.last_error)
            .field("visualize", &self.visualize)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
