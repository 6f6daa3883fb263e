//! Path-following state machine and its supporting units

pub mod path_controller;
pub mod rate_limiter;
pub mod stuck_detector;

pub use path_controller::PathController;
pub use rate_limiter::RateLimiter;
pub use stuck_detector::{StuckDetector, Verdict};
