//! Waypath
//!
//! A supervisory path-following layer for mobile agents in dynamic 3D
//! environments. Given a target point or a moving object, a
//! [`PathController`] repeatedly computes and follows a path of waypoints
//! until the agent arrives, is blocked, or fails. Geometric pathfinding and
//! agent movement stay external, behind the [`world`] capability traits; this
//! crate owns orchestration, timing, and state.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod status;
pub mod target;
pub mod waypoint;
pub mod world;

// Re-export common types for convenience
pub use config::{NavConfig, NavConfigOverride};
pub use controller::{PathController, RateLimiter, StuckDetector, Verdict};
pub use error::NavError;
pub use event::{
    CollectingEventListener, EventDispatcher, EventListener, EventType, ListenerId,
    LoggingEventListener, NavEvent,
};
pub use status::{ErrorType, Status};
pub use target::Target;
pub use waypoint::{Waypoint, WaypointSequence, WaypointTracker};
pub use world::{
    nearest_character, ComputeError, ObjectId, PathComputer, TraversalParams, Visualizer, World,
};

/// Navigation result type
pub type Result<T> = core::result::Result<T, NavError>;
