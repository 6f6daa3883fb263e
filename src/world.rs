//! Boundary capabilities the navigation core consumes.
//!
//! The core orchestrates timing and state only; geometric pathfinding, agent
//! movement, and object lookup are external collaborators behind the traits
//! in this module.

use crate::waypoint::WaypointSequence;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque handle for an agent or world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Environment queries and the physical movement actuator.
///
/// The agent object is mutated only through this trait, never directly by the
/// core.
pub trait World {
    /// Current position of an object, or `None` if it no longer exists.
    fn current_position(&self, object: ObjectId) -> Option<Point3<f32>>;

    /// Start moving the agent toward a waypoint position.
    fn move_to(&mut self, agent: ObjectId, position: Point3<f32>);

    /// Whether the agent is close enough to a waypoint position to count it
    /// as reached.
    fn has_reached(&self, agent: ObjectId, position: Point3<f32>) -> bool;

    /// Apply the obstruction-recovery impulse (a vertical jump).
    fn jump(&mut self, agent: ObjectId);
}

/// Failure modes of the external path-computation capability.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// No valid path exists between the endpoints
    #[error("Target is unreachable")]
    Unreachable,
    /// Computation failed, transiently or permanently
    #[error("Path computation failed: {reason}")]
    Failure { reason: String },
}

/// External path-computation capability.
///
/// Given endpoints and tunable traversal parameters, returns an ordered
/// waypoint sequence or fails. The core never computes geometry itself.
pub trait PathComputer {
    fn compute(
        &mut self,
        agent: ObjectId,
        from: Point3<f32>,
        to: Point3<f32>,
        params: &TraversalParams,
    ) -> Result<WaypointSequence, ComputeError>;
}

/// Tunable inputs forwarded opaquely to the path-computation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalParams {
    /// Horizontal clearance the agent needs (meters)
    pub agent_radius: f32,
    /// Vertical clearance the agent needs (meters)
    pub agent_height: f32,
    /// Whether computed paths may include jump links
    pub can_jump: bool,
    /// Whether computed paths may include climb links
    pub can_climb: bool,
    /// Named traversal cost weights, computer-specific
    #[serde(default)]
    pub costs: HashMap<String, f32>,
}

impl Default for TraversalParams {
    fn default() -> Self {
        Self {
            agent_radius: 2.0,
            agent_height: 5.0,
            can_jump: true,
            can_climb: false,
            costs: HashMap::new(),
        }
    }
}

/// Rendering collaborator for computed waypoints, used when the controller's
/// `visualize` flag is set before the first `run`.
pub trait Visualizer {
    fn render(&mut self, sequence: &WaypointSequence);
}

/// Return the nearest candidate to `from`, or `None` if there are no
/// candidates.
///
/// Standalone utility, independent of any controller instance.
pub fn nearest_character<I>(from: Point3<f32>, candidates: I) -> Option<ObjectId>
where
    I: IntoIterator<Item = (ObjectId, Point3<f32>)>,
{
    candidates
        .into_iter()
        .map(|(id, position)| (id, nalgebra::distance_squared(&from, &position)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_character_picks_closest() {
        let from = Point3::new(0.0, 0.0, 0.0);
        let candidates = vec![
            (ObjectId(1), Point3::new(10.0, 0.0, 0.0)),
            (ObjectId(2), Point3::new(1.0, 1.0, 0.0)),
            (ObjectId(3), Point3::new(-4.0, 0.0, 3.0)),
        ];
        assert_eq!(nearest_character(from, candidates), Some(ObjectId(2)));
    }

    #[test]
    fn test_nearest_character_empty() {
        let from = Point3::new(0.0, 0.0, 0.0);
        assert_eq!(nearest_character(from, Vec::new()), None);
    }

    #[test]
    fn test_traversal_params_default() {
        let params = TraversalParams::default();
        assert!(params.can_jump);
        assert!(!params.can_climb);
        assert!(params.costs.is_empty());
    }
}
