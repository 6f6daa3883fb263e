use crate::world::{ObjectId, World};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Navigation destination: a fixed point in space or a reference to a moving
/// object.
///
/// A dynamic reference is resolved to a position at the moment of each
/// computation, never cached across recomputations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Fixed point in world coordinates
    FixedPoint(Point3<f32>),
    /// Tracks the current position of a world object
    DynamicRef(ObjectId),
}

impl Target {
    /// Resolve the target's current position, or `None` if a referenced
    /// object no longer exists.
    pub fn resolve(&self, world: &dyn World) -> Option<Point3<f32>> {
        match self {
            Self::FixedPoint(position) => Some(*position),
            Self::DynamicRef(object) => world.current_position(*object),
        }
    }

    /// Check if this target tracks a moving object.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::DynamicRef(_))
    }
}

impl From<Point3<f32>> for Target {
    fn from(position: Point3<f32>) -> Self {
        Self::FixedPoint(position)
    }
}

impl From<ObjectId> for Target {
    fn from(object: ObjectId) -> Self {
        Self::DynamicRef(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct PointWorld {
        positions: HashMap<ObjectId, Point3<f32>>,
    }

    impl World for PointWorld {
        fn current_position(&self, object: ObjectId) -> Option<Point3<f32>> {
            self.positions.get(&object).copied()
        }
        fn move_to(&mut self, _agent: ObjectId, _position: Point3<f32>) {}
        fn has_reached(&self, _agent: ObjectId, _position: Point3<f32>) -> bool {
            false
        }
        fn jump(&mut self, _agent: ObjectId) {}
    }

    #[test]
    fn test_fixed_point_resolves_to_itself() {
        let world = PointWorld {
            positions: HashMap::new(),
        };
        let target = Target::from(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(target.resolve(&world), Some(Point3::new(1.0, 2.0, 3.0)));
        assert!(!target.is_dynamic());
    }

    #[test]
    fn test_dynamic_ref_resolves_freshly() {
        let mut world = PointWorld {
            positions: HashMap::from([(ObjectId(7), Point3::new(5.0, 0.0, 0.0))]),
        };
        let target = Target::from(ObjectId(7));
        assert_eq!(target.resolve(&world), Some(Point3::new(5.0, 0.0, 0.0)));

        world
            .positions
            .insert(ObjectId(7), Point3::new(9.0, 0.0, 0.0));
        assert_eq!(target.resolve(&world), Some(Point3::new(9.0, 0.0, 0.0)));
    }

    #[test]
    fn test_missing_object_resolves_to_none() {
        let world = PointWorld {
            positions: HashMap::new(),
        };
        assert_eq!(Target::from(ObjectId(1)).resolve(&world), None);
    }
}
