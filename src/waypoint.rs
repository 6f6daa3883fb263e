//! Waypoint sequences and traversal bookkeeping

use crate::error::NavError;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A single point in a computed path, carrying a strictly ordered index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in the 0-based sequence
    pub index: u32,
    /// Position in world coordinates
    pub position: Point3<f32>,
}

impl Waypoint {
    /// Create a new waypoint.
    #[inline]
    pub fn new(index: u32, position: Point3<f32>) -> Self {
        Self { index, position }
    }
}

/// An ordered waypoint list, immutable once computed.
///
/// Indices are unique, 0-based, strictly increasing, and contiguous; the last
/// element is the terminal waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSequence {
    waypoints: Vec<Waypoint>,
}

impl WaypointSequence {
    /// Create a sequence from pre-indexed waypoints, validating the index
    /// invariant.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, NavError> {
        if waypoints.is_empty() {
            return Err(NavError::EmptySequence);
        }
        for (position, waypoint) in waypoints.iter().enumerate() {
            if waypoint.index as usize != position {
                return Err(NavError::NonMonotonicIndex {
                    position,
                    index: waypoint.index,
                });
            }
        }
        Ok(Self { waypoints })
    }

    /// Create a sequence from ordered positions, assigning contiguous indices.
    pub fn from_positions(positions: Vec<Point3<f32>>) -> Result<Self, NavError> {
        if positions.is_empty() {
            return Err(NavError::EmptySequence);
        }
        let waypoints = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Waypoint::new(index as u32, position))
            .collect();
        Ok(Self { waypoints })
    }

    /// Number of waypoints in the sequence, always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; an empty sequence cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get the waypoint at an index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// First waypoint of the sequence.
    #[inline]
    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    /// Terminal waypoint of the sequence.
    #[inline]
    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Iterate over the waypoints in index order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }
}

/// Forward-only cursor over one waypoint sequence's lifetime.
///
/// Holds the current sequence, the index of the next unreached waypoint, and
/// the last reached waypoint. A new sequence resets the cursor to its start.
#[derive(Debug, Clone, Default)]
pub struct WaypointTracker {
    sequence: Option<WaypointSequence>,
    cursor: usize,
    last_reached: Option<Waypoint>,
}

impl WaypointTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new sequence, rewinding the cursor to its first waypoint.
    pub fn reset(&mut self, sequence: WaypointSequence) {
        self.sequence = Some(sequence);
        self.cursor = 0;
        self.last_reached = None;
    }

    /// Discard the current sequence and cursor.
    pub fn clear(&mut self) {
        self.sequence = None;
        self.cursor = 0;
        self.last_reached = None;
    }

    /// Whether a sequence is installed.
    #[inline]
    pub fn has_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    /// The installed sequence, if any.
    #[inline]
    pub fn sequence(&self) -> Option<&WaypointSequence> {
        self.sequence.as_ref()
    }

    /// The next unreached waypoint, if a sequence is installed.
    #[inline]
    pub fn current(&self) -> Option<&Waypoint> {
        self.sequence.as_ref().and_then(|s| s.get(self.cursor))
    }

    /// The most recently reached waypoint within the current sequence.
    #[inline]
    pub fn last_reached(&self) -> Option<&Waypoint> {
        self.last_reached.as_ref()
    }

    /// Whether the current waypoint is the terminal one.
    pub fn is_terminal(&self) -> bool {
        match &self.sequence {
            Some(sequence) => self.cursor + 1 == sequence.len(),
            None => false,
        }
    }

    /// Mark the current waypoint reached and move the cursor forward one step.
    ///
    /// Returns the `(reached, next)` pair, or `None` when there is no sequence
    /// or the cursor already sits on the terminal waypoint (advancing past the
    /// terminal index is a no-op).
    pub fn advance(&mut self) -> Option<(Waypoint, Waypoint)> {
        let sequence = self.sequence.as_ref()?;
        if self.cursor + 1 >= sequence.len() {
            return None;
        }
        let reached = *sequence.get(self.cursor)?;
        let next = *sequence.get(self.cursor + 1)?;
        self.cursor += 1;
        self.last_reached = Some(reached);
        Some((reached, next))
    }

    /// Mark the terminal waypoint reached, without moving the cursor.
    pub fn finish(&mut self) -> Option<Waypoint> {
        let terminal = *self.sequence.as_ref()?.last();
        self.last_reached = Some(terminal);
        Some(terminal)
    }
}
