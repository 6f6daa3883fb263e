//! Error types for the navigation core

use serde::{Deserialize, Serialize};

/// Programming-error conditions for navigation operations.
///
/// Expected navigation failures (unreachable target, failed computation,
/// stuck agent) are not represented here; they flow through
/// [`ErrorType`](crate::ErrorType) and the `Error` event.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NavError {
    /// Configuration value rejected at construction
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A computed waypoint sequence contained no waypoints
    #[error("Waypoint sequence is empty")]
    EmptySequence,

    /// Waypoint indices were not strictly increasing and contiguous
    #[error("Waypoint index out of order at position {position}: {index}")]
    NonMonotonicIndex { position: usize, index: u32 },
}

impl NavError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "config",
            Self::EmptySequence | Self::NonMonotonicIndex { .. } => "sequence",
        }
    }
}
