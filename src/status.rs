use serde::{Deserialize, Serialize};

/// Navigation status of a path controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No navigation in progress
    Idle,
    /// A target is set and waypoint traversal is in progress
    Active,
}

impl Status {
    /// Get the name of this status
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
        }
    }

    /// Check if navigation is in progress
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Idle
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            _ => Self::Idle,
        }
    }
}

/// Failure conditions surfaced through the `Error` event and `last_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    /// Two computations were requested closer together than the configured
    /// minimum interval. Fired after the enforced wait completes; computation
    /// still proceeds. Avoid depending on this error type.
    LimitReached,
    /// The target has no valid path
    TargetUnreachable,
    /// Path computation failed
    ComputationError,
    /// The agent has not meaningfully moved for the configured number of
    /// consecutive ticks, possibly due to an obstruction
    AgentStuck,
}

impl ErrorType {
    /// Get the name of this error type
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LimitReached => "limit_reached",
            Self::TargetUnreachable => "target_unreachable",
            Self::ComputationError => "computation_error",
            Self::AgentStuck => "agent_stuck",
        }
    }

    /// Check if a retry with the same target can reasonably succeed
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LimitReached | Self::ComputationError | Self::AgentStuck)
    }

    /// Check if this error type is informational only (navigation continues)
    #[inline]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::LimitReached | Self::AgentStuck)
    }
}

impl From<&str> for ErrorType {
    fn from(s: &str) -> Self {
        match s {
            "limit_reached" => Self::LimitReached,
            "target_unreachable" => Self::TargetUnreachable,
            "agent_stuck" => Self::AgentStuck,
            _ => Self::ComputationError,
        }
    }
}
