//! Controller configuration and partial overrides

use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_time_variance() -> Duration {
    // Roughly 14 computations per second.
    Duration::from_millis(70)
}

fn default_comparison_checks() -> u32 {
    1
}

fn default_jump_when_stuck() -> bool {
    true
}

fn default_movement_epsilon() -> f32 {
    1e-3
}

/// Configuration for a path controller, immutable per instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    /// Minimum elapsed time between two computation attempts. A `run` call
    /// arriving earlier suspends cooperatively for the remainder; it gives the
    /// agent some time to reach the next waypoint before a new path replaces
    /// the current one.
    #[serde(default = "default_time_variance")]
    pub time_variance: Duration,

    /// Number of consecutive no-movement ticks tolerated before the agent is
    /// declared stuck. Stuck is declared on the `(comparison_checks + 1)`-th
    /// consecutive tick; zero means a single no-movement tick triggers.
    #[serde(default = "default_comparison_checks")]
    pub comparison_checks: u32,

    /// Whether a stuck declaration triggers the recovery jump, or is purely
    /// informational.
    #[serde(default = "default_jump_when_stuck")]
    pub jump_when_stuck: bool,

    /// Positional change below this distance counts as no movement for stuck
    /// detection. Not part of the override surface.
    #[serde(default = "default_movement_epsilon")]
    pub movement_epsilon: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            time_variance: default_time_variance(),
            comparison_checks: default_comparison_checks(),
            jump_when_stuck: default_jump_when_stuck(),
            movement_epsilon: default_movement_epsilon(),
        }
    }
}

impl NavConfig {
    /// Merge a partial override into the default configuration.
    pub fn with_overrides(overrides: &NavConfigOverride) -> Self {
        let mut config = Self::default();
        config.apply(overrides);
        config
    }

    /// Apply a partial override in place.
    pub fn apply(&mut self, overrides: &NavConfigOverride) {
        if let Some(time_variance) = overrides.time_variance {
            self.time_variance = time_variance;
        }
        if let Some(comparison_checks) = overrides.comparison_checks {
            self.comparison_checks = comparison_checks;
        }
        if let Some(jump_when_stuck) = overrides.jump_when_stuck {
            self.jump_when_stuck = jump_when_stuck;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.time_variance.is_zero() {
            return Err(NavError::InvalidConfig {
                reason: "time_variance must be a positive duration".to_string(),
            });
        }
        if self.movement_epsilon < 0.0 || !self.movement_epsilon.is_finite() {
            return Err(NavError::InvalidConfig {
                reason: format!(
                    "movement_epsilon must be a finite non-negative value, got {}",
                    self.movement_epsilon
                ),
            });
        }
        Ok(())
    }
}

/// Partial configuration override, recognized keys only.
///
/// The JSON form rejects unknown keys outright, so a misspelled setting is a
/// deserialization error rather than a silent no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavConfigOverride {
    /// Override for [`NavConfig::time_variance`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_variance: Option<Duration>,
    /// Override for [`NavConfig::comparison_checks`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_checks: Option<u32>,
    /// Override for [`NavConfig::jump_when_stuck`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_when_stuck: Option<bool>,
}

impl NavConfigOverride {
    /// Override the minimum inter-computation interval.
    #[inline]
    pub fn time_variance(mut self, time_variance: Duration) -> Self {
        self.time_variance = Some(time_variance);
        self
    }

    /// Override the stuck-detection window.
    #[inline]
    pub fn comparison_checks(mut self, comparison_checks: u32) -> Self {
        self.comparison_checks = Some(comparison_checks);
        self
    }

    /// Override the stuck-recovery jump toggle.
    #[inline]
    pub fn jump_when_stuck(mut self, jump_when_stuck: bool) -> Self {
        self.jump_when_stuck = Some(jump_when_stuck);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavConfig::default();
        assert_eq!(config.time_variance, Duration::from_millis(70));
        assert_eq!(config.comparison_checks, 1);
        assert!(config.jump_when_stuck);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_override_merge() {
        let overrides = NavConfigOverride::default()
            .time_variance(Duration::from_millis(120))
            .jump_when_stuck(false);
        let config = NavConfig::with_overrides(&overrides);

        assert_eq!(config.time_variance, Duration::from_millis(120));
        assert_eq!(config.comparison_checks, 1);
        assert!(!config.jump_when_stuck);
    }

    #[test]
    fn test_zero_time_variance_rejected() {
        let config = NavConfig {
            time_variance: Duration::ZERO,
            ..NavConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NavError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_override_from_json() {
        let overrides: NavConfigOverride =
            serde_json::from_str(r#"{"comparison_checks": 4}"#).unwrap();
        assert_eq!(overrides.comparison_checks, Some(4));
        assert_eq!(overrides.time_variance, None);
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let result =
            serde_json::from_str::<NavConfigOverride>(r#"{"comparision_checks": 4}"#);
        assert!(result.is_err());
    }
}
