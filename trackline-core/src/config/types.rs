//! Follower configuration types
//!
//! Plain value structures passed to the follower constructors. With the
//! `serde` feature they can be embedded in a larger machine configuration.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kinematic bounds for a planned motion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionLimits {
    /// Maximum velocity (deg/s)
    pub v_max: f32,
    /// Maximum acceleration (deg/s²)
    pub a_max: f32,
    /// Maximum jerk (deg/s³)
    pub j_max: f32,
}

impl MotionLimits {
    /// Create a set of limits
    pub const fn new(v_max: f32, a_max: f32, j_max: f32) -> Self {
        Self {
            v_max,
            a_max,
            j_max,
        }
    }

    /// Check that every bound is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.v_max, self.a_max, self.j_max]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Proportional-derivative gains for the position error corrector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PdGains {
    /// Proportional gain ((deg/s) per deg)
    pub kp: f32,
    /// Derivative gain ((deg/s) per deg of error change per tick)
    pub kd: f32,
    /// Output clamp in deg/s (0 = unclamped)
    pub max_output: f32,
}

impl PdGains {
    /// Create gains without an output clamp
    pub const fn new(kp: f32, kd: f32) -> Self {
        Self {
            kp,
            kd,
            max_output: 0.0,
        }
    }

    /// Set the symmetric output clamp (deg/s)
    pub const fn with_max_output(mut self, max_output: f32) -> Self {
        self.max_output = max_output;
        self
    }
}

/// Errors rejected at follower construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick interval is zero, negative or not finite
    InvalidInterval,
    /// Group has no items
    NoItems,
    /// Number of motors differs from number of corrector configs
    ItemCountMismatch,
}

/// Check a tick interval in seconds
pub fn validate_interval(interval: f32) -> Result<(), ConfigError> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval)
    }
}

/// Single-axis follower configuration
///
/// `G` is the corrector's configuration type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig<G> {
    /// Tick interval in seconds
    pub interval: f32,
    /// Kinematic limits used for every plan
    pub limits: MotionLimits,
    /// Position error corrector configuration
    pub corrector: G,
}

/// Group follower configuration
///
/// One corrector configuration per item, in item order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupConfig<G, const N: usize> {
    /// Tick interval in seconds
    pub interval: f32,
    /// Kinematic limits used for every plan
    pub limits: MotionLimits,
    /// Per-item corrector configurations
    pub correctors: Vec<G, N>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_validation() {
        assert!(MotionLimits::new(100.0, 200.0, 1000.0).is_valid());
        assert!(!MotionLimits::new(0.0, 200.0, 1000.0).is_valid());
        assert!(!MotionLimits::new(100.0, -1.0, 1000.0).is_valid());
        assert!(!MotionLimits::new(100.0, 200.0, f32::INFINITY).is_valid());
        assert!(!MotionLimits::new(f32::NAN, 200.0, 1000.0).is_valid());
        assert!(!MotionLimits::default().is_valid());
    }

    #[test]
    fn test_interval_validation() {
        assert_eq!(validate_interval(0.001), Ok(()));
        assert_eq!(validate_interval(0.0), Err(ConfigError::InvalidInterval));
        assert_eq!(validate_interval(-0.001), Err(ConfigError::InvalidInterval));
        assert_eq!(
            validate_interval(f32::NAN),
            Err(ConfigError::InvalidInterval)
        );
    }

    #[test]
    fn test_pd_gains_builder() {
        let gains = PdGains::new(5.0, 0.5).with_max_output(90.0);
        assert_eq!(gains.kp, 5.0);
        assert_eq!(gains.kd, 0.5);
        assert_eq!(gains.max_output, 90.0);
        assert_eq!(PdGains::new(1.0, 0.0).max_output, 0.0);
    }
}
