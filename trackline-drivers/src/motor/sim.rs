//! Simulated velocity-controlled motor
//!
//! A first-order lag between the commanded and actual velocity, with the
//! angle integrated from the actual velocity. Used for bench testing the
//! followers without hardware and as the plant in closed-loop tests.
//!
//! # Usage
//!
//! ```ignore
//! let mut motor = SimMotor::new(SimMotorConfig::default());
//!
//! // Every tick, after the follower has written its reference:
//! follower.update();
//! follower.motor_mut().step(dt);
//! ```

use libm::{expf, fabsf};
use trackline_core::traits::{rpm_to_dps, MotorChannel};

/// Simulated motor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimMotorConfig {
    /// Velocity loop time constant in seconds (0 = ideal tracking)
    pub time_constant: f32,
    /// Saturation velocity in deg/s (0 = unlimited)
    pub max_velocity: f32,
}

impl Default for SimMotorConfig {
    fn default() -> Self {
        Self {
            time_constant: 0.02,
            max_velocity: 0.0,
        }
    }
}

/// Simulated motor state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimMotor {
    config: SimMotorConfig,
    angle: f32,
    velocity: f32,
    reference_rpm: f32,
    writes: u32,
}

impl SimMotor {
    /// Create a motor at rest at angle zero
    pub fn new(config: SimMotorConfig) -> Self {
        Self {
            config,
            angle: 0.0,
            velocity: 0.0,
            reference_rpm: 0.0,
            writes: 0,
        }
    }

    /// Create a motor at rest at the given angle
    pub fn at_angle(config: SimMotorConfig, angle: f32) -> Self {
        Self {
            angle,
            ..Self::new(config)
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &SimMotorConfig {
        &self.config
    }

    /// Last commanded velocity reference in rpm
    pub fn reference_rpm(&self) -> f32 {
        self.reference_rpm
    }

    /// Number of reference writes since creation
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let mut target = rpm_to_dps(self.reference_rpm);
        let limit = self.config.max_velocity;
        if limit > 0.0 && fabsf(target) > limit {
            target = target.clamp(-limit, limit);
        }

        let previous = self.velocity;
        let tau = self.config.time_constant;
        self.velocity = if tau > 0.0 {
            target + (previous - target) * expf(-dt / tau)
        } else {
            target
        };

        // Trapezoidal integration
        self.angle += 0.5 * (previous + self.velocity) * dt;
    }
}

impl MotorChannel for SimMotor {
    fn angle(&self) -> f32 {
        self.angle
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn set_velocity_reference(&mut self, rpm: f32) {
        self.reference_rpm = rpm;
        self.writes = self.writes.wrapping_add(1);
    }

    fn reset_angle(&mut self) {
        self.angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDEAL: SimMotorConfig = SimMotorConfig {
        time_constant: 0.0,
        max_velocity: 0.0,
    };

    #[test]
    fn test_ideal_tracks_reference() {
        let mut motor = SimMotor::new(IDEAL);
        motor.set_velocity_reference(10.0);
        motor.step(0.5);
        assert_eq!(motor.velocity(), 60.0);
        // Trapezoid from rest to 60 deg/s over 0.5 s
        assert!((motor.angle() - 15.0).abs() < 1e-4);
        motor.step(0.5);
        assert!((motor.angle() - 45.0).abs() < 1e-4);
        assert_eq!(motor.writes(), 1);
    }

    #[test]
    fn test_lag_approaches_reference() {
        let mut motor = SimMotor::new(SimMotorConfig {
            time_constant: 0.1,
            max_velocity: 0.0,
        });
        motor.set_velocity_reference(10.0);
        motor.step(0.1);
        // One time constant reaches 1 - 1/e of the step
        assert!((motor.velocity() - 60.0 * (1.0 - expf(-1.0))).abs() < 1e-3);
        for _ in 0..100 {
            motor.step(0.01);
        }
        assert!((motor.velocity() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_saturation() {
        let mut motor = SimMotor::new(SimMotorConfig {
            time_constant: 0.0,
            max_velocity: 30.0,
        });
        motor.set_velocity_reference(-100.0);
        motor.step(0.01);
        assert_eq!(motor.velocity(), -30.0);
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut motor = SimMotor::at_angle(IDEAL, 5.0);
        motor.set_velocity_reference(10.0);
        motor.step(0.0);
        motor.step(-1.0);
        assert_eq!(motor.angle(), 5.0);
        assert_eq!(motor.velocity(), 0.0);
    }

    #[test]
    fn test_reset_angle_keeps_velocity() {
        let mut motor = SimMotor::at_angle(IDEAL, 12.0);
        motor.set_velocity_reference(1.0);
        motor.step(0.1);
        motor.reset_angle();
        assert_eq!(motor.angle(), 0.0);
        assert!((motor.velocity() - 6.0).abs() < 1e-5);
        assert_eq!(motor.reference_rpm(), 1.0);
    }
}
