//! Motion profile trait
//!
//! A motion profile turns a pair of boundary states into position,
//! velocity and acceleration as continuous functions of elapsed time.

use crate::config::MotionLimits;

/// Boundary conditions for building a profile
///
/// Positions are in degrees, velocities in degrees per second and
/// accelerations in degrees per second squared.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlanRequest {
    /// Position at `t = 0`
    pub start_position: f32,
    /// Position the profile must come to rest at
    pub target_position: f32,
    /// Velocity at `t = 0`
    pub start_velocity: f32,
    /// Acceleration at `t = 0`
    pub start_acceleration: f32,
    /// Kinematic bounds for the whole profile
    pub limits: MotionLimits,
}

/// Trait for time-parameterised motion profiles
///
/// `Default` must produce the empty profile (zero duration, every sample
/// zero). Followers rely on it to build throwaway profiles on the stack
/// when estimating durations.
pub trait MotionProfile: Default {
    /// Reason a plan was rejected
    type Error: Copy + core::fmt::Debug + PartialEq;

    /// Build the profile from the given boundary conditions
    ///
    /// A failed plan may leave the profile in an inconsistent state; callers
    /// must not evaluate it until the next successful plan or `reset`.
    fn plan(&mut self, request: &PlanRequest) -> Result<(), Self::Error>;

    /// Total duration of the planned motion in seconds
    fn total_duration(&self) -> f32;

    /// Position at elapsed time `t`, clamped to `[0, total_duration]`
    fn position_at(&self, t: f32) -> f32;

    /// Velocity at elapsed time `t`, clamped to `[0, total_duration]`
    fn velocity_at(&self, t: f32) -> f32;

    /// Acceleration at elapsed time `t`, clamped to `[0, total_duration]`
    fn acceleration_at(&self, t: f32) -> f32;

    /// Return to the empty profile
    fn reset(&mut self);
}
