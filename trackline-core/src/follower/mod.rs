//! S-curve trajectory followers
//!
//! A follower turns a target angle into a jerk-limited profile and tracks
//! it once per control tick: the profile's velocity is commanded as
//! feed-forward and a corrector closes the loop on position error.
//!
//! - [`AxisFollower`]: one motor
//! - [`GroupFollower`]: several mechanically coupled motors following one
//!   shared profile, each with its own corrector
//!
//! Per tick the host must call `update()` before running the motors' own
//! velocity loops, so the reference written this tick is the one they use.
//!
//! ```text
//! Disarmed --set_target ok--> Armed --set_target ok--> Armed (elapsed = 0)
//! Armed --set_target err | stop | reset_all--> Disarmed
//! ```
//!
//! An armed follower stays armed after the profile ends; poll
//! `is_finished()` and issue a new target or `stop()`.

pub mod axis;
pub mod group;
mod track;

#[cfg(test)]
mod mock;

pub use axis::AxisFollower;
pub use group::{GroupFollower, GroupItem};

/// Value returned by `estimate_duration` when no profile could be built
pub const DURATION_UNAVAILABLE: f32 = -1.0;

/// Armed/disarmed control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FollowerState {
    /// Not tracking; `update` does nothing
    Disarmed,
    /// Tracking the current profile
    Armed,
}

/// Telemetry published after every armed `update`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackingSample {
    /// Time since the last plan (s)
    pub elapsed: f32,
    /// Profile position at `elapsed` (deg)
    pub target_position: f32,
    /// Profile velocity at `elapsed` (deg/s)
    pub feedforward_velocity: f32,
}

/// Position and velocity read back from the motor(s)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SensedState {
    pub position: f32,
    pub velocity: f32,
}

/// Profile sample for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Setpoint {
    pub position: f32,
    pub velocity: f32,
}
