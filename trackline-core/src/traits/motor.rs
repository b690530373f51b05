//! Motor channel trait
//!
//! A motor channel is a velocity-controlled motor with angle feedback.
//! The lower-level velocity loop lives behind this trait and is updated by
//! the host after the follower has written its reference for the tick.

/// Trait for velocity-controlled motor channels
///
/// Angles are in degrees and velocities in degrees per second; the
/// velocity reference is in the channel's native unit (rpm).
pub trait MotorChannel {
    /// Sensed output angle in degrees
    fn angle(&self) -> f32;

    /// Sensed output velocity in degrees per second
    fn velocity(&self) -> f32;

    /// Command the velocity loop in rpm
    fn set_velocity_reference(&mut self, rpm: f32);

    /// Re-zero the angle origin at the current position
    fn reset_angle(&mut self);
}

/// A `&mut` to a channel is a channel too, so followers can borrow motors
/// owned elsewhere.
impl<T: MotorChannel + ?Sized> MotorChannel for &mut T {
    fn angle(&self) -> f32 {
        (**self).angle()
    }

    fn velocity(&self) -> f32 {
        (**self).velocity()
    }

    fn set_velocity_reference(&mut self, rpm: f32) {
        (**self).set_velocity_reference(rpm)
    }

    fn reset_angle(&mut self) {
        (**self).reset_angle()
    }
}

/// Convert degrees per second to revolutions per minute
#[inline]
pub fn dps_to_rpm(deg_per_sec: f32) -> f32 {
    deg_per_sec / 360.0 * 60.0
}

/// Convert revolutions per minute to degrees per second
#[inline]
pub fn rpm_to_dps(rpm: f32) -> f32 {
    rpm / 60.0 * 360.0
}
