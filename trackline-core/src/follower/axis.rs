//! Single-axis trajectory follower
//!
//! # Usage
//!
//! ```ignore
//! let config = AxisConfig {
//!     interval: 0.001,
//!     limits: MotionLimits::new(100.0, 200.0, 1000.0),
//!     corrector: PdGains::new(8.0, 0.0),
//! };
//! let mut follower: AxisFollower<SCurve, Pd, _> = AxisFollower::new(&config, &mut motor)?;
//! follower.set_target(90.0)?;
//!
//! // Every 1ms, before the motor's velocity loop:
//! follower.update();
//! ```

use crate::config::{AxisConfig, ConfigError, MotionLimits};
use crate::traits::{dps_to_rpm, Corrector, MotionProfile, MotorChannel};

use super::track::Track;
use super::{FollowerState, SensedState, TrackingSample, DURATION_UNAVAILABLE};

/// Follows an S-curve with a single motor
///
/// Owns its profile and corrector; the motor is usually a `&mut` to a
/// channel owned elsewhere.
#[derive(Debug, Clone)]
pub struct AxisFollower<P, C, M> {
    track: Track<P>,
    corrector: C,
    motor: M,
}

impl<P: MotionProfile, C: Corrector, M: MotorChannel> AxisFollower<P, C, M> {
    /// Create a disarmed follower
    ///
    /// Rejects a zero, negative or non-finite tick interval.
    pub fn new(config: &AxisConfig<C::Config>, motor: M) -> Result<Self, ConfigError> {
        let track = Track::new(config.interval, config.limits).inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::warn!("axis follower rejected: {}", _err);
        })?;

        Ok(Self {
            track,
            corrector: C::from_config(&config.corrector),
            motor,
        })
    }

    /// Run one control tick
    ///
    /// Does nothing while disarmed. Otherwise advances the timeline by one
    /// interval and writes exactly one velocity reference to the motor:
    /// profile velocity plus the position correction, in rpm.
    pub fn update(&mut self) {
        let Some(setpoint) = self.track.advance() else {
            return;
        };

        self.corrector.set_reference(setpoint.position);
        self.corrector.set_feedback(self.motor.angle());
        let correction = self.corrector.calculate();

        self.motor
            .set_velocity_reference(dps_to_rpm(setpoint.velocity + correction));
        self.track.record(setpoint);
    }

    /// Plan a new motion to `target` (deg) from the motor's current state
    ///
    /// Position and velocity continuity come from the sensed motor state;
    /// acceleration continuity from the outgoing profile when already
    /// armed. On success the follower is armed with elapsed time zero. On
    /// failure it is stopped and the profile's error is returned.
    pub fn set_target(&mut self, target: f32) -> Result<(), P::Error> {
        let sensed = self.sensed();
        self.track.replan(sensed, target).inspect_err(|_| {
            self.halt();
        })
    }

    /// Duration (s) of the motion `set_target(target)` would plan now
    ///
    /// Leaves the follower untouched.
    pub fn try_estimate_duration(&self, target: f32) -> Result<f32, P::Error> {
        self.track.estimate(self.sensed(), target)
    }

    /// Like [`try_estimate_duration`](Self::try_estimate_duration), but
    /// returns [`DURATION_UNAVAILABLE`] when no profile can be built
    pub fn estimate_duration(&self, target: f32) -> f32 {
        self.try_estimate_duration(target)
            .unwrap_or(DURATION_UNAVAILABLE)
    }

    /// Disarm and command zero velocity
    ///
    /// The profile is kept so the aborted trajectory can be inspected.
    pub fn stop(&mut self) {
        self.track.disarm();
        self.halt();
    }

    /// Disarm, clear the profile and corrector, and re-zero the motor angle
    pub fn reset_all(&mut self) {
        self.track.reset();
        self.halt();
        self.motor.reset_angle();
        #[cfg(feature = "defmt")]
        defmt::info!("axis follower reset");
    }

    /// Whether the follower is armed and past the end of its profile
    pub fn is_finished(&self) -> bool {
        self.track.is_finished()
    }

    /// Whether the follower is armed
    pub fn is_running(&self) -> bool {
        self.track.is_running()
    }

    /// Current control state
    pub fn state(&self) -> FollowerState {
        self.track.state()
    }

    /// Time since the last successful plan (s)
    pub fn elapsed(&self) -> f32 {
        self.track.elapsed()
    }

    /// Tick interval (s)
    pub fn interval(&self) -> f32 {
        self.track.interval()
    }

    /// Kinematic limits used for planning
    pub fn limits(&self) -> &MotionLimits {
        self.track.limits()
    }

    /// The current (or last) profile
    pub fn profile(&self) -> &P {
        self.track.profile()
    }

    /// Get access to the position corrector
    pub fn corrector(&self) -> &C {
        &self.corrector
    }

    /// Get access to the motor channel
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Get mutable access to the motor channel
    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    /// Sample published by the most recent armed `update`
    pub fn last_sample(&self) -> &TrackingSample {
        self.track.last_sample()
    }

    /// Install (or remove) a hook called after every armed `update`
    pub fn set_observer(&mut self, observer: Option<fn(&TrackingSample)>) {
        self.track.set_observer(observer);
    }

    fn sensed(&self) -> SensedState {
        SensedState {
            position: self.motor.angle(),
            velocity: self.motor.velocity(),
        }
    }

    /// Zero the motor command and the corrector state
    fn halt(&mut self) {
        self.motor.set_velocity_reference(0.0);
        self.corrector.clear();
    }
}
