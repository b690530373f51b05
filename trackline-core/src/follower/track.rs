//! Shared trajectory timeline
//!
//! Both follower variants drive one logical trajectory: a profile, the
//! elapsed time since the last plan and the armed flag. This module owns
//! that state and the replanning rules; the variants only decide where the
//! sensed start state comes from and how commands fan out to motors.

use crate::config::{validate_interval, ConfigError, MotionLimits};
use crate::traits::{MotionProfile, PlanRequest};

use super::{FollowerState, SensedState, Setpoint, TrackingSample};

/// Profile plus timing state for one logical trajectory
#[derive(Debug, Clone)]
pub(crate) struct Track<P> {
    profile: P,
    limits: MotionLimits,
    interval: f32,
    elapsed: f32,
    running: bool,
    last_sample: TrackingSample,
    observer: Option<fn(&TrackingSample)>,
}

impl<P: MotionProfile> Track<P> {
    /// Create a disarmed track with an empty profile
    pub(crate) fn new(interval: f32, limits: MotionLimits) -> Result<Self, ConfigError> {
        validate_interval(interval)?;
        Ok(Self {
            profile: P::default(),
            limits,
            interval,
            elapsed: 0.0,
            running: false,
            last_sample: TrackingSample::default(),
            observer: None,
        })
    }

    pub(crate) fn profile(&self) -> &P {
        &self.profile
    }

    pub(crate) fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    pub(crate) fn interval(&self) -> f32 {
        self.interval
    }

    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn state(&self) -> FollowerState {
        if self.running {
            FollowerState::Armed
        } else {
            FollowerState::Disarmed
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.running && self.elapsed >= self.profile.total_duration()
    }

    pub(crate) fn last_sample(&self) -> &TrackingSample {
        &self.last_sample
    }

    pub(crate) fn set_observer(&mut self, observer: Option<fn(&TrackingSample)>) {
        self.observer = observer;
    }

    /// Boundary conditions for a plan starting from `sensed`
    ///
    /// Position and velocity come from the motors. Acceleration is carried
    /// over from the outgoing profile only while armed; a disarmed axis has
    /// no commanded acceleration to stay continuous with.
    fn request(&self, sensed: SensedState, target: f32) -> PlanRequest {
        let start_acceleration = if self.running {
            self.profile.acceleration_at(self.elapsed)
        } else {
            0.0
        };

        PlanRequest {
            start_position: sensed.position,
            target_position: target,
            start_velocity: sensed.velocity,
            start_acceleration,
            limits: self.limits,
        }
    }

    /// Rebuild the profile and restart the timeline
    ///
    /// On failure the track is left disarmed; the caller is responsible for
    /// stopping its motors.
    pub(crate) fn replan(&mut self, sensed: SensedState, target: f32) -> Result<(), P::Error> {
        let request = self.request(sensed, target);

        self.running = false;
        let result = self.profile.plan(&request);
        self.elapsed = 0.0;

        match result {
            Ok(()) => {
                self.running = true;
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "replanned {} -> {} (v0={}, a0={}), duration {}s",
                    request.start_position,
                    request.target_position,
                    request.start_velocity,
                    request.start_acceleration,
                    self.profile.total_duration()
                );
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "replan to {} failed: {}, stopping",
                    target,
                    defmt::Debug2Format(&err)
                );
                Err(err)
            }
        }
    }

    /// Plan into a scratch profile and report its duration
    pub(crate) fn estimate(&self, sensed: SensedState, target: f32) -> Result<f32, P::Error> {
        let mut scratch = P::default();
        scratch.plan(&self.request(sensed, target))?;
        Ok(scratch.total_duration())
    }

    /// Step the timeline by one tick and sample the profile
    ///
    /// Returns `None` while disarmed.
    pub(crate) fn advance(&mut self) -> Option<Setpoint> {
        if !self.running {
            return None;
        }

        self.elapsed += self.interval;
        Some(Setpoint {
            position: self.profile.position_at(self.elapsed),
            velocity: self.profile.velocity_at(self.elapsed),
        })
    }

    /// Publish the sample for the tick that just ran
    pub(crate) fn record(&mut self, setpoint: Setpoint) {
        self.last_sample = TrackingSample {
            elapsed: self.elapsed,
            target_position: setpoint.position,
            feedforward_velocity: setpoint.velocity,
        };
        if let Some(observer) = self.observer {
            observer(&self.last_sample);
        }
    }

    /// Disarm, keeping the profile for inspection
    pub(crate) fn disarm(&mut self) {
        self.running = false;
    }

    /// Disarm and return to the empty profile
    pub(crate) fn reset(&mut self) {
        self.running = false;
        self.profile.reset();
        self.elapsed = 0.0;
        self.last_sample = TrackingSample::default();
    }
}
