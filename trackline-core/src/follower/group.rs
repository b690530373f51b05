//! Multi-motor trajectory follower
//!
//! Several mechanically coupled motors (for example the two sides of a
//! gantry) follow one shared S-curve. The profile is planned from the mean
//! sensed angle and velocity of the group; each motor then closes its own
//! position loop against the shared target so motors with different
//! dynamics still track the same path.

use heapless::Vec;

use crate::config::{ConfigError, GroupConfig, MotionLimits};
use crate::traits::{dps_to_rpm, Corrector, MotionProfile, MotorChannel};

use super::track::Track;
use super::{FollowerState, SensedState, TrackingSample, DURATION_UNAVAILABLE};

/// One motor of a group with its own position corrector
#[derive(Debug, Clone)]
pub struct GroupItem<C, M> {
    corrector: C,
    motor: M,
}

impl<C: Corrector, M: MotorChannel> GroupItem<C, M> {
    /// Get access to the item's corrector
    pub fn corrector(&self) -> &C {
        &self.corrector
    }

    /// Get access to the item's motor channel
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Get mutable access to the item's motor channel
    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    fn halt(&mut self) {
        self.motor.set_velocity_reference(0.0);
        self.corrector.clear();
    }
}

/// Follows one S-curve with up to `N` motors
///
/// The item count is fixed at construction.
#[derive(Debug, Clone)]
pub struct GroupFollower<P, C, M, const N: usize> {
    track: Track<P>,
    items: Vec<GroupItem<C, M>, N>,
}

impl<P, C, M, const N: usize> GroupFollower<P, C, M, N>
where
    P: MotionProfile,
    C: Corrector,
    M: MotorChannel,
{
    /// Create a disarmed follower
    ///
    /// `motors` are paired with `config.correctors` in order. Rejects an
    /// invalid tick interval, an empty group and mismatched counts.
    pub fn new<I>(config: &GroupConfig<C::Config, N>, motors: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = M>,
    {
        Self::build(config, motors).inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::warn!("group follower rejected: {}", _err);
        })
    }

    fn build<I>(config: &GroupConfig<C::Config, N>, motors: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = M>,
    {
        let track = Track::new(config.interval, config.limits)?;
        if config.correctors.is_empty() {
            return Err(ConfigError::NoItems);
        }

        let mut items = Vec::new();
        let mut motors = motors.into_iter();
        for corrector in config.correctors.iter() {
            let motor = motors.next().ok_or(ConfigError::ItemCountMismatch)?;
            // Capacity matches `config.correctors`, so this cannot overflow.
            let _ = items.push(GroupItem {
                corrector: C::from_config(corrector),
                motor,
            });
        }
        if motors.next().is_some() {
            return Err(ConfigError::ItemCountMismatch);
        }

        Ok(Self { track, items })
    }

    /// Run one control tick
    ///
    /// The shared profile is sampled once; every item then corrects against
    /// its own motor angle and receives exactly one velocity reference.
    pub fn update(&mut self) {
        let Some(setpoint) = self.track.advance() else {
            return;
        };

        for item in self.items.iter_mut() {
            item.corrector.set_reference(setpoint.position);
            item.corrector.set_feedback(item.motor.angle());
            let correction = item.corrector.calculate();
            item.motor
                .set_velocity_reference(dps_to_rpm(setpoint.velocity + correction));
        }
        self.track.record(setpoint);
    }

    /// Plan a new shared motion to `target` (deg)
    ///
    /// The start position and velocity are the arithmetic means over all
    /// motors. Acceleration, arming and failure handling follow
    /// [`AxisFollower::set_target`](super::AxisFollower::set_target); a
    /// failure stops every item.
    pub fn set_target(&mut self, target: f32) -> Result<(), P::Error> {
        let sensed = self.sensed();
        self.track.replan(sensed, target).inspect_err(|_| {
            self.halt_all();
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

    /// Disarm and command zero velocity on every motor
    pub fn stop(&mut self) {
        self.track.disarm();
        self.halt_all();
    }

    /// Disarm, clear the shared profile and every corrector, and re-zero
    /// every motor angle
    pub fn reset_all(&mut self) {
        self.track.reset();
        for item in self.items.iter_mut() {
            item.halt();
            item.motor.reset_angle();
        }
        #[cfg(feature = "defmt")]
        defmt::info!("group follower reset ({} items)", self.items.len());
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

    /// The shared profile
    pub fn profile(&self) -> &P {
        self.track.profile()
    }

    /// Items in configuration order
    pub fn items(&self) -> &[GroupItem<C, M>] {
        &self.items
    }

    /// Mutable items in configuration order
    ///
    /// The slice cannot grow or shrink.
    pub fn items_mut(&mut self) -> &mut [GroupItem<C, M>] {
        &mut self.items
    }

    /// Sample published by the most recent armed `update`
    pub fn last_sample(&self) -> &TrackingSample {
        self.track.last_sample()
    }

    /// Install (or remove) a hook called after every armed `update`
    pub fn set_observer(&mut self, observer: Option<fn(&TrackingSample)>) {
        self.track.set_observer(observer);
    }

    /// Mean sensed angle and velocity across the group
    fn sensed(&self) -> SensedState {
        let (position, velocity) = self
            .items
            .iter()
            .fold((0.0, 0.0), |(p, v), item| {
                (p + item.motor.angle(), v + item.motor.velocity())
            });
        // Construction guarantees at least one item.
        let count = self.items.len() as f32;

        SensedState {
            position: position / count,
            velocity: velocity / count,
        }
    }

    fn halt_all(&mut self) {
        for item in self.items.iter_mut() {
            item.halt();
        }
    }
}
