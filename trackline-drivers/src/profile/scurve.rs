//! Jerk-limited S-curve profile
//!
//! The profile brings an axis from an arbitrary start state (position,
//! velocity, acceleration) to rest at a target position without exceeding
//! the jerk and acceleration limits, and without exceeding the velocity
//! limit except while shedding an initial over-speed.
//!
//! # Shape
//!
//! ```text
//! velocity
//!    ^        ___________
//!    |      /             \
//!    |    /                 \
//!    |___/                   \___
//!    +---+---+---+-------+---+---+---> t
//!      1   2   3     4     5   6  7
//! ```
//!
//! 1-3 take the start state to the peak velocity `vp` (jerk, constant
//! acceleration, jerk), 4 cruises at `vp`, 5-7 bring `vp` down to zero.
//! Any segment may have zero length; a start state moving away from the
//! target gives a negative `vp` region after a reversal in 1-3.
//!
//! When cruising at `±v_max` cannot fit, `vp` is found by bisection over
//! `[-v_max, v_max]` with no cruise. The iteration count is fixed, so
//! planning time is bounded.

use libm::{fabsf, fmaxf, sqrtf};
use trackline_core::config::MotionLimits;
use trackline_core::traits::{MotionProfile, PlanRequest};

/// Number of constant-jerk segments in a profile
pub const MAX_SEGMENTS: usize = 7;

/// Bisection iterations when searching for the peak velocity
const BISECTION_STEPS: usize = 48;

/// Relative slack on the start acceleration before a plan is rejected
const ACCEL_TOLERANCE: f32 = 1e-3;

/// Start states closer than this to the target (deg) and at rest need no motion
const POSITION_EPSILON: f32 = 1e-6;

/// Errors from planning an S-curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// A velocity, acceleration or jerk bound is zero, negative or not finite
    InvalidLimits,
    /// A boundary value is NaN or infinite
    NonFiniteInput,
    /// Start acceleration exceeds the acceleration bound
    AccelerationOutOfRange,
    /// Start state is already at rest on the target
    ///
    /// Not a fault: there is nothing to plan. A follower asked to hold its
    /// current resting position reports this and stays stopped.
    NoMotion,
}

/// Position, velocity and acceleration at one instant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Kinematics {
    /// Position (deg)
    pub position: f32,
    /// Velocity (deg/s)
    pub velocity: f32,
    /// Acceleration (deg/s²)
    pub acceleration: f32,
}

impl Kinematics {
    /// State after applying constant `jerk` for `dt` seconds
    fn advance(&self, jerk: f32, dt: f32) -> Self {
        let dt2 = dt * dt;
        Self {
            position: self.position
                + self.velocity * dt
                + self.acceleration * dt2 / 2.0
                + jerk * dt2 * dt / 6.0,
            velocity: self.velocity + self.acceleration * dt + jerk * dt2 / 2.0,
            acceleration: self.acceleration + jerk * dt,
        }
    }
}

/// One constant-jerk piece of the profile
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Profile time at which the segment begins (s)
    pub start_time: f32,
    /// Segment length (s)
    pub duration: f32,
    /// Jerk applied throughout the segment (deg/s³)
    pub jerk: f32,
    /// State at `start_time`
    pub initial: Kinematics,
}

/// (jerk, duration) pairs taking one velocity to another
type Ramp = [(f32, f32); 3];

/// Time-optimal change from velocity `v0` and acceleration `a0` to
/// velocity `v1` at zero acceleration
fn velocity_change(v0: f32, a0: f32, v1: f32, a_max: f32, j_max: f32) -> Ramp {
    // Velocity reached by just bringing the acceleration back to zero.
    let v_settle = v0 + a0 * fabsf(a0) / (2.0 * j_max);
    let dir = if v1 >= v_settle { 1.0 } else { -1.0 };

    // Work as if accelerating upwards.
    let a0 = dir * a0;
    let dv = dir * (v1 - v0);

    let mut peak = sqrtf(fmaxf((2.0 * j_max * dv + a0 * a0) / 2.0, 0.0));
    let mut hold = 0.0;
    if peak > a_max {
        peak = a_max;
        hold = fmaxf((dv - (2.0 * a_max * a_max - a0 * a0) / (2.0 * j_max)) / a_max, 0.0);
    }

    let rise = fmaxf((peak - a0) / j_max, 0.0);
    let fall = peak / j_max;

    [(dir * j_max, rise), (0.0, hold), (-dir * j_max, fall)]
}

fn run(mut state: Kinematics, ramp: &Ramp) -> Kinematics {
    for &(jerk, dt) in ramp {
        state = state.advance(jerk, dt);
    }
    state
}

/// Jerk-limited point-to-point profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SCurve {
    segments: [Segment; MAX_SEGMENTS],
    total_duration: f32,
    target: f32,
    peak_velocity: f32,
    limits: MotionLimits,
}

impl SCurve {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a profile, returning it by value
    pub fn planned(request: &PlanRequest) -> Result<Self, ProfileError> {
        let mut profile = Self::new();
        profile.plan(request)?;
        Ok(profile)
    }

    /// The constant-jerk segments, in time order
    pub fn segments(&self) -> &[Segment; MAX_SEGMENTS] {
        &self.segments
    }

    /// Velocity held during the cruise segment (deg/s)
    pub fn peak_velocity(&self) -> f32 {
        self.peak_velocity
    }

    /// Position the profile comes to rest at (deg)
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Limits the profile was planned with
    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    /// Full kinematic state at elapsed time `t`
    ///
    /// Before the start this is the start state; from the end onwards the
    /// axis is at rest on the target.
    pub fn sample(&self, t: f32) -> Kinematics {
        if t >= self.total_duration {
            return Kinematics {
                position: self.target,
                velocity: 0.0,
                acceleration: 0.0,
            };
        }
        if t <= 0.0 {
            return self.segments[0].initial;
        }

        let segment = self
            .segments
            .iter()
            .rev()
            .find(|s| s.duration > 0.0 && t >= s.start_time)
            .unwrap_or(&self.segments[0]);
        segment.initial.advance(segment.jerk, t - segment.start_time)
    }

    /// Displacement of a zero-cruise profile peaking at `vp`
    fn travel(v0: f32, a0: f32, vp: f32, limits: &MotionLimits) -> f32 {
        let (a_max, j_max) = (limits.a_max, limits.j_max);
        let origin = Kinematics {
            position: 0.0,
            velocity: v0,
            acceleration: a0,
        };
        let rest = Kinematics {
            position: 0.0,
            velocity: vp,
            acceleration: 0.0,
        };

        let up = run(origin, &velocity_change(v0, a0, vp, a_max, j_max));
        let down = run(rest, &velocity_change(vp, 0.0, 0.0, a_max, j_max));
        up.position + down.position
    }

    /// Choose the peak velocity and cruise time for a displacement
    fn shape(distance: f32, v0: f32, a0: f32, limits: &MotionLimits) -> (f32, f32) {
        let v_max = limits.v_max;

        let forward = Self::travel(v0, a0, v_max, limits);
        if distance >= forward {
            return (v_max, (distance - forward) / v_max);
        }
        let backward = Self::travel(v0, a0, -v_max, limits);
        if distance <= backward {
            return (-v_max, (backward - distance) / v_max);
        }

        let (mut lo, mut hi) = (-v_max, v_max);
        for _ in 0..BISECTION_STEPS {
            let mid = (lo + hi) / 2.0;
            if Self::travel(v0, a0, mid, limits) < distance {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        ((lo + hi) / 2.0, 0.0)
    }
}

impl MotionProfile for SCurve {
    type Error = ProfileError;

    fn plan(&mut self, request: &PlanRequest) -> Result<(), ProfileError> {
        self.reset();

        let limits = request.limits;
        if !limits.is_valid() {
            return Err(ProfileError::InvalidLimits);
        }

        let PlanRequest {
            start_position: p0,
            target_position: p1,
            start_velocity: v0,
            start_acceleration: a0,
            ..
        } = *request;
        if ![p0, p1, v0, a0].iter().all(|v| v.is_finite()) {
            return Err(ProfileError::NonFiniteInput);
        }
        if fabsf(a0) > limits.a_max * (1.0 + ACCEL_TOLERANCE) {
            return Err(ProfileError::AccelerationOutOfRange);
        }
        let a0 = a0.clamp(-limits.a_max, limits.a_max);

        let distance = p1 - p0;
        if v0 == 0.0 && a0 == 0.0 && fabsf(distance) <= POSITION_EPSILON {
            return Err(ProfileError::NoMotion);
        }

        let (vp, cruise) = Self::shape(distance, v0, a0, &limits);
        let up = velocity_change(v0, a0, vp, limits.a_max, limits.j_max);
        let down = velocity_change(vp, 0.0, 0.0, limits.a_max, limits.j_max);

        let pieces = up
            .into_iter()
            .chain(core::iter::once((0.0, cruise)))
            .chain(down);
        let mut state = Kinematics {
            position: p0,
            velocity: v0,
            acceleration: a0,
        };
        let mut time = 0.0;
        for (segment, (jerk, duration)) in self.segments.iter_mut().zip(pieces) {
            *segment = Segment {
                start_time: time,
                duration,
                jerk,
                initial: state,
            };
            state = state.advance(jerk, duration);
            time += duration;
        }

        if time.is_nan() || time <= 0.0 {
            self.reset();
            return Err(ProfileError::NoMotion);
        }

        self.total_duration = time;
        self.target = p1;
        self.peak_velocity = vp;
        self.limits = limits;
        Ok(())
    }

    fn total_duration(&self) -> f32 {
        self.total_duration
    }

    fn position_at(&self, t: f32) -> f32 {
        self.sample(t).position
    }

    fn velocity_at(&self, t: f32) -> f32 {
        self.sample(t).velocity
    }

    fn acceleration_at(&self, t: f32) -> f32 {
        self.sample(t).acceleration
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
