//! Test doubles for the follower collaborators

use crate::config::MotionLimits;
use crate::traits::{Corrector, MotionProfile, MotorChannel, PlanRequest};

/// Targets beyond this magnitude are rejected by [`MockProfile`]
pub const MOCK_REACH: f32 = 1000.0;

/// Acceleration slope of [`MockProfile`] (deg/s³)
pub const MOCK_JERK: f32 = 10.0;

pub const LIMITS: MotionLimits = MotionLimits::new(100.0, 200.0, 1000.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    InvalidLimits,
    OutOfReach,
}

/// Constant-velocity profile that records the request it was built from
///
/// Acceleration ramps linearly from the requested start value so tests can
/// tell which profile and which time it was sampled at.
#[derive(Debug, Clone, Default)]
pub struct MockProfile {
    pub request: Option<PlanRequest>,
    pub duration: f32,
    pub plans: u32,
    pub resets: u32,
}

impl MockProfile {
    fn clamp(&self, t: f32) -> f32 {
        t.clamp(0.0, self.duration)
    }

    fn direction(&self) -> f32 {
        match self.request {
            Some(r) if r.target_position < r.start_position => -1.0,
            _ => 1.0,
        }
    }
}

impl MotionProfile for MockProfile {
    type Error = MockError;

    fn plan(&mut self, request: &PlanRequest) -> Result<(), MockError> {
        self.plans += 1;
        // Mimic a planner that clobbers its state before giving up.
        self.request = None;
        self.duration = f32::NAN;

        if !request.limits.is_valid() {
            return Err(MockError::InvalidLimits);
        }
        if request.target_position.abs() > MOCK_REACH {
            return Err(MockError::OutOfReach);
        }

        let distance = (request.target_position - request.start_position).abs();
        self.request = Some(*request);
        self.duration = distance / request.limits.v_max + 0.01;
        Ok(())
    }

    fn total_duration(&self) -> f32 {
        self.duration
    }

    fn position_at(&self, t: f32) -> f32 {
        match self.request {
            Some(r) => {
                let t = self.clamp(t);
                if t >= self.duration {
                    r.target_position
                } else {
                    r.start_position + self.direction() * r.limits.v_max * t
                }
            }
            None => 0.0,
        }
    }

    fn velocity_at(&self, t: f32) -> f32 {
        match self.request {
            Some(r) if t < self.duration => self.direction() * r.limits.v_max,
            _ => 0.0,
        }
    }

    fn acceleration_at(&self, t: f32) -> f32 {
        match self.request {
            Some(r) => r.start_acceleration + MOCK_JERK * self.clamp(t),
            None => 0.0,
        }
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.request = None;
        self.duration = 0.0;
    }
}

/// Proportional-only corrector
#[derive(Debug, Clone, Default)]
pub struct MockCorrector {
    pub kp: f32,
    pub reference: f32,
    pub feedback: f32,
    pub output: f32,
    pub clears: u32,
}

impl Corrector for MockCorrector {
    type Config = f32;

    fn from_config(kp: &f32) -> Self {
        Self {
            kp: *kp,
            ..Default::default()
        }
    }

    fn set_reference(&mut self, reference: f32) {
        self.reference = reference;
    }

    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    fn calculate(&mut self) -> f32 {
        self.output = self.kp * (self.reference - self.feedback);
        self.output
    }

    fn output(&self) -> f32 {
        self.output
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.reference = 0.0;
        self.feedback = 0.0;
        self.output = 0.0;
    }
}

/// Motor with directly settable sensor values
#[derive(Debug, Clone, Default)]
pub struct MockMotor {
    pub angle: f32,
    pub velocity: f32,
    pub reference_rpm: f32,
    pub writes: u32,
    pub angle_resets: u32,
}

impl MockMotor {
    pub fn at(angle: f32, velocity: f32) -> Self {
        Self {
            angle,
            velocity,
            ..Default::default()
        }
    }
}

impl MotorChannel for MockMotor {
    fn angle(&self) -> f32 {
        self.angle
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn set_velocity_reference(&mut self, rpm: f32) {
        self.writes += 1;
        self.reference_rpm = rpm;
    }

    fn reset_angle(&mut self) {
        self.angle_resets += 1;
        self.angle = 0.0;
    }
}
