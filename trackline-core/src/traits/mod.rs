//! Collaborator traits
//!
//! These traits define the interface between the followers and the
//! profile, corrector and motor implementations they drive.

pub mod corrector;
pub mod motor;
pub mod profile;

pub use corrector::Corrector;
pub use motor::{dps_to_rpm, rpm_to_dps, MotorChannel};
pub use profile::{MotionProfile, PlanRequest};
