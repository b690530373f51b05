//! Motion profile implementations

pub mod scurve;

pub use scurve::{Kinematics, ProfileError, SCurve, Segment};
