//! Motor channel implementations
//!
//! Hardware channels live with the board support code; this module only
//! carries the simulated channel used for bench runs and tests.

pub mod sim;

pub use sim::{SimMotor, SimMotorConfig};
