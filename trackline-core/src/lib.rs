//! Board-agnostic trajectory following for velocity-controlled motors
//!
//! This crate contains the control logic that does not depend on a
//! specific profile generator, corrector or motor driver:
//!
//! - Collaborator traits (motion profile, corrector, motor channel)
//! - Single-axis and group S-curve followers
//! - Configuration type definitions and persisted tuning
//!
//! Everything here runs in bounded time without allocation, so the
//! followers can be ticked from a hard real-time control loop.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod follower;
pub mod traits;

pub use config::{AxisConfig, ConfigError, GroupConfig, MotionLimits, PdGains};
pub use follower::{
    AxisFollower, FollowerState, GroupFollower, GroupItem, TrackingSample, DURATION_UNAVAILABLE,
};
