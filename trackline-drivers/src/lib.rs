//! Collaborator implementations for the trajectory followers
//!
//! This crate provides concrete implementations of the traits defined
//! in trackline-core:
//!
//! - Motion profiles (jerk-limited S-curve)
//! - Correctors (PD on position error)
//! - Motor channels (first-order simulated motor)

#![no_std]
#![deny(unsafe_code)]

pub mod corrector;
pub mod motor;
pub mod profile;

pub use corrector::Pd;
pub use motor::{SimMotor, SimMotorConfig};
pub use profile::{ProfileError, SCurve};
