//! Feedback corrector implementations

pub mod pd;

pub use pd::Pd;
