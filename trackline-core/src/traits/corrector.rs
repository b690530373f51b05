//! Feedback corrector trait

/// Closed-loop error corrector
///
/// The follower writes a reference and a measured value, then asks for one
/// correction step per control tick. Output units match the input units per
/// second (degrees in, degrees per second out).
pub trait Corrector {
    /// Gains and limits the corrector is built from
    type Config;

    /// Create a corrector with cleared state
    fn from_config(config: &Self::Config) -> Self;

    /// Set the reference (desired) value
    fn set_reference(&mut self, reference: f32);

    /// Set the feedback (measured) value
    fn set_feedback(&mut self, feedback: f32);

    /// Run one correction step and return the new output
    fn calculate(&mut self) -> f32;

    /// Output of the most recent `calculate`
    fn output(&self) -> f32;

    /// Zero the reference, feedback, derivative history and output
    fn clear(&mut self);
}
