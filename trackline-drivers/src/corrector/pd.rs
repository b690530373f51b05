//! PD position error corrector
//!
//! Proportional-derivative control on position error, used on top of the
//! profile's feed-forward velocity. There is no integral term: the
//! feed-forward carries the bulk of the command and the motor's own
//! velocity loop removes steady-state velocity error.

use trackline_core::config::PdGains;
use trackline_core::traits::Corrector;

/// PD controller with symmetric output clamping
///
/// Output is in deg/s for position in deg. The derivative term uses the
/// change in error since the previous tick, so `kd` absorbs the tick
/// interval.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pd {
    gains: PdGains,
    reference: f32,
    feedback: f32,
    prev_error: f32,
    output: f32,
}

impl Pd {
    /// Create a PD controller with cleared state
    pub fn new(gains: PdGains) -> Self {
        Self {
            gains,
            ..Default::default()
        }
    }

    /// Get current gains
    pub fn gains(&self) -> &PdGains {
        &self.gains
    }

    /// Replace the gains
    ///
    /// Clears derivative history so the next step does not kick.
    pub fn set_gains(&mut self, gains: PdGains) {
        self.gains = gains;
        self.prev_error = 0.0;
    }

    /// Current reference value
    pub fn reference(&self) -> f32 {
        self.reference
    }

    /// Current feedback value
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Error seen by the most recent step
    pub fn error(&self) -> f32 {
        self.prev_error
    }
}

impl Corrector for Pd {
    type Config = PdGains;

    fn from_config(config: &PdGains) -> Self {
        Self::new(*config)
    }

    fn set_reference(&mut self, reference: f32) {
        self.reference = reference;
    }

    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    fn calculate(&mut self) -> f32 {
        let error = self.reference - self.feedback;
        let derivative = error - self.prev_error;
        self.prev_error = error;

        let output = self.gains.kp * error + self.gains.kd * derivative;
        let limit = self.gains.max_output;
        self.output = if limit > 0.0 {
            output.clamp(-limit, limit)
        } else {
            output
        };
        self.output
    }

    fn output(&self) -> f32 {
        self.output
    }

    fn clear(&mut self) {
        self.reference = 0.0;
        self.feedback = 0.0;
        self.prev_error = 0.0;
        self.output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(pd: &mut Pd, reference: f32, feedback: f32) -> f32 {
        pd.set_reference(reference);
        pd.set_feedback(feedback);
        pd.calculate()
    }

    #[test]
    fn test_proportional_only() {
        let mut pd = Pd::from_config(&PdGains::new(4.0, 0.0));
        assert_eq!(step(&mut pd, 10.0, 7.5), 10.0);
        assert_eq!(pd.output(), 10.0);
        assert_eq!(step(&mut pd, 10.0, 12.0), -8.0);
    }

    #[test]
    fn test_derivative_on_error_change() {
        let mut pd = Pd::new(PdGains::new(0.0, 2.0));
        // First step sees the full error as a change.
        assert_eq!(step(&mut pd, 5.0, 0.0), 10.0);
        assert_eq!(step(&mut pd, 5.0, 0.0), 0.0);
        assert_eq!(step(&mut pd, 5.0, 1.0), -2.0);
        assert_eq!(pd.error(), 4.0);
    }

    #[test]
    fn test_output_clamp() {
        let mut pd = Pd::new(PdGains::new(100.0, 0.0).with_max_output(30.0));
        assert_eq!(step(&mut pd, 10.0, 0.0), 30.0);
        assert_eq!(step(&mut pd, -10.0, 0.0), -30.0);
        assert_eq!(step(&mut pd, 0.25, 0.0), 25.0);
    }

    #[test]
    fn test_clear() {
        let mut pd = Pd::new(PdGains::new(1.0, 1.0));
        step(&mut pd, 3.0, 1.0);
        pd.clear();
        assert_eq!(pd.output(), 0.0);
        assert_eq!(pd.reference(), 0.0);
        assert_eq!(pd.feedback(), 0.0);
        assert_eq!(pd.error(), 0.0);
        assert_eq!(pd.calculate(), 0.0);
    }

    #[test]
    fn test_set_gains_resets_history() {
        let mut pd = Pd::new(PdGains::new(1.0, 1.0));
        step(&mut pd, 3.0, 0.0);
        pd.set_gains(PdGains::new(0.0, 1.0));
        assert_eq!(step(&mut pd, 3.0, 0.0), 3.0);
    }
}
