//! Sine oscillator
//!
//! An oscillator is single-use: `stop` consumes it, so a stopped oscillator
//! can never be restarted. A new tone always needs a new `Oscillator`.

use std::f64::consts::TAU;

/// Phase-continuous sine oscillator
#[derive(Debug)]
pub struct Oscillator {
    /// Current phase in radians (0..TAU)
    phase: f64,
    /// Frequency in Hz
    frequency: f32,
    /// Phase advance per sample in radians
    increment: f64,
    sample_rate: u32,
}

impl Oscillator {
    /// Highest frequency accepted, as a fraction of the sample rate
    const MAX_FREQUENCY_RATIO: f32 = 0.45;

    /// Create an oscillator running at `frequency` Hz
    pub fn new(frequency: f32, sample_rate: u32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            frequency: 0.0,
            increment: 0.0,
            sample_rate: sample_rate.max(1),
        };
        osc.set_frequency(frequency);
        osc
    }

    /// Retarget the frequency without resetting phase
    pub fn set_frequency(&mut self, frequency: f32) {
        let nyquist_guard = self.sample_rate as f32 * Self::MAX_FREQUENCY_RATIO;
        self.frequency = frequency.clamp(0.0, nyquist_guard);
        self.increment = TAU * self.frequency as f64 / self.sample_rate as f64;
    }

    /// Current frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce the next sample in -1.0..=1.0
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.phase.sin() as f32;
        self.phase += self.increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        sample
    }

    /// Halt the oscillator permanently
    pub fn stop(self) {}
}
