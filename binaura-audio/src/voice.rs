//! Binaural voice - oscillator pair wired through panners into a gain stage
//!
//! Signal path:
//!
//! ```text
//! left osc  (carrier)        -> panner(-1) -\
//!                                            +-> gain -> output
//! right osc (carrier + beat) -> panner(+1) -/
//! ```

use crate::gain::GainStage;
use crate::oscillator::Oscillator;
use crate::panner::StereoPanner;

/// One running binaural tone
#[derive(Debug)]
pub struct BinauralVoice {
    /// Identity of the tone this voice renders
    id: u64,
    left: Oscillator,
    right: Oscillator,
    pan_left: StereoPanner,
    pan_right: StereoPanner,
    gain: GainStage,
    carrier_hz: f32,
    beat_hz: f32,
}

impl BinauralVoice {
    /// Build a fresh oscillator pair
    pub fn new(id: u64, carrier_hz: f32, beat_hz: f32, volume: f32, sample_rate: u32) -> Self {
        Self {
            id,
            left: Oscillator::new(carrier_hz, sample_rate),
            right: Oscillator::new(carrier_hz + beat_hz, sample_rate),
            pan_left: StereoPanner::hard_left(),
            pan_right: StereoPanner::hard_right(),
            gain: GainStage::new(volume),
            carrier_hz,
            beat_hz,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn carrier_hz(&self) -> f32 {
        self.carrier_hz
    }

    pub fn beat_hz(&self) -> f32 {
        self.beat_hz
    }

    pub fn volume(&self) -> f32 {
        self.gain.target()
    }

    /// Frequencies actually produced by the (left, right) oscillators
    pub fn ear_frequencies(&self) -> (f32, f32) {
        (self.left.frequency(), self.right.frequency())
    }

    /// Retune both oscillators live
    pub fn retune(&mut self, carrier_hz: f32, beat_hz: f32) {
        self.carrier_hz = carrier_hz;
        self.beat_hz = beat_hz;
        self.left.set_frequency(carrier_hz);
        self.right.set_frequency(carrier_hz + beat_hz);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.gain.set_target(volume);
    }

    /// Add this voice into an interleaved stereo buffer
    pub fn render(&mut self, output: &mut [f32]) {
        for frame in output.chunks_exact_mut(2) {
            let gain = self.gain.next();
            let (ll, lr) = self.pan_left.apply(self.left.next_sample());
            let (rl, rr) = self.pan_right.apply(self.right.next_sample());
            frame[0] += (ll + rl) * gain;
            frame[1] += (lr + rr) * gain;
        }
    }

    /// Release both oscillators
    pub fn stop(self) {
        self.left.stop();
        self.right.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Count positive-going zero crossings in one channel
    fn crossings(buffer: &[f32], channel: usize) -> usize {
        let samples: Vec<f32> = buffer.iter().skip(channel).step_by(2).copied().collect();
        samples
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count()
    }

    #[test]
    fn test_ears_get_carrier_and_offset() {
        let voice = BinauralVoice::new(1, 200.0, 10.0, 0.3, 48000);
        assert_eq!(voice.ear_frequencies(), (200.0, 210.0));
    }

    #[test]
    fn test_render_frequencies_per_channel() {
        let mut voice = BinauralVoice::new(1, 200.0, 10.0, 1.0, 48000);
        // One second of audio
        let mut buffer = vec![0.0f32; 48000 * 2];
        voice.render(&mut buffer);

        let left = crossings(&buffer, 0) as i32;
        let right = crossings(&buffer, 1) as i32;
        assert!((left - 200).abs() <= 1, "left crossings {}", left);
        assert!((right - 210).abs() <= 1, "right crossings {}", right);
    }

    #[test]
    fn test_retune_updates_both_ears() {
        let mut voice = BinauralVoice::new(1, 200.0, 6.0, 0.3, 48000);
        voice.retune(200.0, 12.0);
        assert_eq!(voice.ear_frequencies(), (200.0, 212.0));
        assert_eq!(voice.beat_hz(), 12.0);
    }

    #[test]
    fn test_output_stays_bounded() {
        let mut voice = BinauralVoice::new(1, 200.0, 10.0, 1.0, 44100);
        let mut buffer = vec![0.0f32; 4096];
        voice.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }
}
