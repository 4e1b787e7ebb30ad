//! Gain stage - shared output level for the oscillator pair

/// Output gain with per-sample smoothing
///
/// The smoothed value starts at silence and glides toward the target, which
/// gives every new tone a short fade-in and keeps volume changes click-free.
#[derive(Debug, Clone)]
pub struct GainStage {
    /// Target gain (0.0 - 1.0)
    target: f32,
    /// Smoothed gain (interpolates toward target)
    smoothed: f32,
}

impl GainStage {
    /// Smoothing coefficient (~5ms at 48kHz)
    const SMOOTH_COEFF: f32 = 0.995;

    /// Create a gain stage that fades in to `target`
    pub fn new(target: f32) -> Self {
        Self {
            target: target.clamp(0.0, 1.0),
            smoothed: 0.0,
        }
    }

    /// Set target gain (0.0 - 1.0)
    pub fn set_target(&mut self, gain: f32) {
        self.target = gain.clamp(0.0, 1.0);
    }

    /// Get target gain
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Get the current smoothed gain
    pub fn current(&self) -> f32 {
        self.smoothed
    }

    /// Advance smoothing by one frame and return the gain to apply
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.smoothed = Self::SMOOTH_COEFF * self.smoothed + (1.0 - Self::SMOOTH_COEFF) * self.target;
        self.smoothed
    }
}

/// Soft clip threshold
const SOFT_CLIP_THRESHOLD: f32 = 0.75;
/// Soft clip ceiling
const SOFT_CLIP_CEILING: f32 = 0.89;

/// Gentle soft clipper for the output bus
///
/// Transparent below the threshold, asymptotic approach to the ceiling above.
#[inline(always)]
pub fn soft_clip(x: f32) -> f32 {
    let abs_x = x.abs();

    if abs_x <= SOFT_CLIP_THRESHOLD {
        return x;
    }

    let sign = x.signum();
    let knee_width = SOFT_CLIP_CEILING - SOFT_CLIP_THRESHOLD;
    let ratio = (abs_x - SOFT_CLIP_THRESHOLD) / knee_width;

    let compressed = SOFT_CLIP_THRESHOLD + knee_width * (1.0 - (-ratio * 3.0).exp());
    sign * compressed.min(SOFT_CLIP_CEILING)
}
