//! Stereo panner for mono sources

/// Equal-power stereo panner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoPanner {
    /// Pan position (-1.0 = full left, 0.0 = center, 1.0 = full right)
    pan: f32,
    gain_left: f32,
    gain_right: f32,
}

impl StereoPanner {
    /// Create a panner at the given position
    pub fn new(pan: f32) -> Self {
        let mut panner = Self {
            pan: 0.0,
            gain_left: 0.0,
            gain_right: 0.0,
        };
        panner.set_pan(pan);
        panner
    }

    /// Hard left panner
    pub fn hard_left() -> Self {
        Self::new(-1.0)
    }

    /// Hard right panner
    pub fn hard_right() -> Self {
        Self::new(1.0)
    }

    /// Set pan position (-1.0 to 1.0)
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        let angle = (self.pan + 1.0) * std::f32::consts::FRAC_PI_4;
        self.gain_left = angle.cos();
        self.gain_right = angle.sin();
        // cos(pi/2) is not exactly zero in f32
        if self.pan <= -1.0 {
            self.gain_right = 0.0;
        } else if self.pan >= 1.0 {
            self.gain_left = 0.0;
        }
    }

    /// Get pan position
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Place a mono sample into a (left, right) pair
    #[inline]
    pub fn apply(&self, sample: f32) -> (f32, f32) {
        (sample * self.gain_left, sample * self.gain_right)
    }
}

impl Default for StereoPanner {
    fn default() -> Self {
        Self::new(0.0)
    }
}
