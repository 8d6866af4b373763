//! Rotary-wing control weights.

use vt_core::constrain;

/// Share of rotary-wing authority applied to the lift rotors.
///
/// Downstream consumers address roll, pitch, yaw and throttle separately, but
/// all four always carry the same value, so a single scalar backs them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlWeights {
    mc_weight: f64,
}

impl ControlWeights {
    /// Full rotary-wing authority.
    pub const ROTARY: Self = Self { mc_weight: 1.0 };
    /// No rotary-wing authority.
    pub const FIXED_WING: Self = Self { mc_weight: 0.0 };

    /// Create weights, clamping into `[0, 1]` (NaN maps to 0).
    pub fn new(mc_weight: f64) -> Self {
        Self {
            mc_weight: constrain(mc_weight, 0.0, 1.0),
        }
    }

    pub fn set(&mut self, mc_weight: f64) {
        *self = Self::new(mc_weight);
    }

    pub fn value(&self) -> f64 {
        self.mc_weight
    }

    pub fn roll(&self) -> f64 {
        self.mc_weight
    }

    pub fn pitch(&self) -> f64 {
        self.mc_weight
    }

    pub fn yaw(&self) -> f64 {
        self.mc_weight
    }

    pub fn throttle(&self) -> f64 {
        self.mc_weight
    }

    /// `[roll, pitch, yaw, throttle]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.roll(), self.pitch(), self.yaw(), self.throttle()]
    }
}

impl Default for ControlWeights {
    fn default() -> Self {
        Self::ROTARY
    }
}
