//! PI controller used by the back-transition deceleration law.
//!
//! The back transition brakes the vehicle by pitching up. A proportional
//! feed-forward plus integral correction on the deceleration error gives the
//! pitch setpoint; the integrator is frozen while the output is saturated.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// PI controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PIController {
    /// Proportional (feed-forward) gain.
    pub kp: f64,
    /// Integral gain (1/s).
    pub ki: f64,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
}

impl PIController {
    /// Create a new PI controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain, zero disables integral action
    /// * `out_min` - Minimum output
    /// * `out_max` - Maximum output
    pub fn new(kp: f64, ki: f64, out_min: f64, out_max: f64) -> ControlResult<Self> {
        if !kp.is_finite() || !ki.is_finite() || ki < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "gains must be finite and ki non-negative",
            });
        }
        if out_min >= out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        Ok(Self {
            kp,
            ki,
            out_min,
            out_max,
        })
    }

    /// Compute controller output given process variable and setpoint.
    ///
    /// Returns the updated state and the clamped output. Non-positive `dt`
    /// skips integration.
    pub fn update(
        &self,
        state: &PIControllerState,
        pv: f64,
        sp: f64,
        dt: f64,
    ) -> (PIControllerState, f64) {
        let error = sp - pv;
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        let new_integral = state.integral + self.ki * error * dt;
        let output_raw = self.kp * error + new_integral;
        let output = output_raw.clamp(self.out_min, self.out_max);

        // Anti-windup: if output is saturated, don't accumulate integral
        let integral = if output == output_raw {
            new_integral
        } else {
            state.integral
        };

        (PIControllerState { integral }, output)
    }
}

/// PI controller state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PIControllerState {
    /// Integral accumulator (already scaled by `ki`).
    pub integral: f64,
}
