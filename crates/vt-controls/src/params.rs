//! Transition parameters.
//!
//! Durations are in seconds, speeds in m/s, throttles are normalized to
//! `[0, 1]`. Parameters are read-only during a cycle; changing them goes through
//! [`TransitionParams::update`], which enforces the cross-parameter invariant.

use serde::{Deserialize, Serialize};
use vt_core::{EPSILON, as_radians, deg, ensure_finite};

use crate::error::{ControlError, ControlResult};

/// Configuration of the standard VTOL transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    /// Pusher ramp-up time at the start of a front transition. `<= 0` jumps to target.
    pub pusher_ramp_s: f64,
    /// Maximum back-transition duration before forcing rotary-wing mode.
    pub back_trans_duration_s: f64,
    /// Time over which rotary-wing authority ramps back in during back transition.
    pub back_trans_ramp_s: f64,
    /// Delay before reverse thrust engages during back transition.
    pub reverse_delay_s: f64,
    /// Ramp time of reverse thrust once the delay has elapsed.
    pub reverse_ramp_s: f64,
    /// Pusher throttle magnitude used for braking during back transition.
    pub back_trans_throttle: f64,
    /// Airbrake/reverse channel output during back transition.
    pub reverse_output: f64,
    /// Minimum front-transition time before switching to fixed-wing.
    pub front_trans_min_time_s: f64,
    /// Pusher target throttle during front transition.
    pub front_trans_throttle: f64,
    /// Calibrated airspeed at which the front transition completes.
    pub transition_airspeed_mps: f64,
    /// Calibrated airspeed at which control blending starts.
    pub blend_airspeed_mps: f64,
    /// Fly without an airspeed sensor (time-based transition only).
    pub airspeed_disabled: bool,
    /// Front-transition timeout that triggers a quadchute. `<= 0` disables it.
    pub transition_timeout_s: f64,
    /// Zero fixed-wing roll/pitch surfaces while hovering.
    pub elevon_lock: bool,
    /// Pitch setpoint offset reached at the end of the front transition.
    pub pitch_offset_deg: f64,
    /// Body-forward ground speed below which a back transition may finish.
    pub cruise_speed_mps: f64,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            pusher_ramp_s: 3.0,
            back_trans_duration_s: 4.0,
            back_trans_ramp_s: 3.0,
            reverse_delay_s: 0.0,
            reverse_ramp_s: 3.0,
            back_trans_throttle: 0.0,
            reverse_output: 0.0,
            front_trans_min_time_s: 2.0,
            front_trans_throttle: 1.0,
            transition_airspeed_mps: 10.0,
            blend_airspeed_mps: 8.0,
            airspeed_disabled: false,
            transition_timeout_s: 15.0,
            elevon_lock: true,
            pitch_offset_deg: 0.0,
            cruise_speed_mps: 5.0,
        }
    }
}

impl TransitionParams {
    /// Check ranges. Does not check the ramp/duration relation, which
    /// [`update`](Self::update) corrects silently.
    pub fn validate(&self) -> ControlResult<()> {
        let durations = [
            ("pusher_ramp_s", self.pusher_ramp_s),
            ("back_trans_duration_s", self.back_trans_duration_s),
            ("back_trans_ramp_s", self.back_trans_ramp_s),
            ("reverse_delay_s", self.reverse_delay_s),
            ("reverse_ramp_s", self.reverse_ramp_s),
            ("front_trans_min_time_s", self.front_trans_min_time_s),
            ("transition_timeout_s", self.transition_timeout_s),
        ];
        for (name, value) in durations {
            ensure_finite(value, name)?;
            if value < 0.0 {
                return Err(ControlError::InvalidParameter {
                    name,
                    value,
                    reason: "duration must be non-negative",
                });
            }
        }

        let unit_range = [
            ("back_trans_throttle", self.back_trans_throttle),
            ("reverse_output", self.reverse_output),
            ("front_trans_throttle", self.front_trans_throttle),
        ];
        for (name, value) in unit_range {
            ensure_finite(value, name)?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ControlError::InvalidParameter {
                    name,
                    value,
                    reason: "must be within [0, 1]",
                });
            }
        }

        let speeds = [
            ("transition_airspeed_mps", self.transition_airspeed_mps),
            ("blend_airspeed_mps", self.blend_airspeed_mps),
            ("cruise_speed_mps", self.cruise_speed_mps),
        ];
        for (name, value) in speeds {
            ensure_finite(value, name)?;
            if value < 0.0 {
                return Err(ControlError::InvalidParameter {
                    name,
                    value,
                    reason: "speed must be non-negative",
                });
            }
        }

        ensure_finite(self.pitch_offset_deg, "pitch_offset_deg")?;
        Ok(())
    }

    /// Apply the configuration-time invariant: back-transition ramps never
    /// outlast the back-transition itself.
    pub fn update(mut self) -> Self {
        self.back_trans_ramp_s = self.back_trans_ramp_s.min(self.back_trans_duration_s);
        self.reverse_ramp_s = self.reverse_ramp_s.min(self.back_trans_duration_s);
        self
    }

    /// Airspeed range over which authority is handed from rotors to wing.
    pub fn blend_margin_mps(&self) -> f64 {
        self.transition_airspeed_mps - self.blend_airspeed_mps
    }

    pub fn pitch_offset_rad(&self) -> f64 {
        as_radians(deg(self.pitch_offset_deg))
    }

    pub fn timeout_enabled(&self) -> bool {
        self.transition_timeout_s > EPSILON
    }
}
