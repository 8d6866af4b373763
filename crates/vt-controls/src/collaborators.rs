//! Vehicle-level predicates and control laws the transition logic delegates to.
//!
//! The scheduler and blend engine never estimate state or run attitude
//! control themselves. Whatever they need from the rest of the vehicle comes
//! through [`Collaborators`]. [`StandardCollaborators`] is a self-contained
//! implementation that is good enough for simulation and bench testing.

use serde::{Deserialize, Serialize};
use vt_core::{as_radians, constants::RHO0_KGPM3, deg};

use crate::controller::{PIController, PIControllerState};
use crate::error::ControlResult;
use crate::mode::FlightMode;
use crate::params::TransitionParams;

/// Services provided by the host vehicle.
pub trait Collaborators {
    /// Whether a transition may complete instantly because the vehicle is on the ground.
    fn can_transition_on_ground(&self) -> bool;

    /// Minimum front-transition time in seconds. May depend on air data.
    fn minimum_front_transition_time(&self, params: &TransitionParams) -> f64;

    /// Forward-thrust assist (pusher throttle) while hovering.
    fn pusher_assist(&mut self) -> f64;

    /// Pitch setpoint (rad) controlling deceleration during back transition.
    fn back_transition_pitch_setpoint(&mut self, dt: f64) -> f64;

    /// Called once whenever the flight mode changes.
    fn on_mode_change(&mut self, _from: FlightMode, _to: FlightMode) {}
}

/// Tuning of [`StandardCollaborators`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Scale the minimum front-transition time with thin air.
    pub density_scaled_min_time: bool,
    /// Pusher throttle per radian of requested forward tilt. `0` disables assist.
    pub forward_thrust_gain: f64,
    /// Upper bound of the hover pusher assist.
    pub forward_thrust_max: f64,
    /// Target deceleration during back transition (m/s^2).
    pub back_trans_decel_mss: f64,
    /// Pitch per m/s^2 of deceleration error (rad s^2/m).
    pub back_trans_decel_ff: f64,
    /// Integral gain on deceleration error.
    pub back_trans_decel_i: f64,
    /// Maximum back-transition pitch-up (deg).
    pub back_trans_pitch_max_deg: f64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            density_scaled_min_time: true,
            forward_thrust_gain: 0.0,
            forward_thrust_max: 0.3,
            back_trans_decel_mss: 2.0,
            back_trans_decel_ff: 0.12,
            back_trans_decel_i: 0.1,
            back_trans_pitch_max_deg: 15.0,
        }
    }
}

/// Reference collaborators fed by the host each cycle.
#[derive(Debug, Clone)]
pub struct StandardCollaborators {
    pub config: AssistConfig,
    pub armed: bool,
    pub landed: bool,
    /// Current air density (kg/m^3); non-finite means unknown.
    pub air_density: f64,
    /// Forward tilt the hover position controller asks for (rad, nose down positive).
    pub forward_tilt_request: f64,
    /// Body-forward acceleration (m/s^2); negative while braking.
    pub forward_acceleration: f64,
    decel_pi: PIController,
    decel_state: PIControllerState,
}

impl StandardCollaborators {
    pub fn new(config: AssistConfig) -> ControlResult<Self> {
        let decel_pi = PIController::new(
            config.back_trans_decel_ff,
            config.back_trans_decel_i,
            0.0,
            as_radians(deg(config.back_trans_pitch_max_deg)),
        )?;
        Ok(Self {
            config,
            armed: true,
            landed: false,
            air_density: RHO0_KGPM3,
            forward_tilt_request: 0.0,
            forward_acceleration: 0.0,
            decel_pi,
            decel_state: PIControllerState::default(),
        })
    }

    /// Thin air needs longer to build the same dynamic pressure.
    fn density_factor(&self) -> f64 {
        if !self.config.density_scaled_min_time
            || !self.air_density.is_finite()
            || self.air_density <= 0.0
        {
            return 1.0;
        }
        (RHO0_KGPM3 / self.air_density).clamp(1.0, 2.0)
    }
}

impl Collaborators for StandardCollaborators {
    fn can_transition_on_ground(&self) -> bool {
        !self.armed || self.landed
    }

    fn minimum_front_transition_time(&self, params: &TransitionParams) -> f64 {
        params.front_trans_min_time_s * self.density_factor()
    }

    fn pusher_assist(&mut self) -> f64 {
        if self.landed || self.config.forward_thrust_gain <= 0.0 {
            return 0.0;
        }
        let tilt = self.forward_tilt_request.max(0.0);
        (self.config.forward_thrust_gain * tilt).clamp(0.0, self.config.forward_thrust_max)
    }

    fn back_transition_pitch_setpoint(&mut self, dt: f64) -> f64 {
        let deceleration = -self.forward_acceleration;
        let (state, pitch) = self.decel_pi.update(
            &self.decel_state,
            deceleration,
            self.config.back_trans_decel_mss,
            dt,
        );
        self.decel_state = state;
        pitch
    }

    fn on_mode_change(&mut self, _from: FlightMode, to: FlightMode) {
        if to == FlightMode::TransitionToMc {
            self.decel_state = PIControllerState::default();
        }
    }
}
