//! Mutable controller state threaded through scheduler, blend and composer.

use vt_core::Timestamp;

use crate::error::ControlResult;
use crate::mode::FlightMode;
use crate::setpoint::AttitudeSetpoint;
use crate::slew::{SurfaceConfig, SurfaceSetpoints};
use crate::weights::ControlWeights;

/// Flight mode and the timestamps of the current/last transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionSchedule {
    pub mode: FlightMode,
    /// Set only when a transition state is entered.
    pub transition_start: Timestamp,
    /// Set when a front transition completes; read by the post-transition throttle blend.
    pub transition_finished: Option<Timestamp>,
    /// Latched transition failsafe, released once fixed-wing is no longer requested.
    pub failsafe_latched: bool,
}

impl TransitionSchedule {
    /// Seconds since the current transition started.
    pub fn elapsed(&self, now: Timestamp) -> f64 {
        now.secs_since(self.transition_start)
    }

    pub(crate) fn start_transition(&mut self, mode: FlightMode, now: Timestamp) {
        self.mode = mode;
        // never move the start backward
        self.transition_start = self.transition_start.max(now);
    }
}

/// Pusher and reverse/airbrake outputs owned by the transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrottleState {
    /// Forward-thrust motor output. Not capped here.
    pub pusher_throttle: f64,
    /// Braking/airbrake channel during back transition.
    pub reverse_output: f64,
}

impl ThrottleState {
    pub fn cut(&mut self) {
        self.pusher_throttle = 0.0;
        self.reverse_output = 0.0;
    }
}

/// Everything the transition controller carries from one cycle to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct VtolState {
    pub schedule: TransitionSchedule,
    pub weights: ControlWeights,
    pub throttle: ThrottleState,
    pub attitude_sp: AttitudeSetpoint,
    pub surfaces: SurfaceSetpoints,
}

impl VtolState {
    /// Hover state with full rotary-wing authority and retracted surfaces.
    pub fn new(surfaces: &SurfaceConfig) -> ControlResult<Self> {
        Ok(Self {
            schedule: TransitionSchedule::default(),
            weights: ControlWeights::ROTARY,
            throttle: ThrottleState::default(),
            attitude_sp: AttitudeSetpoint::default(),
            surfaces: SurfaceSetpoints::from_config(surfaces)?,
        })
    }

    pub fn mode(&self) -> FlightMode {
        self.schedule.mode
    }

    /// Keep the transition thrust while the fixed-wing energy controller is
    /// not yet producing a throttle of its own.
    pub fn hold_transition_thrust(&mut self) {
        self.attitude_sp.thrust_body[0] = self.throttle.pusher_throttle;
    }

    /// Fade from the transition pusher throttle to the fixed-wing throttle
    /// after a front transition. `scale = 1` hands over completely.
    pub fn blend_throttle_after_front_transition(&mut self, scale: f64) {
        let scale = vt_core::constrain(scale, 0.0, 1.0);
        let fw_throttle = self.attitude_sp.thrust_body[0];
        self.attitude_sp.thrust_body[0] =
            scale * fw_throttle + (1.0 - scale) * self.throttle.pusher_throttle;
    }
}
