//! Flight-mode state machine.
//!
//! Evaluated once per cycle, in priority order: the failsafe overlay, then the
//! fixed-wing request switch. Front transitions finish on airspeed (or time
//! when flying without an airspeed sensor); back transitions finish when slow
//! enough, on time, or on the ground. A front transition that loses its
//! request aborts straight back to hover.

use nalgebra::{UnitQuaternion, Vector3};
use tracing::{info, warn};
use vt_core::Timestamp;

use crate::collaborators::Collaborators;
use crate::mode::FlightMode;
use crate::params::TransitionParams;
use crate::state::VtolState;
use crate::weights::ControlWeights;

/// Per-cycle inputs to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerInputs {
    /// Pilot or mission wants fixed-wing flight.
    pub request_fixed_wing: bool,
    /// Supervisor asserted the transition failsafe.
    pub failsafe: bool,
    /// Calibrated airspeed (m/s); non-finite when no valid measurement exists.
    pub airspeed: f64,
    /// Local-frame (NED) velocity, `None` when the horizontal estimate is invalid.
    pub velocity_ned: Option<Vector3<f64>>,
    /// Vehicle attitude, body to local frame.
    pub attitude: UnitQuaternion<f64>,
}

impl Default for SchedulerInputs {
    fn default() -> Self {
        Self {
            request_fixed_wing: false,
            failsafe: false,
            airspeed: f64::NAN,
            velocity_ned: None,
            attitude: UnitQuaternion::identity(),
        }
    }
}

/// Decides flight-mode changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionScheduler {
    params: TransitionParams,
}

impl TransitionScheduler {
    pub fn new(params: TransitionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    /// Resolve this cycle's flight mode and apply its side effects on
    /// throttle and weights.
    pub fn advance<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &SchedulerInputs,
        collaborators: &C,
    ) -> FlightMode {
        let from = state.schedule.mode;

        if inputs.failsafe && !state.schedule.failsafe_latched {
            warn!(mode = %from, "transition failsafe engaged, switching to rotary-wing");
            state.schedule.failsafe_latched = true;
        }

        if state.schedule.failsafe_latched {
            state.schedule.mode = FlightMode::Mc;
            state.throttle.cut();

            if !inputs.request_fixed_wing {
                info!("transition failsafe released");
                state.schedule.failsafe_latched = false;
            }
        } else if inputs.request_fixed_wing {
            self.fixed_wing_requested(state, now, inputs, collaborators);
        } else {
            self.rotary_wing_requested(state, now, inputs, collaborators);
        }

        let mode = state.schedule.mode;
        match mode {
            FlightMode::Mc => state.weights = ControlWeights::ROTARY,
            FlightMode::Fw => state.weights = ControlWeights::FIXED_WING,
            // blend engine owns the weight while transitioning
            FlightMode::TransitionToFw | FlightMode::TransitionToMc => {}
        }

        if mode != from {
            info!(from = %from, to = %mode, "flight mode change");
        }
        mode
    }

    fn rotary_wing_requested<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &SchedulerInputs,
        collaborators: &C,
    ) {
        match state.schedule.mode {
            FlightMode::Mc => {
                state.throttle.reverse_output = 0.0;
            }
            FlightMode::Fw => {
                state
                    .schedule
                    .start_transition(FlightMode::TransitionToMc, now);
                state.throttle.reverse_output = self.params.reverse_output;
            }
            FlightMode::TransitionToFw => {
                // abort, no ramped back transition
                state.schedule.mode = FlightMode::Mc;
                state.throttle.cut();
            }
            FlightMode::TransitionToMc => {
                let ground_exit = collaborators.can_transition_on_ground();
                let speed_exit = self.back_transition_slow_enough(inputs);
                let time_exit =
                    state.schedule.elapsed(now) > self.params.back_trans_duration_s;

                if ground_exit || speed_exit || time_exit {
                    state.schedule.mode = FlightMode::Mc;
                }
            }
        }
    }

    fn fixed_wing_requested<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &SchedulerInputs,
        collaborators: &C,
    ) {
        match state.schedule.mode {
            // no failsafe-triggered entry into fixed-wing
            FlightMode::Mc | FlightMode::TransitionToMc => {
                state
                    .schedule
                    .start_transition(FlightMode::TransitionToFw, now);
            }
            FlightMode::Fw => {}
            FlightMode::TransitionToFw => {
                let airspeed_usable =
                    inputs.airspeed.is_finite() && !self.params.airspeed_disabled;
                let min_time_elapsed = state.schedule.elapsed(now)
                    > collaborators.minimum_front_transition_time(&self.params);

                let mut to_fixed_wing = min_time_elapsed
                    && (!airspeed_usable
                        || inputs.airspeed >= self.params.transition_airspeed_mps);
                to_fixed_wing |= collaborators.can_transition_on_ground();

                if to_fixed_wing {
                    state.schedule.mode = FlightMode::Fw;
                    state.schedule.transition_finished = Some(now);
                }
            }
        }
    }

    /// Body-forward ground speed below cruise, or airspeed below cruise
    /// when no ground velocity is available.
    fn back_transition_slow_enough(&self, inputs: &SchedulerInputs) -> bool {
        let cruise = self.params.cruise_speed_mps;
        if let Some(velocity) = inputs.velocity_ned {
            let body = inputs.attitude.inverse_transform_vector(&velocity);
            body.x < cruise
        } else if inputs.airspeed.is_finite() {
            inputs.airspeed < cruise
        } else {
            false
        }
    }
}
