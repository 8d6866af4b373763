//! Control blending during transitions.
//!
//! Front transition: the pusher ramps up, rotor authority fades out either on
//! airspeed (between the blend and transition airspeeds) or on time when
//! there is no usable airspeed, and the pitch setpoint moves toward the
//! configured offset. Back transition: optional delayed reverse thrust, rotor
//! authority ramps back in over the back-transition ramp time.

use tracing::{debug, trace, warn};
use vt_core::{EPSILON, Timestamp, constrain};

use crate::collaborators::Collaborators;
use crate::events::{QuadchuteReason, TransitionEvent};
use crate::mode::FlightMode;
use crate::params::TransitionParams;
use crate::setpoint::{AttitudeSetpoint, merge_virtual_setpoints};
use crate::slew::SurfaceTargets;
use crate::state::VtolState;

/// Per-cycle inputs to the blend engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendInputs {
    /// Climb rate is controlled by the rotary-wing position loop.
    pub climb_rate_control: bool,
    pub mc_virtual_sp: AttitudeSetpoint,
    pub fw_virtual_sp: AttitudeSetpoint,
    /// Calibrated airspeed (m/s); non-finite when invalid.
    pub airspeed: f64,
    /// Flaps/spoilers requested outside of transitions.
    pub surface_request: SurfaceTargets,
    /// Supervisor asserted the transition failsafe this cycle.
    pub failsafe: bool,
}

impl Default for BlendInputs {
    fn default() -> Self {
        Self {
            climb_rate_control: false,
            mc_virtual_sp: AttitudeSetpoint::default(),
            fw_virtual_sp: AttitudeSetpoint::default(),
            airspeed: f64::NAN,
            surface_request: SurfaceTargets::RETRACTED,
            failsafe: false,
        }
    }
}

/// Computes weights, pusher throttle and the blended attitude setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendEngine {
    params: TransitionParams,
}

impl BlendEngine {
    pub fn new(params: TransitionParams) -> Self {
        Self { params }
    }

    /// Run one blend cycle for the mode already resolved by the scheduler.
    ///
    /// Returns a quadchute request when the front transition overruns its
    /// timeout. The request repeats every cycle while the overrun lasts.
    ///
    /// A stale virtual setpoint suspends the transition blend for the cycle:
    /// pusher, weights, surfaces and the timeout check all hold.
    pub fn update<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &BlendInputs,
        collaborators: &mut C,
        dt: f64,
    ) -> Option<TransitionEvent> {
        let setpoint_live = match merge_virtual_setpoints(
            now,
            inputs.climb_rate_control,
            &inputs.mc_virtual_sp,
            &inputs.fw_virtual_sp,
        ) {
            Some(sp) => {
                state.attitude_sp = sp;
                true
            }
            None => {
                debug!(%now, "virtual attitude setpoint stale, holding previous setpoint");
                false
            }
        };

        let event = match state.schedule.mode {
            FlightMode::Mc => {
                // the latch may already be released on the cycle the failsafe fires
                let failsafe = state.schedule.failsafe_latched || inputs.failsafe;
                state.throttle.pusher_throttle = if failsafe {
                    0.0
                } else {
                    collaborators.pusher_assist()
                };
                state.surfaces.update(inputs.surface_request, dt);
                None
            }
            FlightMode::Fw => {
                // fixed-wing throttle comes straight from the fixed-wing controller
                state.surfaces.update(inputs.surface_request, dt);
                None
            }
            FlightMode::TransitionToFw | FlightMode::TransitionToMc if !setpoint_live => None,
            FlightMode::TransitionToFw => {
                self.front_transition(state, now, inputs, collaborators, dt)
            }
            FlightMode::TransitionToMc => {
                self.back_transition(state, now, inputs, collaborators, dt);
                None
            }
        };

        trace!(
            mode = %state.schedule.mode,
            mc_weight = state.weights.value(),
            pusher = state.throttle.pusher_throttle,
            "blend cycle"
        );
        event
    }

    fn front_transition<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &BlendInputs,
        collaborators: &mut C,
        dt: f64,
    ) -> Option<TransitionEvent> {
        let p = &self.params;
        let elapsed = state.schedule.elapsed(now);
        let target = p.front_trans_throttle;

        if p.pusher_ramp_s <= EPSILON {
            state.throttle.pusher_throttle = target;
        } else if state.throttle.pusher_throttle <= target {
            state.throttle.pusher_throttle = (target * elapsed / p.pusher_ramp_s).min(target);
        }

        let min_time = collaborators.minimum_front_transition_time(p);
        let airspeed = inputs.airspeed;
        let margin = p.blend_margin_mps();

        let mut mc_weight = 1.0;
        if margin > 0.0
            && airspeed.is_finite()
            && airspeed > 0.0
            && airspeed >= p.blend_airspeed_mps
            && elapsed > min_time
        {
            mc_weight = 1.0 - (airspeed - p.blend_airspeed_mps).abs() / margin;
        } else if p.airspeed_disabled || !airspeed.is_finite() {
            mc_weight = constrain(2.0 * (1.0 - elapsed / min_time), 0.0, 1.0);
        }
        state.weights.set(mc_weight);

        let sp = &mut state.attitude_sp;
        sp.pitch_body = p.pitch_offset_rad() * (1.0 - state.weights.value());
        sp.sync_quaternion();

        state.surfaces.update(SurfaceTargets::RETRACTED, dt);

        if p.timeout_enabled() && elapsed > p.transition_timeout_s {
            warn!(
                elapsed_s = elapsed,
                timeout_s = p.transition_timeout_s,
                "front transition timed out, requesting quadchute"
            );
            return Some(TransitionEvent::Quadchute(
                QuadchuteReason::TransitionTimeout,
            ));
        }
        None
    }

    fn back_transition<C: Collaborators + ?Sized>(
        &self,
        state: &mut VtolState,
        now: Timestamp,
        inputs: &BlendInputs,
        collaborators: &mut C,
        dt: f64,
    ) {
        let p = &self.params;
        let elapsed = state.schedule.elapsed(now);

        if inputs.climb_rate_control {
            state.attitude_sp.pitch_body = collaborators.back_transition_pitch_setpoint(dt);
        }
        state.attitude_sp.sync_quaternion();

        state.throttle.pusher_throttle = 0.0;
        if elapsed >= p.reverse_delay_s {
            let thrscale = if p.reverse_ramp_s > EPSILON {
                constrain((elapsed - p.reverse_delay_s) / p.reverse_ramp_s, 0.0, 1.0)
            } else {
                1.0
            };
            state.throttle.pusher_throttle = thrscale * p.back_trans_throttle;
        }

        let mc_weight = if p.back_trans_ramp_s > EPSILON {
            elapsed / p.back_trans_ramp_s
        } else {
            1.0
        };
        state.weights.set(mc_weight);
    }
}
