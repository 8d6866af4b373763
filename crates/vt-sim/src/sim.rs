//! Closed-loop transition simulation and result recording.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vt_controls::{
    AttitudeSetpoint, CycleInputs, DomainControlVector, FlightMode, StandardCollaborators,
    StandardVtol, SurfaceTargets, TransitionEvent,
};
use vt_core::Timestamp;
use vt_core::constants::G0_MPS2;

use crate::error::{SimError, SimResult};
use crate::integrator::IntegratorType;
use crate::model::TransientModel;
use crate::vehicle::{PointMassVtol, VehicleCommand, VehicleParams, VehicleState};

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fixed time step, also the control period (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.004,
            t_end: 40.0,
            max_steps: 1_000_000,
            record_every: 25,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Fixed-wing request switched at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestStep {
    pub at_s: f64,
    pub fixed_wing: bool,
}

/// Scripted pilot/mission inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Request changes, in time order. Before the first step hover is requested.
    pub requests: Vec<RequestStep>,
    /// Assert the transition failsafe from this time on.
    pub failsafe_at_s: Option<f64>,
    /// Feed the measured airspeed to the controller; otherwise it sees none.
    pub airspeed_valid: bool,
    pub climb_rate_control: bool,
    /// Speed the fixed-wing autopilot holds (m/s).
    pub cruise_airspeed_mps: f64,
    /// After a front transition, keep the transition thrust this long (s)
    /// before the fixed-wing autopilot's throttle is blended in.
    pub throttle_hold_s: f64,
    /// Time over which the pusher fades to the fixed-wing throttle (s).
    pub throttle_blend_s: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            requests: vec![
                RequestStep {
                    at_s: 2.0,
                    fixed_wing: true,
                },
                RequestStep {
                    at_s: 20.0,
                    fixed_wing: false,
                },
            ],
            failsafe_at_s: None,
            airspeed_valid: true,
            climb_rate_control: true,
            cruise_airspeed_mps: 18.0,
            throttle_hold_s: 0.2,
            throttle_blend_s: 1.5,
        }
    }
}

impl Scenario {
    pub fn validate(&self) -> SimResult<()> {
        let mut last = 0.0;
        for step in &self.requests {
            if !step.at_s.is_finite() || step.at_s < last {
                return Err(SimError::InvalidArg {
                    what: "request steps must be finite, non-negative and in time order",
                });
            }
            last = step.at_s;
        }
        if self.failsafe_at_s.is_some_and(|t| !t.is_finite() || t < 0.0) {
            return Err(SimError::InvalidArg {
                what: "failsafe time must be non-negative",
            });
        }
        if !self.cruise_airspeed_mps.is_finite() || self.cruise_airspeed_mps <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "cruise airspeed must be positive",
            });
        }
        let handover = [self.throttle_hold_s, self.throttle_blend_s];
        if handover.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SimError::InvalidArg {
                what: "throttle hand-over times must be non-negative",
            });
        }
        Ok(())
    }

    /// Fixed-wing request in effect at `t`.
    pub fn request_at(&self, t: f64) -> bool {
        self.requests
            .iter()
            .take_while(|step| step.at_s <= t)
            .last()
            .is_some_and(|step| step.fixed_wing)
    }

    pub fn failsafe_at(&self, t: f64) -> bool {
        self.failsafe_at_s.is_some_and(|at| t >= at)
    }
}

/// Stand-in for the rotary-wing and fixed-wing flight controllers: holds
/// the initial altitude and, in forward flight, the cruise airspeed.
#[derive(Debug, Clone, Copy)]
struct Autopilot {
    vehicle: VehicleParams,
    altitude_ref: f64,
    cruise_airspeed: f64,
}

impl Autopilot {
    fn rotary(&self, x: &VehicleState) -> DomainControlVector {
        let error = self.altitude_ref - x.altitude_m;
        let throttle = self.vehicle.hover_throttle() + 0.05 * error - 0.15 * x.climb_mps;
        DomainControlVector::attitude(0.0, 0.0, 0.0, throttle.clamp(0.0, 1.0))
    }

    fn fixed_wing(&self, x: &VehicleState) -> DomainControlVector {
        let throttle = 0.3 + 0.1 * (self.cruise_airspeed - x.forward_mps);

        let p = &self.vehicle;
        let q_s = 0.5 * p.air_density_kgpm3 * x.forward_mps.powi(2) * p.wing_area_m2;
        let elevator = if x.forward_mps > 3.0 {
            let cl_required = p.mass_kg * G0_MPS2 / q_s;
            let error = self.altitude_ref - x.altitude_m;
            (cl_required - p.cl_trim) / p.cl_per_pitch + 0.05 * error - 0.2 * x.climb_mps
        } else {
            0.0
        };
        DomainControlVector::attitude(0.0, elevator.clamp(-1.0, 1.0), 0.0, throttle.clamp(0.0, 1.0))
    }
}

/// One recorded control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSample {
    pub mode: FlightMode,
    pub mc_weight: f64,
    pub pusher_throttle: f64,
    /// Pusher command sent to the vehicle, after the fixed-wing hand-over.
    pub pusher_command: f64,
    pub lift_throttle: f64,
    pub airbrakes: f64,
}

/// A flight-mode change seen during the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeChange {
    pub t: f64,
    pub from: FlightMode,
    pub to: FlightMode,
}

/// Record of simulation results.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Vehicle state snapshots
    pub x: Vec<VehicleState>,
    /// Controller outputs at the same time points
    pub cycles: Vec<CycleSample>,
    /// Every mode change, regardless of decimation
    pub mode_changes: Vec<ModeChange>,
    /// Number of cycles that requested a quadchute
    pub quadchute_cycles: usize,
}

impl SimRecord {
    /// Modes visited, in order, starting with the initial one.
    pub fn mode_sequence(&self) -> Vec<FlightMode> {
        let mut seq = Vec::with_capacity(self.mode_changes.len() + 1);
        if let Some(first) = self.cycles.first() {
            seq.push(self.mode_changes.first().map_or(first.mode, |c| c.from));
        }
        seq.extend(self.mode_changes.iter().map(|c| c.to));
        seq
    }

    fn push(&mut self, t: f64, x: VehicleState, sample: CycleSample) {
        self.t.push(t);
        self.x.push(x);
        self.cycles.push(sample);
    }
}

/// Pusher command right after a front transition.
///
/// The transition thrust is held for `throttle_hold_s`, then faded to the
/// fixed-wing autopilot's throttle over `throttle_blend_s`. `None` outside
/// that window or outside fixed-wing flight.
fn front_transition_handover(
    vtol: &mut StandardVtol<StandardCollaborators>,
    now: Timestamp,
    fw_throttle: f64,
    scenario: &Scenario,
) -> Option<f64> {
    if vtol.mode() != FlightMode::Fw {
        return None;
    }
    let finished = vtol.state().schedule.transition_finished?;
    let since = now.secs_since(finished);
    if since >= scenario.throttle_hold_s + scenario.throttle_blend_s {
        return None;
    }

    let state = vtol.state_mut();
    state.attitude_sp.thrust_body[0] = fw_throttle;
    if since < scenario.throttle_hold_s {
        state.hold_transition_thrust();
    } else {
        state.blend_throttle_after_front_transition(
            (since - scenario.throttle_hold_s) / scenario.throttle_blend_s,
        );
    }
    Some(state.attitude_sp.thrust_body[0])
}

/// Fly `scenario` with `vtol` in the loop on the point-mass `vehicle`.
///
/// A quadchute request from the controller is honoured the way a supervisor
/// would: the fixed-wing request is dropped for the rest of the run.
pub fn run_sim(
    vtol: &mut StandardVtol<StandardCollaborators>,
    vehicle: &mut PointMassVtol,
    scenario: &Scenario,
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    opts.validate()?;
    scenario.validate()?;

    let autopilot = Autopilot {
        vehicle: vehicle.params,
        altitude_ref: vehicle.params.initial_altitude_m,
        cruise_airspeed: scenario.cruise_airspeed_mps,
    };
    vtol.collaborators_mut().air_density = vehicle.params.air_density_kgpm3;

    let mut record = SimRecord::default();
    let mut t = 0.0;
    let mut x = vehicle.initial_state();
    let mut forward_accel = 0.0;
    let mut quadchuted = false;
    let mut step = 0;

    info!(t_end = opts.t_end, dt = opts.dt, "starting transition simulation");

    while t < opts.t_end && step < opts.max_steps {
        let now = Timestamp::from_secs_f64(t);
        {
            let collab = vtol.collaborators_mut();
            collab.landed = x.altitude_m <= 0.0 && x.climb_mps <= 0.0;
            collab.forward_acceleration = forward_accel;
        }

        let mc_controls = autopilot.rotary(&x);
        let fw_controls = autopilot.fixed_wing(&x);
        let inputs = CycleInputs {
            now,
            dt: opts.dt,
            request_fixed_wing: scenario.request_at(t) && !quadchuted,
            failsafe: scenario.failsafe_at(t),
            climb_rate_control: scenario.climb_rate_control,
            airspeed: if scenario.airspeed_valid {
                x.forward_mps
            } else {
                f64::NAN
            },
            // local NED: north is forward, down is negative climb
            velocity_ned: Some(Vector3::new(x.forward_mps, 0.0, -x.climb_mps)),
            attitude: UnitQuaternion::identity(),
            mc_virtual_sp: AttitudeSetpoint::from_euler(0.0, 0.0, 0.0, now)
                .with_thrust([0.0, 0.0, -mc_controls.throttle]),
            fw_virtual_sp: AttitudeSetpoint::from_euler(0.0, fw_controls.pitch, 0.0, now)
                .with_thrust([fw_controls.throttle, 0.0, 0.0]),
            mc_controls,
            fw_controls,
            surface_request: SurfaceTargets::RETRACTED,
        };

        let from = vtol.mode();
        let out = vtol.run_cycle(&inputs);
        if out.mode != from {
            debug!(t, %from, to = %out.mode, "mode change");
            record.mode_changes.push(ModeChange {
                t,
                from,
                to: out.mode,
            });
        }
        if let Some(TransitionEvent::Quadchute(reason)) = out.event {
            record.quadchute_cycles += 1;
            if !quadchuted {
                warn!(t, %reason, "quadchute requested, dropping fixed-wing request");
                quadchuted = true;
            }
        }

        let pusher_command =
            front_transition_handover(vtol, now, out.actuators.fixed_wing.throttle, scenario)
                .unwrap_or(out.actuators.fixed_wing.throttle);

        vehicle.command = VehicleCommand {
            lift_throttle: out.actuators.rotary.throttle,
            pusher_throttle: pusher_command,
            elevator: out.actuators.fixed_wing.pitch,
            airbrakes: out.actuators.fixed_wing.airbrakes,
        };

        let sample = CycleSample {
            mode: out.mode,
            mc_weight: out.weights.value(),
            pusher_throttle: out.throttle.pusher_throttle,
            pusher_command,
            lift_throttle: out.actuators.rotary.throttle,
            airbrakes: out.actuators.fixed_wing.airbrakes,
        };
        if step % opts.record_every == 0 {
            record.push(t, x, sample);
        }

        let next = opts.integrator.step(vehicle, t, &x, opts.dt)?;
        forward_accel = (next.forward_mps - x.forward_mps) / opts.dt;
        if next.altitude_m < 0.0 {
            x = VehicleState {
                altitude_m: 0.0,
                climb_mps: next.climb_mps.max(0.0),
                ..next
            };
        } else {
            x = next;
        }

        t += opts.dt;
        step += 1;
    }

    info!(
        steps = step,
        mode_changes = record.mode_changes.len(),
        quadchute_cycles = record.quadchute_cycles,
        "simulation finished"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 0.004);
        assert_eq!(opts.t_end, 40.0);
        assert_eq!(opts.record_every, 25);
        assert_eq!(opts.integrator, IntegratorType::RK4);
        opts.validate().unwrap();
    }

    #[test]
    fn sim_options_invalid() {
        let opts = SimOptions {
            dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(SimError::InvalidArg { .. })));
        let opts = SimOptions {
            record_every: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn request_schedule_lookup() {
        let scenario = Scenario::default();
        assert!(!scenario.request_at(0.0));
        assert!(scenario.request_at(2.0));
        assert!(scenario.request_at(19.9));
        assert!(!scenario.request_at(20.0));
    }

    #[test]
    fn unordered_requests_rejected() {
        let scenario = Scenario {
            requests: vec![
                RequestStep {
                    at_s: 5.0,
                    fixed_wing: true,
                },
                RequestStep {
                    at_s: 1.0,
                    fixed_wing: false,
                },
            ],
            ..Default::default()
        };
        assert!(scenario.validate().is_err());
    }

    fn vtol_in_fixed_wing(finished_s: f64, pusher: f64) -> StandardVtol<StandardCollaborators> {
        use vt_controls::{AssistConfig, SurfaceConfig, TransitionParams};

        let collaborators = StandardCollaborators::new(AssistConfig::default()).unwrap();
        let mut vtol =
            StandardVtol::new(TransitionParams::default(), &SurfaceConfig::default(), collaborators)
                .unwrap();
        let state = vtol.state_mut();
        state.schedule.mode = FlightMode::Fw;
        state.schedule.transition_finished = Some(Timestamp::from_secs_f64(finished_s));
        state.throttle.pusher_throttle = pusher;
        vtol
    }

    #[test]
    fn handover_holds_then_blends_to_fixed_wing_throttle() {
        let scenario = Scenario::default();
        let mut vtol = vtol_in_fixed_wing(10.0, 0.8);
        let at = Timestamp::from_secs_f64;

        // hold window: transition thrust
        let cmd = front_transition_handover(&mut vtol, at(10.1), 0.4, &scenario).unwrap();
        assert!((cmd - 0.8).abs() < 1e-12);

        // halfway through the 1.5 s blend
        let cmd = front_transition_handover(&mut vtol, at(10.95), 0.4, &scenario).unwrap();
        assert!((cmd - 0.6).abs() < 1e-9);

        // hand-over done
        assert_eq!(front_transition_handover(&mut vtol, at(12.0), 0.4, &scenario), None);
    }

    #[test]
    fn handover_only_in_fixed_wing() {
        let mut vtol = vtol_in_fixed_wing(10.0, 0.8);
        vtol.state_mut().schedule.mode = FlightMode::TransitionToMc;
        let cmd = front_transition_handover(
            &mut vtol,
            Timestamp::from_secs_f64(10.1),
            0.4,
            &Scenario::default(),
        );
        assert_eq!(cmd, None);
    }

    #[test]
    fn negative_handover_time_rejected() {
        let scenario = Scenario {
            throttle_blend_s: -1.0,
            ..Default::default()
        };
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn failsafe_window() {
        let scenario = Scenario {
            failsafe_at_s: Some(3.0),
            ..Default::default()
        };
        assert!(!scenario.failsafe_at(2.9));
        assert!(scenario.failsafe_at(3.0));
    }
}
