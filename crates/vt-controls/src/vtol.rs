//! One control cycle of a standard (pusher) VTOL: scheduler, blend, compose.

use nalgebra::{UnitQuaternion, Vector3};
use vt_core::Timestamp;

use crate::blend::{BlendEngine, BlendInputs};
use crate::collaborators::Collaborators;
use crate::composer::{ActuatorComposer, ComposedOutputs};
use crate::domain::DomainControlVector;
use crate::error::ControlResult;
use crate::events::TransitionEvent;
use crate::mode::{FlightMode, VtolMode};
use crate::params::TransitionParams;
use crate::scheduler::{SchedulerInputs, TransitionScheduler};
use crate::setpoint::AttitudeSetpoint;
use crate::slew::{SurfaceConfig, SurfaceTargets};
use crate::state::{ThrottleState, VtolState};
use crate::weights::ControlWeights;

/// Everything the host hands in for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleInputs {
    pub now: Timestamp,
    /// Cycle period (s).
    pub dt: f64,
    pub request_fixed_wing: bool,
    pub failsafe: bool,
    pub climb_rate_control: bool,
    /// Calibrated airspeed (m/s); non-finite when invalid.
    pub airspeed: f64,
    /// Local-frame (NED) velocity, `None` when the horizontal estimate is invalid.
    pub velocity_ned: Option<Vector3<f64>>,
    pub attitude: UnitQuaternion<f64>,
    pub mc_virtual_sp: AttitudeSetpoint,
    pub fw_virtual_sp: AttitudeSetpoint,
    pub mc_controls: DomainControlVector,
    pub fw_controls: DomainControlVector,
    pub surface_request: SurfaceTargets,
}

impl Default for CycleInputs {
    fn default() -> Self {
        Self {
            now: Timestamp::ZERO,
            dt: 0.0,
            request_fixed_wing: false,
            failsafe: false,
            climb_rate_control: false,
            airspeed: f64::NAN,
            velocity_ned: None,
            attitude: UnitQuaternion::identity(),
            mc_virtual_sp: AttitudeSetpoint::default(),
            fw_virtual_sp: AttitudeSetpoint::default(),
            mc_controls: DomainControlVector::default(),
            fw_controls: DomainControlVector::default(),
            surface_request: SurfaceTargets::RETRACTED,
        }
    }
}

impl CycleInputs {
    fn scheduler(&self) -> SchedulerInputs {
        SchedulerInputs {
            request_fixed_wing: self.request_fixed_wing,
            failsafe: self.failsafe,
            airspeed: self.airspeed,
            velocity_ned: self.velocity_ned,
            attitude: self.attitude,
        }
    }

    fn blend(&self) -> BlendInputs {
        BlendInputs {
            climb_rate_control: self.climb_rate_control,
            mc_virtual_sp: self.mc_virtual_sp,
            fw_virtual_sp: self.fw_virtual_sp,
            airspeed: self.airspeed,
            surface_request: self.surface_request,
            failsafe: self.failsafe,
        }
    }
}

/// Everything the cycle publishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutputs {
    pub mode: FlightMode,
    pub vtol_mode: VtolMode,
    pub attitude_sp: AttitudeSetpoint,
    pub weights: ControlWeights,
    pub throttle: ThrottleState,
    pub actuators: ComposedOutputs,
    pub event: Option<TransitionEvent>,
    pub failsafe_active: bool,
}

/// Transition controller for a standard VTOL with a dedicated pusher.
#[derive(Debug, Clone)]
pub struct StandardVtol<C: Collaborators> {
    params: TransitionParams,
    scheduler: TransitionScheduler,
    blend: BlendEngine,
    composer: ActuatorComposer,
    state: VtolState,
    collaborators: C,
}

impl<C: Collaborators> StandardVtol<C> {
    /// Validate `params`, apply the config-time clamps and start hovering.
    pub fn new(
        params: TransitionParams,
        surfaces: &SurfaceConfig,
        collaborators: C,
    ) -> ControlResult<Self> {
        params.validate()?;
        let params = params.update();
        Ok(Self {
            params,
            scheduler: TransitionScheduler::new(params),
            blend: BlendEngine::new(params),
            composer: ActuatorComposer::new(params.elevon_lock),
            state: VtolState::new(surfaces)?,
            collaborators,
        })
    }

    /// Swap parameters in flight. Mode and timing state are kept.
    pub fn update_params(&mut self, params: TransitionParams) -> ControlResult<()> {
        params.validate()?;
        let params = params.update();
        self.params = params;
        self.scheduler = TransitionScheduler::new(params);
        self.blend = BlendEngine::new(params);
        self.composer = ActuatorComposer::new(params.elevon_lock);
        Ok(())
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    pub fn mode(&self) -> FlightMode {
        self.state.mode()
    }

    pub fn state(&self) -> &VtolState {
        &self.state
    }

    /// For the post-transition throttle hand-over helpers on [`VtolState`].
    pub fn state_mut(&mut self) -> &mut VtolState {
        &mut self.state
    }

    pub fn collaborators(&self) -> &C {
        &self.collaborators
    }

    pub fn collaborators_mut(&mut self) -> &mut C {
        &mut self.collaborators
    }

    pub fn run_cycle(&mut self, inputs: &CycleInputs) -> CycleOutputs {
        let from = self.state.mode();
        let mode = self.scheduler.advance(
            &mut self.state,
            inputs.now,
            &inputs.scheduler(),
            &self.collaborators,
        );
        if mode != from {
            self.collaborators.on_mode_change(from, mode);
        }

        let event = self.blend.update(
            &mut self.state,
            inputs.now,
            &inputs.blend(),
            &mut self.collaborators,
            inputs.dt,
        );

        let actuators = self.composer.compose(
            inputs.now,
            mode,
            &self.state.weights,
            &self.state.throttle,
            self.state.surfaces.state(),
            &inputs.mc_controls,
            &inputs.fw_controls,
        );

        CycleOutputs {
            mode,
            vtol_mode: mode.vtol_mode(),
            attitude_sp: self.state.attitude_sp,
            weights: self.state.weights,
            throttle: self.state.throttle,
            actuators,
            event,
            failsafe_active: self.state.schedule.failsafe_latched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{AssistConfig, StandardCollaborators};
    use crate::domain::LandingGear;
    use crate::error::ControlError;
    use crate::testing::ScriptedCollaborators;

    fn at(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    fn inputs(t: f64, request_fixed_wing: bool) -> CycleInputs {
        CycleInputs {
            now: at(t),
            dt: 0.02,
            request_fixed_wing,
            mc_virtual_sp: AttitudeSetpoint::from_euler(0.0, 0.0, 0.0, at(t)),
            fw_virtual_sp: AttitudeSetpoint::from_euler(0.0, 0.0, 0.0, at(t)),
            mc_controls: DomainControlVector::attitude(0.1, 0.1, 0.1, 0.5),
            fw_controls: DomainControlVector::attitude(0.2, 0.2, 0.2, 0.6),
            ..Default::default()
        }
    }

    fn vtol() -> StandardVtol<ScriptedCollaborators> {
        StandardVtol::new(
            TransitionParams::default(),
            &SurfaceConfig::default(),
            ScriptedCollaborators::default(),
        )
        .unwrap()
    }

    #[test]
    fn request_starts_front_transition() {
        let mut v = vtol();
        let out = v.run_cycle(&inputs(0.0, true));
        assert_eq!(out.mode, FlightMode::TransitionToFw);
        assert_eq!(out.vtol_mode, VtolMode::TransitionToFw);
        assert_eq!(v.state().schedule.transition_start, Timestamp::ZERO);
        assert_eq!(out.actuators.rotary.landing_gear, LandingGear::Up);
    }

    #[test]
    fn failsafe_during_front_transition_forces_hover() {
        let mut v = vtol();
        for i in 0..100 {
            v.run_cycle(&inputs(f64::from(i) * 0.02, true));
        }
        assert_eq!(v.mode(), FlightMode::TransitionToFw);
        assert!(v.state().throttle.pusher_throttle > 0.0);

        let out = v.run_cycle(&CycleInputs {
            failsafe: true,
            ..inputs(2.0, true)
        });
        assert_eq!(out.mode, FlightMode::Mc);
        assert_eq!(out.throttle.pusher_throttle, 0.0);
        assert_eq!(out.throttle.reverse_output, 0.0);
        assert!(out.failsafe_active);
        assert_eq!(out.actuators.fixed_wing.throttle, 0.0);
        assert_eq!(out.weights, ControlWeights::ROTARY);

        // still latched while fixed-wing stays requested
        let out = v.run_cycle(&inputs(2.02, true));
        assert_eq!(out.mode, FlightMode::Mc);
        assert!(out.failsafe_active);

        let out = v.run_cycle(&inputs(2.04, false));
        assert!(!out.failsafe_active);
        assert_eq!(out.mode, FlightMode::Mc);
    }

    #[test]
    fn failsafe_with_withdrawn_request_keeps_pusher_off() {
        let mut v = StandardVtol::new(
            TransitionParams::default(),
            &SurfaceConfig::default(),
            ScriptedCollaborators {
                assist: 0.2,
                ..Default::default()
            },
        )
        .unwrap();
        for i in 0..50 {
            v.run_cycle(&inputs(f64::from(i) * 0.02, true));
        }
        assert_eq!(v.mode(), FlightMode::TransitionToFw);

        // latch set and released within the same cycle
        let out = v.run_cycle(&CycleInputs {
            failsafe: true,
            ..inputs(1.0, false)
        });
        assert_eq!(out.mode, FlightMode::Mc);
        assert!(!out.failsafe_active);
        assert_eq!(out.throttle.pusher_throttle, 0.0);
        assert_eq!(out.actuators.fixed_wing.throttle, 0.0);

        // failsafe gone and hover requested: assist is back
        let out = v.run_cycle(&inputs(1.02, false));
        assert_eq!(out.throttle.pusher_throttle, 0.2);
    }

    #[test]
    fn mode_changes_reach_collaborators() {
        let mut v = vtol();
        v.run_cycle(&inputs(0.0, true));
        v.run_cycle(&inputs(0.1, false));
        assert_eq!(
            v.collaborators().mode_changes,
            vec![
                (FlightMode::Mc, FlightMode::TransitionToFw),
                (FlightMode::TransitionToFw, FlightMode::Mc),
            ]
        );
    }

    #[test]
    fn full_front_and_back_transition() {
        let mut v = StandardVtol::new(
            TransitionParams {
                reverse_output: 0.5,
                ..Default::default()
            },
            &SurfaceConfig::default(),
            StandardCollaborators::new(AssistConfig::default()).unwrap(),
        )
        .unwrap();

        let mut t = 0.0;
        let mut airspeed = 0.0;
        while v.mode() != FlightMode::Fw {
            let out = v.run_cycle(&CycleInputs {
                airspeed,
                ..inputs(t, true)
            });
            assert!(out.event.is_none());
            airspeed += 0.1;
            t += 0.02;
            assert!(t < 10.0, "front transition never finished");
        }
        assert!(v.state().schedule.transition_finished.is_some());

        let out = v.run_cycle(&CycleInputs {
            airspeed: 15.0,
            ..inputs(t, false)
        });
        assert_eq!(out.mode, FlightMode::TransitionToMc);
        assert_eq!(out.actuators.fixed_wing.airbrakes, 0.5);

        t += 0.02;
        let out = v.run_cycle(&CycleInputs {
            airspeed: 3.0,
            ..inputs(t, false)
        });
        assert_eq!(out.mode, FlightMode::Mc);
        assert_eq!(out.weights, ControlWeights::ROTARY);
        assert_eq!(out.actuators.rotary.landing_gear, LandingGear::Down);
    }

    #[test]
    fn rejects_invalid_params() {
        let err = StandardVtol::new(
            TransitionParams {
                front_trans_throttle: 1.5,
                ..Default::default()
            },
            &SurfaceConfig::default(),
            ScriptedCollaborators::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ControlError::InvalidParameter { .. }));
    }

    #[test]
    fn params_update_clamps_back_ramp() {
        let mut v = vtol();
        v.update_params(TransitionParams {
            back_trans_duration_s: 2.0,
            back_trans_ramp_s: 5.0,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(v.params().back_trans_ramp_s, 2.0);
    }
}
