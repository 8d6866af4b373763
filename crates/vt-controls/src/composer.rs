//! Actuator composition.
//!
//! Mixes the rotary-wing and fixed-wing control requests into the two
//! physical actuator groups according to the flight mode and the current
//! rotary-wing weight. Total over its inputs: nothing is validated and
//! non-finite values pass straight through.

use nalgebra::Vector3;
use vt_core::Timestamp;

use crate::domain::{DomainControlVector, LandingGear, ThrustSetpoint, TorqueSetpoint};
use crate::mode::FlightMode;
use crate::slew::SurfaceTargets;
use crate::state::ThrottleState;
use crate::weights::ControlWeights;

/// Everything the composer produces in one cycle. All records carry the same `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedOutputs {
    pub timestamp: Timestamp,
    /// Lift rotor group.
    pub rotary: DomainControlVector,
    /// Forward-flight group: surfaces and pusher.
    pub fixed_wing: DomainControlVector,
    pub rotary_torque: TorqueSetpoint,
    pub fixed_wing_torque: TorqueSetpoint,
    pub rotary_thrust: ThrustSetpoint,
    pub fixed_wing_thrust: ThrustSetpoint,
}

/// Per-domain inputs of one composition.
#[derive(Debug, Clone, Copy)]
struct Sources<'a> {
    weights: &'a ControlWeights,
    throttle: &'a ThrottleState,
    surfaces: SurfaceTargets,
    rotary_in: &'a DomainControlVector,
    fixed_wing_in: &'a DomainControlVector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorComposer {
    /// Zero the fixed-wing roll and pitch surfaces while hovering.
    pub elevon_lock: bool,
}

impl ActuatorComposer {
    pub fn new(elevon_lock: bool) -> Self {
        Self { elevon_lock }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn compose(
        &self,
        now: Timestamp,
        mode: FlightMode,
        weights: &ControlWeights,
        throttle: &ThrottleState,
        surfaces: SurfaceTargets,
        rotary_in: &DomainControlVector,
        fixed_wing_in: &DomainControlVector,
    ) -> ComposedOutputs {
        let src = Sources {
            weights,
            throttle,
            surfaces,
            rotary_in,
            fixed_wing_in,
        };

        let (mut rotary, mut fixed_wing) = match mode {
            FlightMode::Mc => self.compose_hover(&src),
            FlightMode::TransitionToFw | FlightMode::TransitionToMc => compose_transition(&src),
            FlightMode::Fw => compose_forward_flight(&src),
        };
        rotary.timestamp_sample = rotary_in.timestamp_sample;
        fixed_wing.timestamp_sample = fixed_wing_in.timestamp_sample;

        ComposedOutputs {
            timestamp: now,
            rotary,
            fixed_wing,
            rotary_torque: TorqueSetpoint {
                timestamp: now,
                timestamp_sample: rotary_in.timestamp_sample,
                xyz: rotary.torque(),
            },
            fixed_wing_torque: TorqueSetpoint {
                timestamp: now,
                timestamp_sample: fixed_wing_in.timestamp_sample,
                xyz: fixed_wing.torque(),
            },
            // both propulsion groups share the rotary thrust frame
            rotary_thrust: ThrustSetpoint {
                timestamp: now,
                timestamp_sample: rotary_in.timestamp_sample,
                xyz: Vector3::new(fixed_wing.throttle, 0.0, -rotary.throttle),
            },
            fixed_wing_thrust: ThrustSetpoint {
                timestamp: now,
                timestamp_sample: fixed_wing_in.timestamp_sample,
                xyz: Vector3::zeros(),
            },
        }
    }

    fn compose_hover(&self, src: &Sources<'_>) -> (DomainControlVector, DomainControlVector) {
        let rotary = DomainControlVector {
            landing_gear: LandingGear::Down,
            ..DomainControlVector::attitude(
                src.rotary_in.roll,
                src.rotary_in.pitch,
                src.rotary_in.yaw,
                src.rotary_in.throttle,
            )
        };

        let (roll, pitch) = if self.elevon_lock {
            (0.0, 0.0)
        } else {
            (src.fixed_wing_in.roll, src.fixed_wing_in.pitch)
        };
        let fixed_wing = DomainControlVector {
            roll,
            pitch,
            yaw: 0.0,
            // forward assist while hovering
            throttle: src.throttle.pusher_throttle,
            airbrakes: 0.0,
            ..surface_group(src)
        };
        (rotary, fixed_wing)
    }
}

fn compose_transition(src: &Sources<'_>) -> (DomainControlVector, DomainControlVector) {
    let w = src.weights;
    let rotary = DomainControlVector {
        landing_gear: LandingGear::Up,
        ..DomainControlVector::attitude(
            src.rotary_in.roll * w.roll(),
            src.rotary_in.pitch * w.pitch(),
            src.rotary_in.yaw * w.yaw(),
            src.rotary_in.throttle * w.throttle(),
        )
    };
    let fixed_wing = DomainControlVector {
        roll: src.fixed_wing_in.roll,
        pitch: src.fixed_wing_in.pitch,
        yaw: src.fixed_wing_in.yaw,
        throttle: src.throttle.pusher_throttle,
        airbrakes: src.throttle.reverse_output,
        ..surface_group(src)
    };
    (rotary, fixed_wing)
}

fn compose_forward_flight(src: &Sources<'_>) -> (DomainControlVector, DomainControlVector) {
    let rotary = DomainControlVector {
        landing_gear: LandingGear::Up,
        ..DomainControlVector::default()
    };
    let fixed_wing = DomainControlVector {
        roll: src.fixed_wing_in.roll,
        pitch: src.fixed_wing_in.pitch,
        yaw: src.fixed_wing_in.yaw,
        throttle: src.fixed_wing_in.throttle,
        airbrakes: 0.0,
        ..surface_group(src)
    };
    (rotary, fixed_wing)
}

/// Fixed-wing group with only the slewed surfaces and gear filled in.
fn surface_group(src: &Sources<'_>) -> DomainControlVector {
    DomainControlVector {
        flaps: src.surfaces.flaps,
        spoilers: src.surfaces.spoilers,
        landing_gear: src.fixed_wing_in.landing_gear,
        ..DomainControlVector::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotary_in() -> DomainControlVector {
        DomainControlVector::attitude(0.1, -0.2, 0.3, 0.6).with_sample(Timestamp::from_micros(900))
    }

    fn fixed_wing_in() -> DomainControlVector {
        DomainControlVector::attitude(0.4, 0.5, -0.6, 0.7).with_sample(Timestamp::from_micros(800))
    }

    fn throttle() -> ThrottleState {
        ThrottleState {
            pusher_throttle: 0.25,
            reverse_output: 0.4,
        }
    }

    fn surfaces() -> SurfaceTargets {
        SurfaceTargets {
            flaps: 0.3,
            spoilers: 0.1,
        }
    }

    fn compose(composer: ActuatorComposer, mode: FlightMode, weight: f64) -> ComposedOutputs {
        composer.compose(
            Timestamp::from_micros(1_000),
            mode,
            &ControlWeights::new(weight),
            &throttle(),
            surfaces(),
            &rotary_in(),
            &fixed_wing_in(),
        )
    }

    #[test]
    fn hover_with_elevon_lock_zeroes_surfaces() {
        let out = compose(ActuatorComposer::new(true), FlightMode::Mc, 1.0);
        assert_eq!(out.fixed_wing.roll, 0.0);
        assert_eq!(out.fixed_wing.pitch, 0.0);
        assert_eq!(out.fixed_wing.yaw, 0.0);
        assert_eq!(out.rotary.landing_gear, LandingGear::Down);
        assert_eq!(out.rotary.roll, 0.1);
        assert_eq!(out.rotary.throttle, 0.6);
    }

    #[test]
    fn hover_without_elevon_lock_passes_surfaces() {
        let out = compose(ActuatorComposer::new(false), FlightMode::Mc, 1.0);
        assert_eq!(out.fixed_wing.roll, 0.4);
        assert_eq!(out.fixed_wing.pitch, 0.5);
        assert_eq!(out.fixed_wing.yaw, 0.0);
    }

    #[test]
    fn hover_pusher_drives_fixed_wing_throttle() {
        let out = compose(ActuatorComposer::new(true), FlightMode::Mc, 1.0);
        assert_eq!(out.fixed_wing.throttle, 0.25);
        assert_eq!(out.fixed_wing.airbrakes, 0.0);
        assert_eq!(out.fixed_wing.flaps, 0.3);
        assert_eq!(out.fixed_wing.spoilers, 0.1);
    }

    #[test]
    fn transition_scales_rotary_and_uses_reverse_output() {
        for mode in [FlightMode::TransitionToFw, FlightMode::TransitionToMc] {
            let out = compose(ActuatorComposer::new(true), mode, 0.5);
            assert!((out.rotary.roll - 0.05).abs() < 1e-12);
            assert!((out.rotary.pitch + 0.1).abs() < 1e-12);
            assert!((out.rotary.yaw - 0.15).abs() < 1e-12);
            assert!((out.rotary.throttle - 0.3).abs() < 1e-12);
            assert_eq!(out.rotary.landing_gear, LandingGear::Up);

            assert_eq!(out.fixed_wing.roll, 0.4);
            assert_eq!(out.fixed_wing.yaw, -0.6);
            assert_eq!(out.fixed_wing.throttle, 0.25);
            assert_eq!(out.fixed_wing.airbrakes, 0.4);
        }
    }

    #[test]
    fn forward_flight_silences_rotors() {
        let out = compose(ActuatorComposer::new(true), FlightMode::Fw, 0.0);
        assert_eq!(out.rotary.torque(), Vector3::zeros());
        assert_eq!(out.rotary.throttle, 0.0);
        assert_eq!(out.rotary.landing_gear, LandingGear::Up);
        assert_eq!(out.fixed_wing.throttle, 0.7);
        assert_eq!(out.fixed_wing.airbrakes, 0.0);
    }

    #[test]
    fn torque_and_thrust_records() {
        let out = compose(ActuatorComposer::new(false), FlightMode::TransitionToFw, 1.0);
        assert_eq!(out.rotary_torque.xyz, Vector3::new(0.1, -0.2, 0.3));
        assert_eq!(out.fixed_wing_torque.xyz, Vector3::new(0.4, 0.5, -0.6));
        assert_eq!(out.rotary_thrust.xyz, Vector3::new(0.25, 0.0, -0.6));
        assert_eq!(out.fixed_wing_thrust.xyz, Vector3::zeros());

        let now = Timestamp::from_micros(1_000);
        for ts in [
            out.timestamp,
            out.rotary_torque.timestamp,
            out.fixed_wing_torque.timestamp,
            out.rotary_thrust.timestamp,
            out.fixed_wing_thrust.timestamp,
        ] {
            assert_eq!(ts, now);
        }
        assert_eq!(out.rotary_torque.timestamp_sample, Timestamp::from_micros(900));
        assert_eq!(out.fixed_wing_thrust.timestamp_sample, Timestamp::from_micros(800));
        assert_eq!(out.rotary.timestamp_sample, Timestamp::from_micros(900));
    }

    #[test]
    fn non_finite_inputs_pass_through() {
        let composer = ActuatorComposer::new(false);
        let fw = DomainControlVector::attitude(f64::NAN, 0.0, 0.0, f64::INFINITY);
        let out = composer.compose(
            Timestamp::ZERO,
            FlightMode::Fw,
            &ControlWeights::FIXED_WING,
            &ThrottleState::default(),
            SurfaceTargets::RETRACTED,
            &DomainControlVector::default(),
            &fw,
        );
        assert!(out.fixed_wing.roll.is_nan());
        assert_eq!(out.fixed_wing.throttle, f64::INFINITY);
    }
}
