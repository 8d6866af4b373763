//! Longitudinal point-mass model of a standard VTOL.
//!
//! Lift rotors push straight up, the pusher pushes straight forward, and the
//! wing produces lift and drag from the forward airspeed. No attitude
//! dynamics: the fixed-wing pitch output acts directly on the lift
//! coefficient.

use serde::{Deserialize, Serialize};
use vt_core::constants::{G0_MPS2, RHO0_KGPM3};

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Airframe and propulsion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub mass_kg: f64,
    pub wing_area_m2: f64,
    /// Lift coefficient at zero elevator.
    pub cl_trim: f64,
    /// Lift coefficient per unit of fixed-wing pitch output.
    pub cl_per_pitch: f64,
    pub cl_max: f64,
    pub cd0: f64,
    /// Drag coefficient of the fully deployed airbrake/reverse channel.
    pub cd_airbrake: f64,
    /// Vertical drag coefficient of the airframe (climb/sink).
    pub cd_vertical: f64,
    /// Combined lift-rotor thrust at full throttle (N).
    pub max_lift_thrust_n: f64,
    /// Pusher thrust at full throttle (N).
    pub max_pusher_thrust_n: f64,
    pub air_density_kgpm3: f64,
    pub initial_altitude_m: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass_kg: 10.0,
            wing_area_m2: 1.2,
            cl_trim: 0.4,
            cl_per_pitch: 1.0,
            cl_max: 1.5,
            cd0: 0.05,
            cd_airbrake: 0.4,
            cd_vertical: 1.0,
            max_lift_thrust_n: 200.0,
            max_pusher_thrust_n: 35.0,
            air_density_kgpm3: RHO0_KGPM3,
            initial_altitude_m: 30.0,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            self.mass_kg,
            self.wing_area_m2,
            self.max_lift_thrust_n,
            self.air_density_kgpm3,
        ];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(SimError::InvalidArg {
                what: "mass, wing area, lift thrust and air density must be positive",
            });
        }
        let non_negative = [
            self.cl_max,
            self.cd0,
            self.cd_airbrake,
            self.cd_vertical,
            self.max_pusher_thrust_n,
        ];
        if non_negative.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SimError::InvalidArg {
                what: "aerodynamic coefficients and pusher thrust must be non-negative",
            });
        }
        if !self.cl_trim.is_finite() || !self.cl_per_pitch.is_finite() {
            return Err(SimError::InvalidArg {
                what: "lift coefficients must be finite",
            });
        }
        if !self.initial_altitude_m.is_finite() || self.initial_altitude_m < 0.0 {
            return Err(SimError::InvalidArg {
                what: "initial altitude must be non-negative",
            });
        }
        Ok(())
    }

    /// Lift-rotor throttle that balances weight in still hover.
    pub fn hover_throttle(&self) -> f64 {
        self.mass_kg * G0_MPS2 / self.max_lift_thrust_n
    }
}

/// Position and velocity in the vertical plane. Altitude and climb rate are
/// positive up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    pub x_m: f64,
    pub altitude_m: f64,
    pub forward_mps: f64,
    pub climb_mps: f64,
}

/// Actuator outputs held over one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleCommand {
    pub lift_throttle: f64,
    pub pusher_throttle: f64,
    pub elevator: f64,
    pub airbrakes: f64,
}

#[derive(Debug, Clone)]
pub struct PointMassVtol {
    pub params: VehicleParams,
    pub command: VehicleCommand,
}

impl PointMassVtol {
    pub fn new(params: VehicleParams) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            command: VehicleCommand::default(),
        })
    }

    fn dynamic_pressure(&self, speed: f64) -> f64 {
        0.5 * self.params.air_density_kgpm3 * speed * speed
    }
}

impl TransientModel for PointMassVtol {
    type State = VehicleState;

    fn initial_state(&self) -> VehicleState {
        VehicleState {
            altitude_m: self.params.initial_altitude_m,
            ..Default::default()
        }
    }

    fn rhs(&mut self, _t: f64, x: &VehicleState) -> SimResult<VehicleState> {
        let p = &self.params;
        let cmd = &self.command;
        if !(x.forward_mps.is_finite() && x.climb_mps.is_finite()) {
            return Err(SimError::NonPhysical {
                what: "vehicle velocity diverged",
            });
        }

        let q_s = self.dynamic_pressure(x.forward_mps) * p.wing_area_m2;
        let cl = (p.cl_trim + p.cl_per_pitch * cmd.elevator).clamp(0.0, p.cl_max);
        let cd = p.cd0 + p.cd_airbrake * cmd.airbrakes.clamp(0.0, 1.0);
        let drag = q_s * cd * x.forward_mps.signum();
        let lift = q_s * cl;
        let vertical_drag =
            self.dynamic_pressure(x.climb_mps) * p.wing_area_m2 * p.cd_vertical * x.climb_mps.signum();

        let thrust_forward = cmd.pusher_throttle.clamp(0.0, 1.0) * p.max_pusher_thrust_n;
        let thrust_up = cmd.lift_throttle.clamp(0.0, 1.0) * p.max_lift_thrust_n;

        let mut forward_accel = (thrust_forward - drag) / p.mass_kg;
        let mut climb_accel = (thrust_up + lift - vertical_drag) / p.mass_kg - G0_MPS2;

        // resting on the ground
        if x.altitude_m <= 0.0 && climb_accel < 0.0 && x.climb_mps <= 0.0 {
            climb_accel = 0.0;
            if x.forward_mps.abs() < 1e-3 {
                forward_accel = forward_accel.max(0.0);
            }
        }

        Ok(VehicleState {
            x_m: x.forward_mps,
            altitude_m: x.climb_mps,
            forward_mps: forward_accel,
            climb_mps: climb_accel,
        })
    }

    fn add(&self, a: &VehicleState, b: &VehicleState) -> VehicleState {
        VehicleState {
            x_m: a.x_m + b.x_m,
            altitude_m: a.altitude_m + b.altitude_m,
            forward_mps: a.forward_mps + b.forward_mps,
            climb_mps: a.climb_mps + b.climb_mps,
        }
    }

    fn scale(&self, a: &VehicleState, scale: f64) -> VehicleState {
        VehicleState {
            x_m: a.x_m * scale,
            altitude_m: a.altitude_m * scale,
            forward_mps: a.forward_mps * scale,
            climb_mps: a.climb_mps * scale,
        }
    }
}
