//! Closed-loop simulation of the VTOL transition controller.
//!
//! Provides:
//! - Longitudinal point-mass VTOL model (lift rotors, pusher, wing)
//! - Fixed-step RK4 and forward Euler integrators
//! - Scripted fixed-wing request schedule with optional failsafe
//! - Time history of vehicle state and controller outputs

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod vehicle;

pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use model::TransientModel;
pub use sim::{CycleSample, ModeChange, RequestStep, Scenario, SimOptions, SimRecord, run_sim};
pub use vehicle::{PointMassVtol, VehicleCommand, VehicleParams, VehicleState};
