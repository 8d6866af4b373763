//! Flight-mode transition control for standard VTOL aircraft.
//!
//! Every control cycle decides whether the vehicle flies as a multicopter, as
//! a fixed-wing aircraft, or is transitioning between the two, and blends the
//! two independently computed control domains into the physical actuator
//! groups accordingly.
//!
//! # Architecture
//!
//! One cycle runs three stages strictly in order, sharing a single
//! [`VtolState`] passed by exclusive borrow:
//! - [`TransitionScheduler`] resolves the flight mode
//! - [`BlendEngine`] computes rotor weight, pusher throttle and attitude setpoint
//! - [`ActuatorComposer`] mixes the domain requests into actuator outputs
//!
//! [`StandardVtol`] wires the three together. Vehicle services the stages
//! need but do not own (ground detection, deceleration law, hover assist)
//! come through the [`Collaborators`] trait.
//!
//! # Design Principles
//!
//! - **Total per-cycle path**: no `Result` inside a cycle; bad sensor data falls back
//! - **Fallible configuration**: parameters are validated and clamped once, up front
//! - **Safety first**: failsafe overrides everything and forces hover

pub mod blend;
pub mod collaborators;
pub mod composer;
pub mod controller;
pub mod domain;
pub mod error;
pub mod events;
pub mod mode;
pub mod params;
pub mod scheduler;
pub mod setpoint;
pub mod slew;
pub mod state;
pub mod vtol;
pub mod weights;

#[cfg(test)]
pub(crate) mod testing;

pub use blend::{BlendEngine, BlendInputs};
pub use collaborators::{AssistConfig, Collaborators, StandardCollaborators};
pub use composer::{ActuatorComposer, ComposedOutputs};
pub use controller::{PIController, PIControllerState};
pub use domain::{DomainControlVector, LandingGear, ThrustSetpoint, TorqueSetpoint};
pub use error::{ControlError, ControlResult};
pub use events::{QuadchuteReason, TransitionEvent};
pub use mode::{FlightMode, VtolMode};
pub use params::TransitionParams;
pub use scheduler::{SchedulerInputs, TransitionScheduler};
pub use setpoint::{AttitudeSetpoint, SETPOINT_FRESHNESS_S, merge_virtual_setpoints};
pub use slew::{SetpointSlew, SlewRateLimiter, SurfaceConfig, SurfaceSetpoints, SurfaceTargets};
pub use state::{ThrottleState, TransitionSchedule, VtolState};
pub use vtol::{CycleInputs, CycleOutputs, StandardVtol};
pub use weights::ControlWeights;
