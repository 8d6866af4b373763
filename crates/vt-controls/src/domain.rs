//! Per-domain control vectors and the derived torque/thrust records.

use nalgebra::Vector3;
use vt_core::Timestamp;

/// Landing gear command carried on the rotary-wing actuator group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingGear {
    #[default]
    Down,
    Up,
}

impl LandingGear {
    /// Normalized actuator value (`-1` down, `+1` up).
    pub fn as_control(self) -> f64 {
        match self {
            LandingGear::Down => -1.0,
            LandingGear::Up => 1.0,
        }
    }
}

/// Control request (input) or actuator-group output of one domain.
///
/// Values are normalized: roll/pitch/yaw in `[-1, 1]`, throttle in `[0, 1]`.
/// Nothing here validates them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomainControlVector {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub throttle: f64,
    pub flaps: f64,
    pub spoilers: f64,
    pub airbrakes: f64,
    pub landing_gear: LandingGear,
    /// Sample time of the estimate the producing controller ran on.
    pub timestamp_sample: Timestamp,
}

impl DomainControlVector {
    /// Attitude channels only.
    pub fn attitude(roll: f64, pitch: f64, yaw: f64, throttle: f64) -> Self {
        Self {
            roll,
            pitch,
            yaw,
            throttle,
            ..Default::default()
        }
    }

    pub fn with_sample(mut self, timestamp_sample: Timestamp) -> Self {
        self.timestamp_sample = timestamp_sample;
        self
    }

    pub fn torque(&self) -> Vector3<f64> {
        Vector3::new(self.roll, self.pitch, self.yaw)
    }
}

/// Normalized body torque request of one actuator group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueSetpoint {
    pub timestamp: Timestamp,
    pub timestamp_sample: Timestamp,
    pub xyz: Vector3<f64>,
}

/// Normalized body thrust request of one actuator group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustSetpoint {
    pub timestamp: Timestamp,
    pub timestamp_sample: Timestamp,
    pub xyz: Vector3<f64>,
}
