//! Attitude setpoints and the rotary/fixed-wing merge.

use nalgebra::UnitQuaternion;
use vt_core::Timestamp;

/// Virtual setpoints older than this are not merged.
pub const SETPOINT_FRESHNESS_S: f64 = 1.0;

/// Attitude setpoint in body Euler angles (rad) plus normalized body thrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSetpoint {
    pub roll_body: f64,
    pub pitch_body: f64,
    pub yaw_body: f64,
    pub thrust_body: [f64; 3],
    pub q_d: UnitQuaternion<f64>,
    pub timestamp: Timestamp,
}

impl Default for AttitudeSetpoint {
    fn default() -> Self {
        Self {
            roll_body: 0.0,
            pitch_body: 0.0,
            yaw_body: 0.0,
            thrust_body: [0.0; 3],
            q_d: UnitQuaternion::identity(),
            timestamp: Timestamp::ZERO,
        }
    }
}

impl AttitudeSetpoint {
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64, timestamp: Timestamp) -> Self {
        Self {
            roll_body: roll,
            pitch_body: pitch,
            yaw_body: yaw,
            q_d: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
            timestamp,
            ..Default::default()
        }
    }

    pub fn with_thrust(mut self, thrust_body: [f64; 3]) -> Self {
        self.thrust_body = thrust_body;
        self
    }

    /// Rebuild `q_d` after the Euler angles were edited.
    pub fn sync_quaternion(&mut self) {
        self.q_d = UnitQuaternion::from_euler_angles(self.roll_body, self.pitch_body, self.yaw_body);
    }

    pub fn is_fresh(&self, now: Timestamp) -> bool {
        self.timestamp.is_fresh(now, SETPOINT_FRESHNESS_S)
    }
}

/// Merge the two virtual setpoints, or `None` if either is stale.
///
/// With climb-rate control the rotary setpoint leads and only roll is taken
/// from the fixed-wing side. Otherwise the fixed-wing setpoint leads and its
/// forward thrust is mirrored onto the rotary vertical axis.
pub fn merge_virtual_setpoints(
    now: Timestamp,
    climb_rate_control: bool,
    mc_virtual: &AttitudeSetpoint,
    fw_virtual: &AttitudeSetpoint,
) -> Option<AttitudeSetpoint> {
    if !(mc_virtual.is_fresh(now) && fw_virtual.is_fresh(now)) {
        return None;
    }

    let merged = if climb_rate_control {
        let mut sp = *mc_virtual;
        sp.roll_body = fw_virtual.roll_body;
        sp
    } else {
        let mut sp = *fw_virtual;
        sp.thrust_body[2] = -fw_virtual.thrust_body[0];
        sp
    };
    Some(merged)
}
