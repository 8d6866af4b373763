//! Scripted collaborators for unit tests.

use crate::collaborators::Collaborators;
use crate::mode::FlightMode;
use crate::params::TransitionParams;

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedCollaborators {
    pub on_ground: bool,
    /// Overrides the configured minimum front-transition time when set.
    pub min_front_time: Option<f64>,
    pub assist: f64,
    pub back_pitch: f64,
    pub mode_changes: Vec<(FlightMode, FlightMode)>,
}

impl Collaborators for ScriptedCollaborators {
    fn can_transition_on_ground(&self) -> bool {
        self.on_ground
    }

    fn minimum_front_transition_time(&self, params: &TransitionParams) -> f64 {
        self.min_front_time.unwrap_or(params.front_trans_min_time_s)
    }

    fn pusher_assist(&mut self) -> f64 {
        self.assist
    }

    fn back_transition_pitch_setpoint(&mut self, _dt: f64) -> f64 {
        self.back_pitch
    }

    fn on_mode_change(&mut self, from: FlightMode, to: FlightMode) {
        self.mode_changes.push((from, to));
    }
}
