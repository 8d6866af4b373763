//! Flight modes of a standard VTOL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fine-grained flight phase owned by the transition scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightMode {
    /// Hovering on the lift rotors.
    #[default]
    Mc,
    /// Wing-borne forward flight.
    Fw,
    /// Front transition: pusher spinning up, rotors fading out.
    TransitionToFw,
    /// Back transition: decelerating, rotors taking authority back.
    TransitionToMc,
}

/// Coarse vehicle mode published to the higher-level mode mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VtolMode {
    RotaryWing,
    FixedWing,
    TransitionToFw,
    TransitionToMc,
}

impl FlightMode {
    pub fn vtol_mode(self) -> VtolMode {
        match self {
            FlightMode::Mc => VtolMode::RotaryWing,
            FlightMode::Fw => VtolMode::FixedWing,
            FlightMode::TransitionToFw => VtolMode::TransitionToFw,
            FlightMode::TransitionToMc => VtolMode::TransitionToMc,
        }
    }

    pub fn is_transition(self) -> bool {
        matches!(self, FlightMode::TransitionToFw | FlightMode::TransitionToMc)
    }

    /// True once the wing carries (or is about to carry) the vehicle.
    pub fn is_fixed_wing_like(self) -> bool {
        matches!(self, FlightMode::Fw | FlightMode::TransitionToMc)
    }

    /// Whether the scheduler may move from `self` to `next` in a single cycle.
    ///
    /// The failsafe overlay may force `Mc` from any mode; callers that check
    /// a trace should allow that separately.
    pub fn can_step_to(self, next: FlightMode) -> bool {
        use FlightMode::*;
        matches!(
            (self, next),
            (Mc, Mc)
                | (Fw, Fw)
                | (TransitionToFw, TransitionToFw)
                | (TransitionToMc, TransitionToMc)
                | (Mc, TransitionToFw)
                | (TransitionToMc, TransitionToFw)
                | (TransitionToFw, Fw)
                | (TransitionToFw, Mc)
                | (Fw, TransitionToMc)
                | (TransitionToMc, Mc)
        )
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightMode::Mc => "MC",
            FlightMode::Fw => "FW",
            FlightMode::TransitionToFw => "TRANS_TO_FW",
            FlightMode::TransitionToMc => "TRANS_TO_MC",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vtol_mode_mapping() {
        assert_eq!(FlightMode::Mc.vtol_mode(), VtolMode::RotaryWing);
        assert_eq!(FlightMode::Fw.vtol_mode(), VtolMode::FixedWing);
        assert_eq!(FlightMode::TransitionToFw.vtol_mode(), VtolMode::TransitionToFw);
        assert_eq!(FlightMode::TransitionToMc.vtol_mode(), VtolMode::TransitionToMc);
    }

    #[test]
    fn no_direct_jump_between_hover_and_cruise() {
        assert!(!FlightMode::Mc.can_step_to(FlightMode::Fw));
        assert!(!FlightMode::Fw.can_step_to(FlightMode::Mc));
        assert!(!FlightMode::Fw.can_step_to(FlightMode::TransitionToFw));
        assert!(!FlightMode::Mc.can_step_to(FlightMode::TransitionToMc));
    }

    #[test]
    fn abort_edge_is_legal() {
        assert!(FlightMode::TransitionToFw.can_step_to(FlightMode::Mc));
    }

    #[test]
    fn display_names() {
        assert_eq!(FlightMode::TransitionToFw.to_string(), "TRANS_TO_FW");
    }
}
