//! Events handed to the supervisor.

use std::fmt;

/// Why a quadchute (return to rotary-wing flight) is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadchuteReason {
    TransitionTimeout,
}

impl fmt::Display for QuadchuteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadchuteReason::TransitionTimeout => f.write_str("transition timeout"),
        }
    }
}

/// Something the supervisor has to act on. The controller never acts on these itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Quadchute(QuadchuteReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_code_text() {
        assert_eq!(
            QuadchuteReason::TransitionTimeout.to_string(),
            "transition timeout"
        );
    }
}
