//! Error types for controller configuration.
//!
//! The per-cycle path is total and never returns these; they only surface when
//! parameters or limiter rates are set up.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring the transition controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A transition parameter is outside its accepted range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl From<vt_core::VtError> for ControlError {
    fn from(e: vt_core::VtError) -> Self {
        match e {
            vt_core::VtError::NonFinite { what, value } => ControlError::InvalidParameter {
                name: what,
                value,
                reason: "must be finite",
            },
            vt_core::VtError::InvalidArg { what } | vt_core::VtError::Invariant { what } => {
                ControlError::InvalidArg { what }
            }
        }
    }
}
