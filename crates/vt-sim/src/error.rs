//! Error types for simulation runs.

use thiserror::Error;

/// Errors encountered while setting up or running a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<vt_controls::ControlError> for SimError {
    fn from(e: vt_controls::ControlError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<vt_core::VtError> for SimError {
    fn from(e: vt_core::VtError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
