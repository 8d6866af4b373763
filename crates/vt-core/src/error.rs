use thiserror::Error;

pub type VtResult<T> = Result<T, VtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
