//! vt-core: shared foundation for the VTOL transition controller.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - time (monotonic microsecond timestamps)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{VtError, VtResult};
pub use numeric::*;
pub use time::Timestamp;
pub use units::*;
