//! Monotonic timestamps.
//!
//! The host runtime stamps every cycle with a monotonic clock reading in
//! microseconds. Differences saturate at zero so elapsed time can never be
//! negative, even if a caller hands in an older reading.

use core::fmt;

use crate::units::{Time, us};

/// Microseconds since an arbitrary monotonic epoch (boot, sim start).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Build from seconds. Negative and non-finite inputs map to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self((secs * 1e6).round() as u64)
        } else {
            Self::ZERO
        }
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }

    /// Duration since `earlier`, zero if `earlier` is in the future.
    pub fn duration_since(self, earlier: Timestamp) -> Time {
        us(self.0.saturating_sub(earlier.0) as f64)
    }

    /// Seconds since `earlier`, never negative.
    pub fn secs_since(self, earlier: Timestamp) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / 1e6
    }

    pub fn add_secs(self, secs: f64) -> Self {
        Self(self.0.saturating_add(Self::from_secs_f64(secs).0))
    }

    /// True if `self` is strictly less than `window_s` seconds old at `now`.
    pub fn is_fresh(self, now: Timestamp, window_s: f64) -> bool {
        now.0.saturating_sub(self.0) < Self::from_secs_f64(window_s).0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}us)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}
