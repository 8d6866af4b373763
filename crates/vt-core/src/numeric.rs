use crate::VtError;

/// Floating point type used throughout the controller
pub type Real = f64;

/// Values below this are treated as "not configured" for durations and timeouts.
pub const EPSILON: Real = f32::EPSILON as Real;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VtError::NonFinite { what, value: v })
    }
}

/// Clamp to `[lo, hi]`, mapping NaN to `lo`.
///
/// `f64::clamp` propagates NaN, which is never an acceptable actuator weight.
#[inline]
pub fn constrain(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}
