//! Slew-rate limited setpoints for flaps and spoilers.
//!
//! The transition logic only needs "move toward this target, no faster than
//! the configured rate". [`SetpointSlew`] is that contract; [`SlewRateLimiter`]
//! is the stock implementation.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// A setpoint that follows a target at a bounded rate.
pub trait SetpointSlew {
    /// Step toward `target` over `dt` seconds and return the new value.
    fn update(&mut self, target: f64, dt: f64) -> f64;

    /// Current (rate-limited) value.
    fn state(&self) -> f64;
}

/// Linear rate limiter.
///
/// Each update moves the state toward the target by at most `rate * dt`.
/// Non-positive or non-finite time steps hold the current value.
///
/// # Example
///
/// ```
/// use vt_controls::{SetpointSlew, SlewRateLimiter};
///
/// let mut flaps = SlewRateLimiter::new(0.5).unwrap();
/// for _ in 0..10 {
///     flaps.update(1.0, 0.1);
/// }
/// assert!((flaps.state() - 0.5).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlewRateLimiter {
    /// Maximum rate of change (1/second), must be positive
    pub rate: f64,
    value: f64,
}

impl SlewRateLimiter {
    /// Create a limiter starting at zero.
    ///
    /// # Errors
    ///
    /// Returns error if `rate` is not positive and finite.
    pub fn new(rate: f64) -> ControlResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "slew rate must be positive",
            });
        }
        Ok(Self { rate, value: 0.0 })
    }

    /// Force the state, bypassing the rate limit.
    pub fn set_state(&mut self, value: f64) {
        self.value = value;
    }
}

impl SetpointSlew for SlewRateLimiter {
    fn update(&mut self, target: f64, dt: f64) -> f64 {
        if !(dt.is_finite() && dt > 0.0) || !target.is_finite() {
            return self.value;
        }
        let max_step = self.rate * dt;
        self.value += (target - self.value).clamp(-max_step, max_step);
        self.value
    }

    fn state(&self) -> f64 {
        self.value
    }
}

/// Slew rates for the two surface channels driven by the transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Flaps slew rate (full deflection per second).
    pub flaps_rate_per_s: f64,
    /// Spoiler slew rate (full deflection per second).
    pub spoilers_rate_per_s: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            flaps_rate_per_s: 0.5,
            spoilers_rate_per_s: 0.5,
        }
    }
}

/// Requested surface deflections, before slew limiting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceTargets {
    pub flaps: f64,
    pub spoilers: f64,
}

impl SurfaceTargets {
    pub const RETRACTED: Self = Self {
        flaps: 0.0,
        spoilers: 0.0,
    };
}

/// Flaps and spoilers setpoints, each behind its own limiter.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSetpoints<S = SlewRateLimiter> {
    pub flaps: S,
    pub spoilers: S,
}

impl SurfaceSetpoints<SlewRateLimiter> {
    pub fn from_config(config: &SurfaceConfig) -> ControlResult<Self> {
        Ok(Self {
            flaps: SlewRateLimiter::new(config.flaps_rate_per_s)?,
            spoilers: SlewRateLimiter::new(config.spoilers_rate_per_s)?,
        })
    }
}

impl<S: SetpointSlew> SurfaceSetpoints<S> {
    pub fn update(&mut self, targets: SurfaceTargets, dt: f64) {
        self.flaps.update(targets.flaps, dt);
        self.spoilers.update(targets.spoilers, dt);
    }

    /// Current slew-limited deflections.
    pub fn state(&self) -> SurfaceTargets {
        SurfaceTargets {
            flaps: self.flaps.state(),
            spoilers: self.spoilers.state(),
        }
    }
}
