// vt-core/src/units.rs

use uom::si::f64::{Angle as UomAngle, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Time = UomTime;

#[inline]
pub fn us(v: f64) -> Time {
    use uom::si::time::microsecond;
    Time::new::<microsecond>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn as_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn as_radians(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

pub mod constants {
    /// Standard gravity (m/s^2).
    pub const G0_MPS2: f64 = 9.806_65;
    /// ISA sea-level air density (kg/m^3).
    pub const RHO0_KGPM3: f64 = 1.225;
}
