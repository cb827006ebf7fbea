// osc-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, Frequency as UomFrequency, Length as UomLength, Mass as UomMass,
    MassRate as UomMassRate, Time as UomTime, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Frequency = UomFrequency;
pub type Length = UomLength;
pub type Mass = UomMass;
/// Damping coefficient: kg/s is dimensionally N·s/m.
pub type MassRate = UomMassRate;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn joule(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn hz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_store_si_values() {
        assert_eq!(kg(2.0).value, 2.0);
        assert_eq!(kgps(10.0).value, 10.0);
        assert_eq!(m(1.5).value, 1.5);
        assert_eq!(mps(-0.5).value, -0.5);
        assert_eq!(s(10.0).value, 10.0);
        assert_eq!(joule(50.0).value, 50.0);
        assert_eq!(hz(1.25).value, 1.25);
    }
}
