//! Damping regime classification.

use std::fmt;

use osc_core::numeric::{Real, Tolerances, nearly_zero};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::params::PhysicalParameters;

/// Relative width of the band around `d = 0` treated as critical damping,
/// measured against `max(c², |4mk|)`.
pub const DEFAULT_CRITICAL_REL_TOL: Real = 1e-9;

/// Damping regime, set by the sign of the discriminant `c² − 4mk`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DampingCase {
    /// Two distinct real roots.
    Overdamped,
    /// One repeated real root.
    Critical,
    /// Complex-conjugate roots: oscillatory decay.
    Underdamped,
}

impl DampingCase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdamped => "Overdamped",
            Self::Critical => "Critically damped",
            Self::Underdamped => "Underdamped",
        }
    }

    /// General form of `x(t)` for this regime, before coefficients are known.
    pub fn general_form(&self) -> &'static str {
        match self {
            Self::Overdamped => "x(t) = A·e^(λ1·t) + B·e^(λ2·t)",
            Self::Critical => "x(t) = (A + B·t)·e^(λ·t)",
            Self::Underdamped => "x(t) = e^(α·t)·(A·cos(ω·t) + B·sin(ω·t))",
        }
    }
}

impl fmt::Display for DampingCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Purely relative critical band. With no absolute floor, scaling `m`, `c`
/// and `k` by a common factor never changes the classification.
pub fn critical_band(rel: Real) -> Tolerances {
    Tolerances { abs: 0.0, rel }
}

/// `d = c² − 4mk`.
pub fn discriminant(params: &PhysicalParameters) -> Real {
    let c = params.damping();
    c * c - 4.0 * params.mass() * params.stiffness()
}

/// Classify with a tolerance band around `d = 0`.
///
/// `|d| ≤ max(band.abs, band.rel · max(c², |4mk|))` is critical; outside the
/// band the sign of `d` decides. When `c = 0` and `mk = 0` the scale is zero
/// and only `d = 0` (a free mass) lands in the band.
pub fn classify(params: &PhysicalParameters, band: Tolerances) -> DampingCase {
    let c = params.damping();
    let d = discriminant(params);
    let scale = (c * c).max((4.0 * params.mass() * params.stiffness()).abs());

    let case = if nearly_zero(d, scale, band) {
        if d != 0.0 {
            warn!(d, scale, "discriminant inside critical band, treating as critical");
        }
        DampingCase::Critical
    } else if d > 0.0 {
        DampingCase::Overdamped
    } else {
        DampingCase::Underdamped
    };

    debug!(d, ?case, "classified damping regime");
    case
}

/// Strict sign test on `d` with no tolerance band.
pub fn classify_exact(params: &PhysicalParameters) -> DampingCase {
    classify(params, Tolerances { abs: 0.0, rel: 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(m: Real, c: Real, k: Real) -> PhysicalParameters {
        PhysicalParameters::new(m, c, k, 1.0, 0.0).unwrap()
    }

    fn default_band() -> Tolerances {
        critical_band(DEFAULT_CRITICAL_REL_TOL)
    }

    #[test]
    fn reference_scenarios() {
        let band = default_band();
        assert_eq!(classify(&params(1.0, 10.0, 100.0), band), DampingCase::Underdamped);
        assert_eq!(classify(&params(1.0, 20.0, 100.0), band), DampingCase::Critical);
        assert_eq!(classify(&params(1.0, 30.0, 100.0), band), DampingCase::Overdamped);
    }

    #[test]
    fn discriminant_values() {
        assert_eq!(discriminant(&params(1.0, 10.0, 100.0)), -300.0);
        assert_eq!(discriminant(&params(1.0, 20.0, 100.0)), 0.0);
        assert_eq!(discriminant(&params(1.0, 30.0, 100.0)), 500.0);
    }

    #[test]
    fn near_critical_snaps_to_critical_inside_band() {
        // c = 2·sqrt(mk) with a rounding-sized perturbation
        let c = 2.0 * (3.0_f64 * 7.0).sqrt() * (1.0 + 1e-13);
        let p = params(3.0, c, 7.0);
        assert_ne!(discriminant(&p), 0.0);
        assert_eq!(classify(&p, default_band()), DampingCase::Critical);
    }

    #[test]
    fn exact_classification_has_no_band() {
        let c = 20.0 + 1e-9;
        let p = params(1.0, c, 100.0);
        assert_eq!(classify_exact(&p), DampingCase::Overdamped);
        assert_eq!(classify(&p, default_band()), DampingCase::Critical);
    }

    #[test]
    fn undamped_and_free_mass() {
        let band = default_band();
        // c = 0, k > 0: pure oscillation
        assert_eq!(classify(&params(1.0, 0.0, 4.0), band), DampingCase::Underdamped);
        // c = 0, k = 0: free mass, d = 0
        assert_eq!(classify(&params(1.0, 0.0, 0.0), band), DampingCase::Critical);
        // k = 0, c > 0: pure drag
        assert_eq!(classify(&params(1.0, 2.0, 0.0), band), DampingCase::Overdamped);
    }

    #[test]
    fn small_constants_keep_their_regime() {
        // c²/4mk = 0.025: strongly underdamped, d ≈ -3.9e-13
        let p = params(1e-7, 1e-7, 1e-6);
        assert!(discriminant(&p).abs() < 1e-12);
        assert_eq!(classify(&p, default_band()), DampingCase::Underdamped);
        assert_eq!(
            classify(&params(1.0, 1.0, 10.0), default_band()),
            DampingCase::Underdamped
        );

        let p = params(1e-8, 3e-8, 1e-8);
        assert_eq!(classify(&p, default_band()), DampingCase::Overdamped);
    }

    #[test]
    fn labels() {
        assert_eq!(DampingCase::Critical.to_string(), "Critically damped");
        assert_eq!(DampingCase::Overdamped.label(), "Overdamped");
        assert!(DampingCase::Underdamped.general_form().contains("cos"));
    }
}
