//! Physical parameters of the oscillator.

use osc_core::numeric::{Real, ensure_finite, ensure_positive};
use osc_core::units::{Length, Mass, MassRate, Velocity};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// What to do with a negative damping coefficient or spring constant.
///
/// Neither breaks the closed forms (a negative `c` gives a growing
/// envelope, a negative `k` a repelling spring), so accepting them is a
/// choice rather than a numeric necessity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Reject `c < 0` and `k < 0`.
    #[default]
    Reject,
    /// Accept any finite `c` and `k`.
    Allow,
}

/// Mass, damping, stiffness and initial state of a single-DOF oscillator.
///
/// Immutable once constructed; every instance has a finite, strictly
/// positive mass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhysicalParameters {
    mass: Real,
    damping: Real,
    stiffness: Real,
    x0: Real,
    v0: Real,
}

impl PhysicalParameters {
    /// Build parameters under the default [`SignPolicy::Reject`].
    pub fn new(mass: Real, damping: Real, stiffness: Real, x0: Real, v0: Real) -> ModelResult<Self> {
        Self::with_policy(mass, damping, stiffness, x0, v0, SignPolicy::default())
    }

    pub fn with_policy(
        mass: Real,
        damping: Real,
        stiffness: Real,
        x0: Real,
        v0: Real,
        policy: SignPolicy,
    ) -> ModelResult<Self> {
        ensure_finite(mass, "mass")?;
        ensure_positive(mass, "mass").map_err(|_| ModelError::InvalidParameter {
            what: "mass",
            reason: "must be strictly positive",
        })?;
        ensure_finite(damping, "damping")?;
        ensure_finite(stiffness, "stiffness")?;
        ensure_finite(x0, "initial displacement")?;
        ensure_finite(v0, "initial velocity")?;

        if policy == SignPolicy::Reject {
            if damping < 0.0 {
                return Err(ModelError::InvalidParameter {
                    what: "damping",
                    reason: "must be non-negative",
                });
            }
            if stiffness < 0.0 {
                return Err(ModelError::InvalidParameter {
                    what: "stiffness",
                    reason: "must be non-negative",
                });
            }
        }

        Ok(Self {
            mass,
            damping,
            stiffness,
            x0,
            v0,
        })
    }

    /// Build from typed quantities. Stiffness is taken in N/m.
    pub fn from_quantities(
        mass: Mass,
        damping: MassRate,
        stiffness_n_per_m: Real,
        x0: Length,
        v0: Velocity,
        policy: SignPolicy,
    ) -> ModelResult<Self> {
        Self::with_policy(
            mass.value,
            damping.value,
            stiffness_n_per_m,
            x0.value,
            v0.value,
            policy,
        )
    }

    /// Mass `m` (kg).
    pub fn mass(&self) -> Real {
        self.mass
    }

    /// Damping coefficient `c` (N·s/m).
    pub fn damping(&self) -> Real {
        self.damping
    }

    /// Spring constant `k` (N/m).
    pub fn stiffness(&self) -> Real {
        self.stiffness
    }

    /// Initial displacement `x0` (m).
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Initial velocity `v0` (m/s).
    pub fn v0(&self) -> Real {
        self.v0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_core::CoreError;
    use osc_core::units::{kg, kgps, m, mps};

    #[test]
    fn accepts_reference_parameters() {
        let p = PhysicalParameters::new(1.0, 10.0, 100.0, 1.0, 0.0).unwrap();
        assert_eq!(p.mass(), 1.0);
        assert_eq!(p.damping(), 10.0);
        assert_eq!(p.stiffness(), 100.0);
        assert_eq!(p.x0(), 1.0);
        assert_eq!(p.v0(), 0.0);
    }

    #[test]
    fn rejects_non_positive_mass() {
        for mass in [0.0, -1.0] {
            let err = PhysicalParameters::new(mass, 1.0, 1.0, 0.0, 0.0).unwrap_err();
            assert_eq!(
                err,
                ModelError::InvalidParameter {
                    what: "mass",
                    reason: "must be strictly positive"
                }
            );
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = PhysicalParameters::new(1.0, Real::NAN, 1.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Core(CoreError::NonFinite {
                what: "damping",
                ..
            })
        ));
        assert!(PhysicalParameters::new(Real::INFINITY, 1.0, 1.0, 0.0, 0.0).is_err());
        assert!(PhysicalParameters::new(1.0, 1.0, 1.0, 0.0, Real::NEG_INFINITY).is_err());
    }

    #[test]
    fn sign_policy_governs_negative_damping_and_stiffness() {
        assert!(PhysicalParameters::new(1.0, -1.0, 1.0, 0.0, 0.0).is_err());
        assert!(PhysicalParameters::new(1.0, 1.0, -1.0, 0.0, 0.0).is_err());

        let p = PhysicalParameters::with_policy(1.0, -1.0, -4.0, 1.0, 0.0, SignPolicy::Allow)
            .unwrap();
        assert_eq!(p.damping(), -1.0);
        assert_eq!(p.stiffness(), -4.0);
    }

    #[test]
    fn from_quantities_matches_plain_constructor() {
        let typed = PhysicalParameters::from_quantities(
            kg(2.0),
            kgps(3.0),
            50.0,
            m(0.25),
            mps(-1.0),
            SignPolicy::Reject,
        )
        .unwrap();
        let plain = PhysicalParameters::new(2.0, 3.0, 50.0, 0.25, -1.0).unwrap();
        assert_eq!(typed, plain);
    }
}
