//! Closed-form solutions fitted to the initial conditions.
//!
//! Each damping regime has its own solution type and constructor, so the
//! repeated-root case never goes through the distinct-root fit (which
//! divides by `λ1 − λ2`).

use std::fmt;

use osc_core::numeric::{Real, Tolerances};
use serde::Serialize;
use tracing::debug;

use crate::classify::{DampingCase, classify, discriminant};
use crate::error::{ModelError, ModelResult};
use crate::params::PhysicalParameters;

/// `x(t) = A·e^(λ1·t) + B·e^(λ2·t)` with `λ1 > λ2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverdampedSolution {
    pub lambda1: Real,
    pub lambda2: Real,
    pub a: Real,
    pub b: Real,
}

impl OverdampedSolution {
    /// Roots `(−c ± sqrt(d)) / 2m`, fitted to `x0`, `v0`.
    pub fn fit(params: &PhysicalParameters) -> ModelResult<Self> {
        let m = params.mass();
        let c = params.damping();
        let sqrt_d = discriminant(params).max(0.0).sqrt();
        let lambda1 = (-c + sqrt_d) / (2.0 * m);
        let lambda2 = (-c - sqrt_d) / (2.0 * m);
        Self::from_roots(lambda1, lambda2, params.x0(), params.v0())
    }

    pub fn from_roots(lambda1: Real, lambda2: Real, x0: Real, v0: Real) -> ModelResult<Self> {
        if lambda1 == lambda2 {
            return Err(ModelError::Degenerate {
                what: "overdamped roots coincide",
            });
        }
        let a = (v0 - lambda2 * x0) / (lambda1 - lambda2);
        let b = x0 - a;
        Ok(Self {
            lambda1,
            lambda2,
            a,
            b,
        })
    }

    pub fn displacement(&self, t: Real) -> Real {
        self.a * (self.lambda1 * t).exp() + self.b * (self.lambda2 * t).exp()
    }

    pub fn velocity(&self, t: Real) -> Real {
        self.a * self.lambda1 * (self.lambda1 * t).exp()
            + self.b * self.lambda2 * (self.lambda2 * t).exp()
    }
}

/// `x(t) = (A + B·t)·e^(λ·t)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CriticalSolution {
    pub lambda: Real,
    pub a: Real,
    pub b: Real,
}

impl CriticalSolution {
    /// Repeated root `λ = −c / 2m`; `A = x0`, `B = v0 − λ·x0`.
    pub fn fit(params: &PhysicalParameters) -> Self {
        let lambda = -params.damping() / (2.0 * params.mass());
        Self::from_root(lambda, params.x0(), params.v0())
    }

    pub fn from_root(lambda: Real, x0: Real, v0: Real) -> Self {
        Self {
            lambda,
            a: x0,
            b: v0 - lambda * x0,
        }
    }

    pub fn displacement(&self, t: Real) -> Real {
        (self.a + self.b * t) * (self.lambda * t).exp()
    }

    pub fn velocity(&self, t: Real) -> Real {
        (self.b + self.lambda * (self.a + self.b * t)) * (self.lambda * t).exp()
    }
}

/// `x(t) = e^(α·t)·(A·cos(ω·t) + B·sin(ω·t))` with `ω > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UnderdampedSolution {
    pub alpha: Real,
    pub omega: Real,
    pub a: Real,
    pub b: Real,
}

impl UnderdampedSolution {
    /// `α = −c / 2m`, `ω = sqrt(4mk − c²) / 2m`; `A = x0`, `B = (v0 − α·x0) / ω`.
    pub fn fit(params: &PhysicalParameters) -> ModelResult<Self> {
        let m = params.mass();
        let alpha = -params.damping() / (2.0 * m);
        let omega = (-discriminant(params)).max(0.0).sqrt() / (2.0 * m);
        Self::from_roots(alpha, omega, params.x0(), params.v0())
    }

    pub fn from_roots(alpha: Real, omega: Real, x0: Real, v0: Real) -> ModelResult<Self> {
        if !(omega > 0.0) {
            return Err(ModelError::Degenerate {
                what: "underdamped angular frequency must be positive",
            });
        }
        Ok(Self {
            alpha,
            omega,
            a: x0,
            b: (v0 - alpha * x0) / omega,
        })
    }

    pub fn displacement(&self, t: Real) -> Real {
        let (sin, cos) = (self.omega * t).sin_cos();
        (self.alpha * t).exp() * (self.a * cos + self.b * sin)
    }

    pub fn velocity(&self, t: Real) -> Real {
        let (sin, cos) = (self.omega * t).sin_cos();
        (self.alpha * t).exp()
            * ((self.alpha * self.a + self.omega * self.b) * cos
                + (self.alpha * self.b - self.omega * self.a) * sin)
    }

    /// Damped natural frequency in Hz.
    pub fn frequency(&self) -> Real {
        self.omega / (2.0 * std::f64::consts::PI)
    }
}

/// Closed-form solution for one damping regime.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "case", rename_all = "snake_case")]
pub enum Solution {
    Overdamped(OverdampedSolution),
    Critical(CriticalSolution),
    Underdamped(UnderdampedSolution),
}

impl Solution {
    pub fn case(&self) -> DampingCase {
        match self {
            Self::Overdamped(_) => DampingCase::Overdamped,
            Self::Critical(_) => DampingCase::Critical,
            Self::Underdamped(_) => DampingCase::Underdamped,
        }
    }

    /// `x(t)`.
    pub fn displacement(&self, t: Real) -> Real {
        match self {
            Self::Overdamped(s) => s.displacement(t),
            Self::Critical(s) => s.displacement(t),
            Self::Underdamped(s) => s.displacement(t),
        }
    }

    /// Analytic `x'(t)`.
    pub fn velocity(&self, t: Real) -> Real {
        match self {
            Self::Overdamped(s) => s.velocity(t),
            Self::Critical(s) => s.velocity(t),
            Self::Underdamped(s) => s.velocity(t),
        }
    }

    /// Magnitudes of the terms summed in `x(0)` and `x'(0)`; the rounding
    /// error of either evaluation is relative to these, not to `x0`/`v0`.
    fn initial_term_scales(&self) -> (Real, Real) {
        match self {
            Self::Overdamped(s) => (
                s.a.abs() + s.b.abs(),
                (s.a * s.lambda1).abs() + (s.b * s.lambda2).abs(),
            ),
            Self::Critical(s) => (s.a.abs(), s.b.abs() + (s.lambda * s.a).abs()),
            Self::Underdamped(s) => (s.a.abs(), (s.alpha * s.a).abs() + (s.omega * s.b).abs()),
        }
    }

    /// Damped natural frequency in Hz, only for the underdamped regime.
    pub fn frequency(&self) -> Option<Real> {
        match self {
            Self::Underdamped(s) => Some(s.frequency()),
            _ => None,
        }
    }

    /// Check `x(0) = x0` and `x'(0) = v0` within `tol`.
    pub fn verify_initial_conditions(
        &self,
        params: &PhysicalParameters,
        tol: Tolerances,
    ) -> ModelResult<()> {
        let x0 = params.x0();
        let v0 = params.v0();
        let (x_terms, v_terms) = self.initial_term_scales();

        let x_at_0 = self.displacement(0.0);
        if (x_at_0 - x0).abs() > tol.abs + tol.rel * x0.abs().max(x_terms) {
            return Err(ModelError::InitialConditionMismatch {
                what: "x(0)",
                expected: x0,
                actual: x_at_0,
            });
        }

        let v_at_0 = self.velocity(0.0);
        if (v_at_0 - v0).abs() > tol.abs + tol.rel * v0.abs().max(v_terms) {
            return Err(ModelError::InitialConditionMismatch {
                what: "x'(0)",
                expected: v0,
                actual: v_at_0,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdamped(s) => write!(
                f,
                "x(t) = {:.2}·e^({:.2}t) {}·e^({:.2}t)",
                s.a,
                s.lambda1,
                signed(s.b),
                s.lambda2
            ),
            Self::Critical(s) => write!(
                f,
                "x(t) = ({:.2} {}t)·e^({:.2}t)",
                s.a,
                signed(s.b),
                s.lambda
            ),
            Self::Underdamped(s) => write!(
                f,
                "x(t) = e^({:.2}t)·({:.2}·cos({:.2}t) {}·sin({:.2}t))",
                s.alpha,
                s.a,
                s.omega,
                signed(s.b),
                s.omega
            ),
        }
    }
}

fn signed(v: Real) -> String {
    if v.is_sign_negative() && v != 0.0 {
        format!("- {:.2}", -v)
    } else {
        format!("+ {:.2}", v)
    }
}

/// Fit the solution for an already classified regime.
pub fn build_solution(params: &PhysicalParameters, case: DampingCase) -> ModelResult<Solution> {
    let solution = match case {
        DampingCase::Overdamped => Solution::Overdamped(OverdampedSolution::fit(params)?),
        DampingCase::Critical => Solution::Critical(CriticalSolution::fit(params)),
        DampingCase::Underdamped => Solution::Underdamped(UnderdampedSolution::fit(params)?),
    };
    debug!(?solution, "fitted closed-form solution");
    Ok(solution)
}

/// Classify, then fit.
pub fn solve(params: &PhysicalParameters, band: Tolerances) -> ModelResult<Solution> {
    build_solution(params, classify(params, band))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::classify::{DEFAULT_CRITICAL_REL_TOL, critical_band};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fitted_solution_reproduces_initial_conditions(
            m in 0.05_f64..20.0,
            c in 0.0_f64..60.0,
            k in 0.0_f64..500.0,
            x0 in -5.0_f64..5.0,
            v0 in -50.0_f64..50.0,
        ) {
            let p = PhysicalParameters::new(m, c, k, x0, v0).unwrap();
            let sol = solve(&p, critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
            let tol = Tolerances { abs: 1e-12, rel: 1e-9 };
            prop_assert!(sol.verify_initial_conditions(&p, tol).is_ok(), "{:?}", sol);
        }
    }
}
