//! Evenly spaced sampling of a closed-form solution.

use osc_core::numeric::{Real, ensure_finite, ensure_positive, linspace};
use osc_core::units::Time;
use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::solution::Solution;

/// Default number of samples per trajectory.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Default simulated time span (seconds).
pub const DEFAULT_DURATION_S: Real = 10.0;

/// Time span `[0, duration]` with `duration > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeDomain {
    duration: Real,
}

impl TimeDomain {
    pub fn new(duration: Real) -> ModelResult<Self> {
        ensure_finite(duration, "duration")?;
        ensure_positive(duration, "duration").map_err(|_| ModelError::InvalidParameter {
            what: "duration",
            reason: "must be strictly positive",
        })?;
        Ok(Self { duration })
    }

    pub fn from_time(duration: Time) -> ModelResult<Self> {
        Self::new(duration.value)
    }

    pub fn duration(&self) -> Real {
        self.duration
    }
}

impl Default for TimeDomain {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_S,
        }
    }
}

/// One `(t, x)` point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub t: Real,
    pub x: Real,
}

/// Time-ascending sequence of samples.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    /// Wrap existing samples; times must be finite and strictly increasing.
    pub fn from_samples(samples: Vec<Sample>) -> ModelResult<Self> {
        for s in &samples {
            ensure_finite(s.t, "sample time")?;
            ensure_finite(s.x, "sample displacement")?;
        }
        if samples.windows(2).any(|w| w[1].t <= w[0].t) {
            return Err(ModelError::InvalidParameter {
                what: "sample times",
                reason: "must be strictly increasing",
            });
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn displacements(&self) -> impl Iterator<Item = Real> + '_ {
        self.samples.iter().map(|s| s.x)
    }
}

/// Evaluate `solution` at `n` evenly spaced times over `[0, duration]`,
/// both endpoints included.
///
/// Fails with [`CoreError::NonFinite`](osc_core::CoreError::NonFinite) if any
/// displacement overflows, e.g. a growing mode under `SignPolicy::Allow`.
pub fn sample(solution: &Solution, domain: TimeDomain, n: usize) -> ModelResult<Trajectory> {
    if n < 2 {
        return Err(ModelError::InvalidParameter {
            what: "sample count",
            reason: "must be at least 2",
        });
    }

    let samples = linspace(0.0, domain.duration(), n)
        .into_iter()
        .map(|t| -> ModelResult<Sample> {
            let x = ensure_finite(solution.displacement(t), "sample displacement")?;
            Ok(Sample { t, x })
        })
        .collect::<ModelResult<Vec<_>>>()?;

    Ok(Trajectory { samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{DEFAULT_CRITICAL_REL_TOL, critical_band};
    use crate::params::{PhysicalParameters, SignPolicy};
    use crate::solution::solve;
    use osc_core::CoreError;
    use osc_core::units::s;

    fn reference_solution() -> Solution {
        let p = PhysicalParameters::new(1.0, 10.0, 100.0, 1.0, 0.0).unwrap();
        solve(&p, critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap()
    }

    #[test]
    fn length_and_endpoints() {
        let sol = reference_solution();
        let traj = sample(&sol, TimeDomain::default(), DEFAULT_SAMPLE_COUNT).unwrap();
        assert_eq!(traj.len(), DEFAULT_SAMPLE_COUNT);
        let samples = traj.samples();
        assert_eq!(samples[0].t, 0.0);
        assert_eq!(samples[samples.len() - 1].t, DEFAULT_DURATION_S);
        assert_eq!(samples[0].x, 1.0);
    }

    #[test]
    fn samples_are_evenly_spaced() {
        let sol = reference_solution();
        let traj = sample(&sol, TimeDomain::new(2.0).unwrap(), 501).unwrap();
        let dt = 2.0 / 500.0;
        let times: Vec<f64> = traj.samples().iter().map(|s| s.t).collect();
        for w in times.windows(2) {
            assert!(w[1] > w[0]);
            assert!((w[1] - w[0] - dt).abs() < 1e-12);
        }
    }

    #[test]
    fn values_match_closed_form() {
        let sol = reference_solution();
        let traj = sample(&sol, TimeDomain::new(1.0).unwrap(), 11).unwrap();
        for s in traj.samples() {
            assert_eq!(s.x, sol.displacement(s.t));
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let sol = reference_solution();
        let a = sample(&sol, TimeDomain::default(), 700).unwrap();
        let b = sample(&sol, TimeDomain::default(), 700).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_domain_and_count() {
        assert!(TimeDomain::new(0.0).is_err());
        assert!(TimeDomain::new(-1.0).is_err());
        assert!(TimeDomain::new(f64::NAN).is_err());
        assert_eq!(TimeDomain::from_time(s(3.0)).unwrap().duration(), 3.0);

        let sol = reference_solution();
        let err = sample(&sol, TimeDomain::default(), 1).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParameter {
                what: "sample count",
                ..
            }
        ));
    }

    #[test]
    fn overflowing_growth_is_rejected() {
        // c < 0, k = 0: λ = 100, e^(100·10) overflows
        let p = PhysicalParameters::with_policy(1.0, -100.0, 0.0, 1.0, 0.0, SignPolicy::Allow)
            .unwrap();
        let sol = solve(&p, critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
        let err = sample(&sol, TimeDomain::default(), DEFAULT_SAMPLE_COUNT).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Core(CoreError::NonFinite {
                what: "sample displacement",
                ..
            })
        ));

        // Same system over a short span stays finite
        let short = sample(&sol, TimeDomain::new(1.0).unwrap(), 11).unwrap();
        assert!(short.samples().iter().all(|s| s.x.is_finite()));
    }

    #[test]
    fn from_samples_requires_increasing_times() {
        let ok = Trajectory::from_samples(vec![
            Sample { t: 0.0, x: 1.0 },
            Sample { t: 0.5, x: -1.0 },
        ]);
        assert!(ok.is_ok());
        let bad = Trajectory::from_samples(vec![
            Sample { t: 0.5, x: 1.0 },
            Sample { t: 0.5, x: -1.0 },
        ]);
        assert!(bad.is_err());
    }
}
