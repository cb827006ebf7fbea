//! Summary statistics over a sampled trajectory.

use osc_core::numeric::Real;
use osc_core::units::{Energy, Frequency, Time, hz, joule, s};
use serde::Serialize;
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::params::PhysicalParameters;
use crate::solution::Solution;
use crate::trajectory::Trajectory;

/// Energy dissipated over the run.
///
/// Depends on `c` through the whole trajectory and is not computed; the
/// marker keeps the metric visible to callers instead of reporting a
/// made-up number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLoss {
    #[default]
    NotComputed,
}

impl EnergyLoss {
    pub fn note(&self) -> &'static str {
        match self {
            Self::NotComputed => "depends on c, not computed",
        }
    }
}

/// Diagnostics record for one trajectory.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostics {
    /// `max |x_i|` (m)
    pub max_abs_displacement: Real,
    /// `mean |x_i|` (m)
    pub mean_abs_displacement: Real,
    /// `x` at the last sample (m)
    pub final_displacement: Real,
    /// Raw sign changes between consecutive samples.
    pub sign_changes: usize,
    /// Sign changes integer-divided by two: an approximate count of full
    /// oscillations. Depends on sample density; coarse sampling misses
    /// crossings and under-counts.
    pub zero_crossing_count: usize,
    /// `½·k·x0² + ½·m·v0²` (J)
    pub initial_energy: Real,
    /// `ω / 2π` (Hz), underdamped only.
    pub frequency: Option<Real>,
    /// `1 / frequency` (s), underdamped only.
    pub period: Option<Real>,
    pub energy_loss: EnergyLoss,
}

impl Diagnostics {
    pub fn initial_energy_quantity(&self) -> Energy {
        joule(self.initial_energy)
    }

    pub fn frequency_quantity(&self) -> Option<Frequency> {
        self.frequency.map(hz)
    }

    pub fn period_quantity(&self) -> Option<Time> {
        self.period.map(s)
    }
}

/// Count sign changes between consecutive samples.
///
/// Samples exactly at zero carry the sign of the last non-zero sample, so
/// touching zero and returning is not a crossing and a start at `x = 0`
/// does not count.
pub fn count_sign_changes(trajectory: &Trajectory) -> usize {
    let mut last_sign: Option<bool> = None;
    let mut changes = 0;
    for x in trajectory.displacements() {
        if x == 0.0 {
            continue;
        }
        let positive = x > 0.0;
        if last_sign.is_some_and(|prev| prev != positive) {
            changes += 1;
        }
        last_sign = Some(positive);
    }
    changes
}

pub fn compute_diagnostics(
    params: &PhysicalParameters,
    solution: &Solution,
    trajectory: &Trajectory,
) -> ModelResult<Diagnostics> {
    if trajectory.is_empty() {
        return Err(ModelError::EmptyTrajectory);
    }
    let final_displacement = trajectory.samples()[trajectory.len() - 1].x;

    let (max_abs, sum_abs) = trajectory
        .displacements()
        .map(Real::abs)
        .fold((0.0, 0.0), |(max, sum): (Real, Real), a| (max.max(a), sum + a));
    let mean_abs = sum_abs / trajectory.len() as Real;

    let sign_changes = count_sign_changes(trajectory);

    let m = params.mass();
    let k = params.stiffness();
    let x0 = params.x0();
    let v0 = params.v0();
    let initial_energy = 0.5 * k * x0 * x0 + 0.5 * m * v0 * v0;

    let frequency = solution.frequency();
    let period = frequency.map(|f| 1.0 / f);

    let diagnostics = Diagnostics {
        max_abs_displacement: max_abs,
        mean_abs_displacement: mean_abs,
        final_displacement,
        sign_changes,
        zero_crossing_count: sign_changes / 2,
        initial_energy,
        frequency,
        period,
        energy_loss: EnergyLoss::NotComputed,
    };
    debug!(?diagnostics, "computed diagnostics");
    Ok(diagnostics)
}
