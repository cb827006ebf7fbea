//! Parametric sweeps: vary one oscillator parameter over a range and run
//! the full analysis at each point.

use std::fmt;
use std::str::FromStr;

use osc_core::numeric::{Real, linspace};
use osc_model::{DampingCase, Diagnostics};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};
use crate::pipeline::analyze;
use crate::scenario::ParameterDef;

/// Parameter being swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    Mass,
    Damping,
    Stiffness,
    X0,
    V0,
}

impl SweepParameter {
    /// Copy of `base` with this parameter set to `value`.
    pub fn apply(&self, base: &ParameterDef, value: Real) -> ParameterDef {
        let mut p = *base;
        match self {
            Self::Mass => p.mass = value,
            Self::Damping => p.damping = value,
            Self::Stiffness => p.stiffness = value,
            Self::X0 => p.x0 = value,
            Self::V0 => p.v0 = value,
        }
        p
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Damping => "N·s/m",
            Self::Stiffness => "N/m",
            Self::X0 => "m",
            Self::V0 => "m/s",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mass => "mass",
            Self::Damping => "damping",
            Self::Stiffness => "stiffness",
            Self::X0 => "x0",
            Self::V0 => "v0",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SweepParameter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "mass" => Ok(Self::Mass),
            "c" | "damping" => Ok(Self::Damping),
            "k" | "stiffness" => Ok(Self::Stiffness),
            "x0" => Ok(Self::X0),
            "v0" => Ok(Self::V0),
            other => Err(AppError::InvalidInput(format!(
                "Unknown sweep parameter: {}",
                other
            ))),
        }
    }
}

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSpacing {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points (both bounds must be positive)
    Logarithmic,
}

/// Definition of a single parameter sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub parameter: SweepParameter,
    pub start: Real,
    pub end: Real,
    pub points: usize,
    #[serde(default)]
    pub spacing: SweepSpacing,
}

impl SweepDefinition {
    pub fn new(
        parameter: SweepParameter,
        start: Real,
        end: Real,
        points: usize,
        spacing: SweepSpacing,
    ) -> AppResult<Self> {
        if points < 2 {
            return Err(AppError::InvalidInput(
                "Sweep must have at least 2 points".to_string(),
            ));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(AppError::InvalidInput(
                "Sweep bounds must be finite".to_string(),
            ));
        }
        if (start - end).abs() < 1e-12 {
            return Err(AppError::InvalidInput(
                "Start and end values must be different".to_string(),
            ));
        }
        if spacing == SweepSpacing::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(AppError::InvalidInput(
                "Logarithmic sweep bounds must be positive".to_string(),
            ));
        }
        Ok(Self {
            parameter,
            start,
            end,
            points,
            spacing,
        })
    }

    /// Generate all points in the sweep; both endpoints are exact.
    pub fn generate_points(&self) -> Vec<Real> {
        match self.spacing {
            SweepSpacing::Linear => linspace(self.start, self.end, self.points),
            SweepSpacing::Logarithmic => {
                let mut points: Vec<Real> = linspace(self.start.ln(), self.end.ln(), self.points)
                    .into_iter()
                    .map(Real::exp)
                    .collect();
                if let Some(first) = points.first_mut() {
                    *first = self.start;
                }
                if let Some(last) = points.last_mut() {
                    *last = self.end;
                }
                points
            }
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} {} ({} points, {:?})",
            self.parameter,
            self.start,
            self.end,
            self.parameter.unit(),
            self.points,
            self.spacing
        )
    }
}

/// Analysis outcome at one sweep value.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub value: Real,
    #[serde(flatten)]
    pub outcome: SweepOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    Ok {
        case: DampingCase,
        diagnostics: Diagnostics,
    },
    Failed {
        error: String,
    },
}

/// Result of a parameter sweep, in sweep order.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub definition: SweepDefinition,
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn num_successful(&self) -> usize {
        self.points
            .iter()
            .filter(|p| matches!(p.outcome, SweepOutcome::Ok { .. }))
            .count()
    }

    pub fn num_failed(&self) -> usize {
        self.points.len() - self.num_successful()
    }

    /// Values at which the damping regime differs from the previous point.
    pub fn regime_changes(&self) -> Vec<(Real, DampingCase)> {
        let mut out = Vec::new();
        let mut prev: Option<DampingCase> = None;
        for p in &self.points {
            if let SweepOutcome::Ok { case, .. } = &p.outcome {
                if prev.is_some_and(|c| c != *case) {
                    out.push((p.value, *case));
                }
                prev = Some(*case);
            }
        }
        out
    }
}

/// Run the analysis at every sweep value, in parallel.
///
/// Points whose parameters are rejected (e.g. a mass sweep crossing zero)
/// are reported as failed rather than aborting the sweep.
pub fn run_sweep(
    base: &ParameterDef,
    config: &AnalysisConfig,
    sweep: &SweepDefinition,
) -> AppResult<SweepResult> {
    config.validate()?;

    let points: Vec<SweepPoint> = sweep
        .generate_points()
        .into_par_iter()
        .map(|value| {
            let params = sweep.parameter.apply(base, value);
            let outcome = match analyze(&params, config) {
                Ok(a) => SweepOutcome::Ok {
                    case: a.case,
                    diagnostics: a.diagnostics,
                },
                Err(e) => {
                    warn!(parameter = %sweep.parameter, value, error = %e, "sweep point failed");
                    SweepOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            SweepPoint { value, outcome }
        })
        .collect();

    Ok(SweepResult {
        definition: *sweep,
        points,
    })
}
