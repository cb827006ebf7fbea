//! The one-way analysis pipeline:
//! parameters → classification → solution → trajectory → diagnostics.

use osc_core::numeric::{Real, Tolerances};
use osc_model::{
    DampingCase, Diagnostics, PhysicalParameters, Solution, Trajectory, build_solution, classify,
    compute_diagnostics, discriminant, sample,
};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AppResult;
use crate::scenario::{ParameterDef, Scenario};

/// Initial-condition check applied to every fitted solution.
const INITIAL_CONDITION_TOL: Tolerances = Tolerances {
    abs: 1e-12,
    rel: 1e-9,
};

/// Everything the presentation layer consumes for one parameter set.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub parameters: PhysicalParameters,
    pub config: AnalysisConfig,
    pub discriminant: Real,
    pub case: DampingCase,
    pub solution: Solution,
    pub trajectory: Trajectory,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// Formatted closed-form expression with fitted coefficients.
    pub fn expression(&self) -> String {
        self.solution.to_string()
    }
}

/// Run the full pipeline for one parameter set.
pub fn analyze(parameters: &ParameterDef, config: &AnalysisConfig) -> AppResult<Analysis> {
    config.validate()?;
    let params = parameters.to_parameters(config.sign_policy)?;
    let domain = config.time_domain()?;

    let d = discriminant(&params);
    let case = classify(&params, config.critical_band());
    let solution = build_solution(&params, case)?;
    solution.verify_initial_conditions(&params, INITIAL_CONDITION_TOL)?;

    let trajectory = sample(&solution, domain, config.samples)?;
    let diagnostics = compute_diagnostics(&params, &solution, &trajectory)?;

    info!(
        case = case.label(),
        discriminant = d,
        samples = trajectory.len(),
        oscillations = diagnostics.zero_crossing_count,
        "analysis complete"
    );

    Ok(Analysis {
        parameters: params,
        config: *config,
        discriminant: d,
        case,
        solution,
        trajectory,
        diagnostics,
    })
}

/// Run the pipeline with a scenario's own parameters and configuration.
pub fn analyze_scenario(scenario: &Scenario) -> AppResult<Analysis> {
    tracing::debug!(scenario = %scenario.name, "analyzing scenario");
    analyze(&scenario.parameters, &scenario.config)
}
