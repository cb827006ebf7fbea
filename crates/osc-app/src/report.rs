//! Analysis reports, scenario fingerprints and series export.

use std::fmt::Write as _;
use std::path::Path;

use osc_core::numeric::Real;
use osc_model::{DampingCase, Diagnostics, PhysicalParameters, Solution, Trajectory};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};
use crate::pipeline::Analysis;

/// SHA-256 hex digest over the serialized parameters and configuration.
///
/// Identical inputs always give the same fingerprint.
pub fn fingerprint(parameters: &PhysicalParameters, config: &AnalysisConfig) -> String {
    let mut hasher = Sha256::new();

    let params_json = serde_json::to_string(parameters).unwrap_or_default();
    hasher.update(params_json.as_bytes());

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Serializable summary of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub fingerprint: String,
    pub parameters: PhysicalParameters,
    pub config: AnalysisConfig,
    pub case: DampingCase,
    pub case_label: String,
    pub discriminant: Real,
    pub expression: String,
    pub solution: Solution,
    pub diagnostics: Diagnostics,
    pub energy_loss_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Trajectory>,
}

impl AnalysisReport {
    pub fn from_analysis(
        analysis: &Analysis,
        scenario: Option<&str>,
        include_trajectory: bool,
    ) -> Self {
        Self {
            scenario: scenario.map(str::to_string),
            fingerprint: fingerprint(&analysis.parameters, &analysis.config),
            parameters: analysis.parameters,
            config: analysis.config,
            case: analysis.case,
            case_label: analysis.case.label().to_string(),
            discriminant: analysis.discriminant,
            expression: analysis.expression(),
            solution: analysis.solution,
            diagnostics: analysis.diagnostics.clone(),
            energy_loss_note: analysis.diagnostics.energy_loss.note().to_string(),
            trajectory: include_trajectory.then(|| analysis.trajectory.clone()),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary.
    pub fn render_text(&self) -> String {
        let p = &self.parameters;
        let d = &self.diagnostics;
        let mut out = String::new();

        if let Some(name) = &self.scenario {
            let _ = writeln!(out, "Scenario: {}", name);
        }
        let _ = writeln!(
            out,
            "Parameters: m={} kg, c={} N·s/m, k={} N/m, x0={} m, v0={} m/s",
            p.mass(),
            p.damping(),
            p.stiffness(),
            p.x0(),
            p.v0()
        );
        let _ = writeln!(out, "Damping: {} (d = {:.4})", self.case_label, self.discriminant);
        let _ = writeln!(out, "General form: {}", self.case.general_form());
        let _ = writeln!(out, "Solution: {}", self.expression);
        let _ = writeln!(out);
        let _ = writeln!(out, "Diagnostics:");
        let _ = writeln!(out, "  Max |x|:           {:.6} m", d.max_abs_displacement);
        let _ = writeln!(out, "  Mean |x|:          {:.6} m", d.mean_abs_displacement);
        let _ = writeln!(out, "  Final x:           {:.6e} m", d.final_displacement);
        let _ = writeln!(
            out,
            "  Oscillations:      {} (approx., {} sign changes)",
            d.zero_crossing_count, d.sign_changes
        );
        let _ = writeln!(out, "  Initial energy:    {:.6} J", d.initial_energy);
        match (d.frequency, d.period) {
            (Some(f), Some(t)) => {
                let _ = writeln!(out, "  Frequency:         {:.6} Hz", f);
                let _ = writeln!(out, "  Period:            {:.6} s", t);
            }
            _ => {
                let _ = writeln!(out, "  Frequency:         n/a (not oscillatory)");
            }
        }
        let _ = writeln!(out, "  Energy loss:       {}", self.energy_loss_note);
        let _ = write!(out, "Fingerprint: {}", self.fingerprint);
        out
    }
}

/// CSV of the sampled trajectory, optionally with the analytic velocity.
pub fn series_csv(analysis: &Analysis, include_velocity: bool) -> String {
    let mut csv = if include_velocity {
        String::from("time_s,displacement_m,velocity_m_s\n")
    } else {
        String::from("time_s,displacement_m\n")
    };
    for s in analysis.trajectory.samples() {
        if include_velocity {
            let _ = writeln!(csv, "{},{},{}", s.t, s.x, analysis.solution.velocity(s.t));
        } else {
            let _ = writeln!(csv, "{},{}", s.t, s.x);
        }
    }
    csv
}

/// Write to a file, or print to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> AppResult<()> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
