//! Shared application service layer for the damped oscillator workspace.
//!
//! Centralizes scenario files, analysis configuration, the
//! classify → fit → sample → diagnose pipeline, parameter sweeps and
//! report/series export for the CLI.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scenario;
pub mod sweep;

// Re-export key types for convenience
pub use config::AnalysisConfig;
pub use error::{AppError, AppResult};
pub use pipeline::{Analysis, analyze, analyze_scenario};
pub use report::{AnalysisReport, fingerprint, series_csv, write_output};
pub use scenario::{
    ParameterDef, SCENARIO_VERSION, Scenario, ScenarioLibrary, ScenarioSummary, get_scenario,
    list_scenarios, load_library, save_library, validate_library,
};
pub use sweep::{
    SweepDefinition, SweepOutcome, SweepParameter, SweepPoint, SweepResult, SweepSpacing,
    run_sweep,
};
