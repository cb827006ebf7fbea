//! Scenario files: loading, saving, validation and introspection.
//!
//! A scenario is a named parameter set plus its analysis configuration.
//! Files hold a [`ScenarioLibrary`]; YAML or JSON is picked from the file
//! extension. A file with a single top-level scenario is also accepted.

use std::path::Path;

use osc_core::numeric::Real;
use osc_model::{PhysicalParameters, SignPolicy};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};

pub const SCENARIO_VERSION: u32 = 1;

/// Raw oscillator parameters as written in a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Mass (kg)
    pub mass: Real,
    /// Damping coefficient (N·s/m)
    pub damping: Real,
    /// Spring constant (N/m)
    pub stiffness: Real,
    /// Initial displacement (m)
    #[serde(default)]
    pub x0: Real,
    /// Initial velocity (m/s)
    #[serde(default)]
    pub v0: Real,
}

impl Default for ParameterDef {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 10.0,
            stiffness: 100.0,
            x0: 1.0,
            v0: 0.0,
        }
    }
}

impl ParameterDef {
    pub fn to_parameters(&self, policy: SignPolicy) -> AppResult<PhysicalParameters> {
        Ok(PhysicalParameters::with_policy(
            self.mass,
            self.damping,
            self.stiffness,
            self.x0,
            self.v0,
            policy,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: ParameterDef,
    #[serde(default)]
    pub config: AnalysisConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, parameters: ParameterDef) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
            config: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLibrary {
    pub version: u32,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl ScenarioLibrary {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            version: SCENARIO_VERSION,
            scenarios,
        }
    }
}

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: Option<String>,
    pub parameters: ParameterDef,
    pub duration_s: Real,
    pub samples: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FileFormat {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
        _ => FileFormat::Yaml,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Library(ScenarioLibrary),
    Single(Scenario),
}

/// Parse scenario file contents in the given format.
fn parse_library(content: &str, format: FileFormat) -> AppResult<ScenarioLibrary> {
    let file: ScenarioFile = match format {
        FileFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| AppError::Scenario(format!("Failed to parse scenario YAML: {}", e)))?,
        FileFormat::Json => serde_json::from_str(content)
            .map_err(|e| AppError::Scenario(format!("Failed to parse scenario JSON: {}", e)))?,
    };
    Ok(match file {
        ScenarioFile::Library(lib) => lib,
        ScenarioFile::Single(scenario) => ScenarioLibrary::new(vec![scenario]),
    })
}

/// Load and validate a scenario library from YAML or JSON.
pub fn load_library(path: &Path) -> AppResult<ScenarioLibrary> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let library = parse_library(&content, format_for(path))?;
    validate_library(&library)?;
    tracing::debug!(
        path = %path.display(),
        scenarios = library.scenarios.len(),
        "loaded scenario library"
    );
    Ok(library)
}

/// Save a scenario library as YAML or JSON.
pub fn save_library(path: &Path, library: &ScenarioLibrary) -> AppResult<()> {
    validate_library(library)?;
    let content = match format_for(path) {
        FileFormat::Yaml => serde_yaml::to_string(library)
            .map_err(|e| AppError::Scenario(format!("Failed to serialize scenarios: {}", e)))?,
        FileFormat::Json => serde_json::to_string_pretty(library)?,
    };

    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Validate library structure, every configuration and every parameter set.
pub fn validate_library(library: &ScenarioLibrary) -> AppResult<()> {
    if library.version != SCENARIO_VERSION {
        return Err(AppError::Validation(format!(
            "Unsupported scenario version {} (expected {})",
            library.version, SCENARIO_VERSION
        )));
    }

    if library.scenarios.is_empty() {
        return Err(AppError::Validation(
            "Library must have at least one scenario".to_string(),
        ));
    }

    for (i, scenario) in library.scenarios.iter().enumerate() {
        if scenario.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Scenario #{} has an empty name",
                i + 1
            )));
        }
        if library.scenarios[..i]
            .iter()
            .any(|other| other.name == scenario.name)
        {
            return Err(AppError::Validation(format!(
                "Duplicate scenario name '{}'",
                scenario.name
            )));
        }
        scenario.config.validate().map_err(|e| {
            AppError::Validation(format!("Scenario '{}': {}", scenario.name, e))
        })?;
        scenario
            .parameters
            .to_parameters(scenario.config.sign_policy)
            .map_err(|e| AppError::Validation(format!("Scenario '{}': {}", scenario.name, e)))?;
    }

    Ok(())
}

/// List all scenarios with summaries.
pub fn list_scenarios(library: &ScenarioLibrary) -> Vec<ScenarioSummary> {
    library
        .scenarios
        .iter()
        .map(|s| ScenarioSummary {
            name: s.name.clone(),
            description: s.description.clone(),
            parameters: s.parameters,
            duration_s: s.config.duration_s,
            samples: s.config.samples,
        })
        .collect()
}

/// Get a specific scenario by name.
pub fn get_scenario<'a>(library: &'a ScenarioLibrary, name: &str) -> AppResult<&'a Scenario> {
    library
        .scenarios
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| AppError::ScenarioNotFound(name.to_string()))
}
