use clap::{Args, Parser, Subcommand};
use osc_app::{
    AnalysisConfig, AnalysisReport, AppError, AppResult, ParameterDef, SweepDefinition,
    SweepOutcome, SweepParameter, SweepSpacing, analyze, get_scenario, list_scenarios,
    load_library, run_sweep, series_csv, validate_library, write_output,
};
use osc_model::SignPolicy;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "osc-cli")]
#[command(about = "Damped oscillator CLI - closed-form response and diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify, solve and summarize one parameter set
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Include the sampled trajectory in the JSON report
        #[arg(long, requires = "json")]
        trajectory: bool,
    },
    /// Vary one parameter over a range and summarize each point
    Sweep {
        #[command(flatten)]
        input: InputArgs,
        /// Parameter to sweep (mass|damping|stiffness|x0|v0, or m|c|k)
        #[arg(long)]
        parameter: SweepParameter,
        /// First sweep value
        #[arg(long, allow_negative_numbers = true)]
        start: f64,
        /// Last sweep value
        #[arg(long, allow_negative_numbers = true)]
        end: f64,
        /// Number of sweep points
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Logarithmic spacing instead of linear
        #[arg(long)]
        log: bool,
        /// Print the sweep result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the sampled trajectory as CSV
    ExportSeries {
        #[command(flatten)]
        input: InputArgs,
        /// Add the analytic velocity column
        #[arg(long)]
        velocity: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate scenario file syntax and parameters
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// List scenarios in a file
    Scenarios {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
}

/// Parameter set and analysis settings. Flags override scenario values.
#[derive(Args)]
struct InputArgs {
    /// Scenario YAML/JSON file to start from
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Scenario name within the file (required when it holds several)
    #[arg(short, long, requires = "scenario")]
    name: Option<String>,
    /// Mass m (kg)
    #[arg(long, allow_negative_numbers = true)]
    mass: Option<f64>,
    /// Damping coefficient c (N·s/m)
    #[arg(long, allow_negative_numbers = true)]
    damping: Option<f64>,
    /// Spring constant k (N/m)
    #[arg(long, allow_negative_numbers = true)]
    stiffness: Option<f64>,
    /// Initial displacement x(0) (m)
    #[arg(long, allow_negative_numbers = true)]
    x0: Option<f64>,
    /// Initial velocity x'(0) (m/s)
    #[arg(long, allow_negative_numbers = true)]
    v0: Option<f64>,
    /// Simulated duration (s)
    #[arg(long)]
    duration: Option<f64>,
    /// Number of trajectory samples
    #[arg(long)]
    samples: Option<usize>,
    /// Relative width of the critical-damping band
    #[arg(long)]
    critical_tol: Option<f64>,
    /// Accept negative damping or stiffness
    #[arg(long)]
    allow_negative: bool,
}

/// Resolved input: scenario name (if any), parameters and configuration.
struct ResolvedInput {
    name: Option<String>,
    parameters: ParameterDef,
    config: AnalysisConfig,
}

impl InputArgs {
    fn resolve(&self) -> AppResult<ResolvedInput> {
        let (name, mut parameters, mut config) = match &self.scenario {
            Some(path) => {
                let library = load_library(path)?;
                let scenario = match &self.name {
                    Some(name) => get_scenario(&library, name)?,
                    None if library.scenarios.len() == 1 => &library.scenarios[0],
                    None => {
                        return Err(AppError::InvalidInput(format!(
                            "{} holds {} scenarios; pick one with --name",
                            path.display(),
                            library.scenarios.len()
                        )));
                    }
                };
                (
                    Some(scenario.name.clone()),
                    scenario.parameters,
                    scenario.config,
                )
            }
            None => (None, ParameterDef::default(), AnalysisConfig::default()),
        };

        if let Some(v) = self.mass {
            parameters.mass = v;
        }
        if let Some(v) = self.damping {
            parameters.damping = v;
        }
        if let Some(v) = self.stiffness {
            parameters.stiffness = v;
        }
        if let Some(v) = self.x0 {
            parameters.x0 = v;
        }
        if let Some(v) = self.v0 {
            parameters.v0 = v;
        }
        if let Some(v) = self.duration {
            config.duration_s = v;
        }
        if let Some(v) = self.samples {
            config.samples = v;
        }
        if let Some(v) = self.critical_tol {
            config.critical_rel_tol = v;
        }
        if self.allow_negative {
            config.sign_policy = SignPolicy::Allow;
        }
        tracing::debug!(scenario = ?name, ?parameters, "resolved input");

        Ok(ResolvedInput {
            name,
            parameters,
            config,
        })
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            json,
            trajectory,
        } => cmd_analyze(&input, json, trajectory),
        Commands::Sweep {
            input,
            parameter,
            start,
            end,
            points,
            log,
            json,
        } => {
            let spacing = if log {
                SweepSpacing::Logarithmic
            } else {
                SweepSpacing::Linear
            };
            let sweep = SweepDefinition::new(parameter, start, end, points, spacing)?;
            cmd_sweep(&input, &sweep, json)
        }
        Commands::ExportSeries {
            input,
            velocity,
            output,
        } => cmd_export_series(&input, velocity, output.as_deref()),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Scenarios { scenario_path } => cmd_scenarios(&scenario_path),
    }
}

fn cmd_analyze(input: &InputArgs, json: bool, include_trajectory: bool) -> AppResult<()> {
    let resolved = input.resolve()?;
    let analysis = analyze(&resolved.parameters, &resolved.config)?;
    let report =
        AnalysisReport::from_analysis(&analysis, resolved.name.as_deref(), include_trajectory);

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}

fn cmd_sweep(input: &InputArgs, sweep: &SweepDefinition, json: bool) -> AppResult<()> {
    let resolved = input.resolve()?;
    let result = run_sweep(&resolved.parameters, &resolved.config, sweep)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", sweep);
    println!(
        "{:>14}  {:<18} {:>12} {:>12} {:>12}",
        sweep.parameter, "regime", "oscillations", "max |x|", "freq (Hz)"
    );
    for point in &result.points {
        match &point.outcome {
            SweepOutcome::Ok { case, diagnostics } => {
                let freq = diagnostics
                    .frequency
                    .map(|f| format!("{:.4}", f))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>14.6}  {:<18} {:>12} {:>12.6} {:>12}",
                    point.value,
                    case.label(),
                    diagnostics.zero_crossing_count,
                    diagnostics.max_abs_displacement,
                    freq
                );
            }
            SweepOutcome::Failed { error } => {
                println!("{:>14.6}  failed: {}", point.value, error);
            }
        }
    }

    println!(
        "\n{} points ({} failed)",
        result.points.len(),
        result.num_failed()
    );
    for (value, case) in result.regime_changes() {
        println!("  regime change to {} at {} = {}", case, sweep.parameter, value);
    }
    Ok(())
}

fn cmd_export_series(input: &InputArgs, velocity: bool, output: Option<&Path>) -> AppResult<()> {
    let resolved = input.resolve()?;
    let analysis = analyze(&resolved.parameters, &resolved.config)?;
    let csv = series_csv(&analysis, velocity);

    write_output(output, &csv)?;
    if let Some(path) = output {
        println!(
            "✓ Exported {} data points to {}",
            analysis.trajectory.len(),
            path.display()
        );
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenarios: {}", scenario_path.display());
    let library = load_library(scenario_path)?;
    validate_library(&library)?;
    println!("✓ {} scenario(s) valid", library.scenarios.len());
    Ok(())
}

fn cmd_scenarios(scenario_path: &Path) -> AppResult<()> {
    let library = load_library(scenario_path)?;
    let scenarios = list_scenarios(&library);

    println!("Scenarios in {}:", scenario_path.display());
    for s in scenarios {
        let p = s.parameters;
        println!(
            "  {} - m={} c={} k={} x0={} v0={} ({} s, {} samples)",
            s.name, p.mass, p.damping, p.stiffness, p.x0, p.v0, s.duration_s, s.samples
        );
        if let Some(desc) = s.description {
            println!("      {}", desc);
        }
    }
    Ok(())
}
