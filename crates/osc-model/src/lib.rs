//! Closed-form response of a damped mass-spring oscillator.
//!
//! Provides:
//! - Physical parameters with an explicit sign policy
//! - Damping regime classification from the discriminant `c² − 4mk`
//! - Per-regime closed-form solutions fitted to `x(0)` and `x'(0)`
//! - Evenly spaced trajectory sampling
//! - Summary diagnostics over a sampled trajectory

pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod params;
pub mod solution;
pub mod trajectory;

pub use classify::{
    DEFAULT_CRITICAL_REL_TOL, DampingCase, classify, classify_exact,
    critical_band, discriminant,
};
pub use diagnostics::{Diagnostics, EnergyLoss, compute_diagnostics, count_sign_changes};
pub use error::{ModelError, ModelResult};
pub use params::{PhysicalParameters, SignPolicy};
pub use solution::{
    CriticalSolution, OverdampedSolution, Solution, UnderdampedSolution, build_solution, solve,
};
pub use trajectory::{
    DEFAULT_DURATION_S, DEFAULT_SAMPLE_COUNT, Sample, TimeDomain, Trajectory, sample,
};
