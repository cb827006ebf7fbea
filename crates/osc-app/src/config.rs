//! Analysis configuration.

use osc_core::numeric::{Real, Tolerances};
use osc_model::{
    DEFAULT_CRITICAL_REL_TOL, DEFAULT_DURATION_S, DEFAULT_SAMPLE_COUNT, SignPolicy, TimeDomain,
    critical_band,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// How a scenario is sampled and classified.
///
/// Every field has a default, so scenario files may omit the whole block or
/// any part of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Simulated time span (seconds)
    pub duration_s: Real,
    /// Number of trajectory samples
    pub samples: usize,
    /// Relative width of the critical-damping band around `d = 0`
    pub critical_rel_tol: Real,
    /// Treatment of negative damping or stiffness
    pub sign_policy: SignPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            duration_s: DEFAULT_DURATION_S,
            samples: DEFAULT_SAMPLE_COUNT,
            critical_rel_tol: DEFAULT_CRITICAL_REL_TOL,
            sign_policy: SignPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(AppError::Validation(format!(
                "duration_s must be positive and finite (got {})",
                self.duration_s
            )));
        }
        if self.samples < 2 {
            return Err(AppError::Validation(format!(
                "samples must be at least 2 (got {})",
                self.samples
            )));
        }
        if !(self.critical_rel_tol.is_finite() && self.critical_rel_tol >= 0.0) {
            return Err(AppError::Validation(format!(
                "critical_rel_tol must be non-negative and finite (got {})",
                self.critical_rel_tol
            )));
        }
        Ok(())
    }

    pub fn time_domain(&self) -> AppResult<TimeDomain> {
        Ok(TimeDomain::new(self.duration_s)?)
    }

    pub fn critical_band(&self) -> Tolerances {
        critical_band(self.critical_rel_tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presentation_defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.duration_s, 10.0);
        assert_eq!(cfg.samples, 1000);
        assert_eq!(cfg.critical_rel_tol, 1e-9);
        assert_eq!(cfg.sign_policy, SignPolicy::Reject);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: AnalysisConfig = serde_yaml::from_str("samples: 500\nsign_policy: allow\n").unwrap();
        assert_eq!(cfg.samples, 500);
        assert_eq!(cfg.sign_policy, SignPolicy::Allow);
        assert_eq!(cfg.duration_s, 10.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            AnalysisConfig {
                duration_s: 0.0,
                ..Default::default()
            },
            AnalysisConfig {
                samples: 1,
                ..Default::default()
            },
            AnalysisConfig {
                critical_rel_tol: -1.0,
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(AppError::Validation(_))));
        }
    }
}
