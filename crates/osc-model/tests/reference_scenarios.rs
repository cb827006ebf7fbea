//! Integration test: the classify → fit → sample → diagnose chain on the
//! reference parameter sets (m = 1, k = 100, x0 = 1, v0 = 0, c varied).

use osc_core::{Tolerances, nearly_equal};
use osc_model::{
    DEFAULT_CRITICAL_REL_TOL, DEFAULT_SAMPLE_COUNT, DampingCase, PhysicalParameters, Solution,
    TimeDomain, classify, compute_diagnostics, critical_band, sample, solve,
};

fn reference(c: f64) -> PhysicalParameters {
    PhysicalParameters::new(1.0, c, 100.0, 1.0, 0.0).unwrap()
}

#[test]
fn underdamped_reference() {
    let p = reference(10.0);
    let band = critical_band(DEFAULT_CRITICAL_REL_TOL);
    assert_eq!(classify(&p, band), DampingCase::Underdamped);

    let sol = solve(&p, band).unwrap();
    let traj = sample(&sol, TimeDomain::default(), DEFAULT_SAMPLE_COUNT).unwrap();
    let diag = compute_diagnostics(&p, &sol, &traj).unwrap();

    assert_eq!(traj.len(), DEFAULT_SAMPLE_COUNT);
    assert_eq!(diag.initial_energy, 50.0);
    // ω ≈ 8.66 rad/s → f ≈ 1.378 Hz
    assert!((diag.frequency.unwrap() - 1.3783).abs() < 1e-3);
    assert!((diag.period.unwrap() - 0.7255).abs() < 1e-3);
    // envelope e^(−5t) is below 1e-15 after ~7 s, so crossings happen early
    assert!(diag.sign_changes >= 2);
}

#[test]
fn critical_reference_matches_closed_form() {
    let p = reference(20.0);
    let sol = solve(&p, critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
    assert_eq!(sol.case(), DampingCase::Critical);

    let traj = sample(&sol, TimeDomain::new(2.0).unwrap(), 201).unwrap();
    let tol = Tolerances {
        abs: 1e-15,
        rel: 1e-12,
    };
    for s in traj.samples() {
        let expected = (1.0 + 10.0 * s.t) * (-10.0 * s.t).exp();
        assert!(nearly_equal(s.x, expected, tol), "t={} x={}", s.t, s.x);
    }

    let diag = compute_diagnostics(&p, &sol, &traj).unwrap();
    assert_eq!(diag.zero_crossing_count, 0);
    assert!(diag.frequency.is_none());
}

#[test]
fn overdamped_reference_roots() {
    let p = reference(30.0);
    let sol = solve(&p, critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
    match sol {
        Solution::Overdamped(s) => {
            assert!((s.lambda1 + 3.8197).abs() < 1e-4);
            assert!((s.lambda2 + 26.1803).abs() < 1e-4);
            assert!((s.lambda1 + s.lambda2 + 30.0).abs() < 1e-12);
            assert!((s.lambda1 * s.lambda2 - 100.0).abs() < 1e-9);
        }
        other => panic!("expected overdamped, got {other:?}"),
    }
}

#[test]
fn velocity_is_derivative_of_displacement() {
    let h = 1e-6;
    for c in [10.0, 20.0, 30.0] {
        let sol = solve(&reference(c), critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
        for t in [0.05, 0.2, 0.7] {
            let numeric = (sol.displacement(t + h) - sol.displacement(t - h)) / (2.0 * h);
            assert!(
                (numeric - sol.velocity(t)).abs() < 1e-5,
                "c={c} t={t}: {numeric} vs {}",
                sol.velocity(t)
            );
        }
    }
}

#[test]
fn solution_serializes_with_case_tag() {
    let sol = solve(&reference(20.0), critical_band(DEFAULT_CRITICAL_REL_TOL)).unwrap();
    let json = serde_json::to_value(sol).unwrap();
    assert_eq!(json["case"], "critical");
    assert_eq!(json["lambda"], -10.0);
}
