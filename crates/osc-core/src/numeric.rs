use crate::CoreError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute/relative tolerance pair used for float comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// True when `v` lies within the tolerance band around zero, measured
/// relative to `scale` (the magnitude of the terms that produced `v`).
pub fn nearly_zero(v: Real, scale: Real, tol: Tolerances) -> bool {
    let mag = v.abs();
    mag <= tol.abs || mag <= tol.rel * scale.abs()
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// `n` evenly spaced values over `[start, end]`, endpoints exact.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut out: Vec<Real> = (0..n).map(|i| start + i as Real * step).collect();
            out[n - 1] = end;
            out
        }
    }
}
