//! Sample lattices and empirical error evaluation.
//!
//! None of the bound solvers depend on these; they exist to cross-check bounds
//! against dense point sets and to feed error visualizations.

use std::f64::consts::PI;

use glam::DVec3;
use rayon::prelude::*;

use crate::{point_error, point_error_delta, DeltaTransform, Transform};

/// Errors within this range of each other are displayed as one flat value.
const FLAT_RANGE: f64 = 1e-6;

/// `n` points on the unit sphere, spread along a Fibonacci spiral.
///
/// The points run from the `-Y` pole to the `+Y` pole.
pub fn fibonacci_sphere(n: usize) -> Vec<DVec3> {
    (0..n).map(|i| fibonacci_point(i, n)).collect()
}

/// `n` points on the unit circle in the XY plane.
///
/// The sphere lattice with its Z component dropped and renormalized, so the points
/// are denser towards the `±Y` axis.
pub fn fibonacci_circle(n: usize) -> Vec<DVec3> {
    (0..n)
        .map(|i| {
            let p = fibonacci_point(i, n);
            DVec3::new(p.x, p.y, 0.0).normalize_or(DVec3::Y * p.y.signum())
        })
        .collect()
}

fn fibonacci_point(i: usize, n: usize) -> DVec3 {
    let offset = 2.0 / n as f64;
    let increment = PI * (3.0 - 5f64.sqrt());

    let y = i as f64 * offset - 1.0 + offset / 2.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let (sin_phi, cos_phi) = (i as f64 * increment).sin_cos();

    DVec3::new(cos_phi * r, y, sin_phi * r)
}

/// The error of every point between `raw` and `lossy`, in input order.
pub fn evaluate_sample_set(points: &[DVec3], raw: &Transform, lossy: &Transform) -> Vec<f64> {
    points
        .par_iter()
        .map(|p| point_error(*p, raw, lossy))
        .collect()
}

/// The error of every point under a composed delta, in input order.
pub fn evaluate_sample_set_delta(points: &[DVec3], delta: &DeltaTransform) -> Vec<f64> {
    points
        .par_iter()
        .map(|p| point_error_delta(*p, delta))
        .collect()
}

/// Range of a set of sampled errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSummary {
    /// Smallest error.
    pub min: f64,
    /// Largest error.
    pub max: f64,
    /// Index of the first sample reaching `max`.
    pub worst_index: usize,
}

impl ErrorSummary {
    /// Summarize a set of errors. `None` if it is empty or contains NaN.
    pub fn from_errors(errors: &[f64]) -> Option<Self> {
        let (&first, rest) = errors.split_first()?;
        if first.is_nan() {
            return None;
        }

        let mut summary = Self {
            min: first,
            max: first,
            worst_index: 0,
        };
        for (i, &error) in rest.iter().enumerate() {
            if error.is_nan() {
                return None;
            }
            summary.min = summary.min.min(error);
            if error > summary.max {
                summary.max = error;
                summary.worst_index = i + 1;
            }
        }
        Some(summary)
    }

    /// Map errors to `[0, 1]` over the summarized range.
    ///
    /// A range narrower than `1e-6` is widened to `[0, 2]`, so nearly constant errors
    /// do not blow up to the full scale.
    pub fn normalized(&self, errors: &[f64]) -> Vec<f64> {
        let (min, max) = if self.max - self.min < FLAT_RANGE {
            (0.0, 2.0)
        } else {
            (self.min, self.max)
        };
        let range = max - min;
        errors
            .iter()
            .map(|e| ((e - min) / range).clamp(0.0, 1.0))
            .collect()
    }
}
