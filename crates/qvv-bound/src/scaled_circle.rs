use glam::{DMat2, DVec2};

use crate::{BoundTolerances, PlanarBound};

/// Largest displacement of a unit circle point under a scale then a rotation.
///
/// The point `(x, y)` is scaled by `(sx, sy)`, rotated by `theta` radians and
/// compared with itself. Substituting `y = ±sqrt(1 - x^2)` in the squared
/// distance and clearing the radical from its derivative leaves a biquadratic in
/// `x`, so there are at most four interior critical points. They are evaluated
/// together with `x = ±1`, for both signs of `y`.
///
/// When the biquadratic degenerates (every point moves by the same amount, as with
/// `sx == sy`) only `x = ±1` is evaluated.
///
/// Example:
///
/// ```
/// use qvv_bound::scaled_circle_max;
///
/// let result = scaled_circle_max((-90f64).to_radians(), 3.0, 1.0);
/// assert!((result.bound - (1.0 + 5f64.sqrt())).abs() < 1e-9);
/// ```
pub fn scaled_circle_max(theta: f64, sx: f64, sy: f64) -> PlanarBound {
    scaled_circle_max_with(theta, sx, sy, &BoundTolerances::default())
}

/// [`scaled_circle_max`] with explicit tolerances.
pub fn scaled_circle_max_with(
    theta: f64,
    sx: f64,
    sy: f64,
    tolerances: &BoundTolerances,
) -> PlanarBound {
    let linear =
        DMat2::from_angle(theta) * DMat2::from_diagonal(DVec2::new(sx, sy)) - DMat2::IDENTITY;

    // f(x, y) = a11 x^2 + 2 a12 x y + a22 y^2
    let a11 = linear.x_axis.length_squared();
    let a22 = linear.y_axis.length_squared();
    let a12 = linear.x_axis.dot(linear.y_axis);

    // critical points: (W) x^4 - (W) x^2 + a12^2 = 0, with W = (a11 - a22)^2 + 4 a12^2
    let diff = a11 - a22;
    let w = diff * diff + 4.0 * a12 * a12;
    let trace = a11 + a22;

    let mut candidates = Vec::with_capacity(6);
    if w > tolerances.singularity * trace * trace && w > 0.0 {
        let root = (diff.abs() / w.sqrt()).min(1.0);
        let x_far = (0.5 * (1.0 + root)).sqrt();
        let x_near = (0.5 * (1.0 - root)).sqrt();
        candidates.extend([-x_far, x_far, -x_near, x_near]);
    } else {
        log::debug!(
            "scaled circle denominator vanishes for theta={theta} scale=({sx}, {sy}), \
             evaluating x = -1, 1 only"
        );
    }
    candidates.extend([-1.0, 1.0]);

    let error_sq = |point: DVec2| (linear * point).length_squared();

    let mut best_point = DVec2::new(candidates[0], 0.0);
    let mut best_error_sq = f64::NEG_INFINITY;
    for x in candidates {
        let y = (1.0 - x * x).max(0.0).sqrt();
        for point in [DVec2::new(x, y), DVec2::new(x, -y)] {
            let candidate_sq = error_sq(point);
            log::trace!("scaled circle candidate {point:?} error_sq={candidate_sq}");
            if candidate_sq > best_error_sq {
                best_point = point;
                best_error_sq = candidate_sq;
            }
        }
    }

    PlanarBound {
        bound: best_error_sq.max(0.0).sqrt(),
        point: best_point,
    }
}
