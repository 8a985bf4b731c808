use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DMat2, DVec2};

use crate::polynomial::solve_quartic;
use crate::{BoundTolerances, Transform};

/// Maximum error on the unit circle and the point reaching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBound {
    /// Largest distance over the unit circle.
    pub bound: f64,
    /// A unit circle point at which the distance equals `bound`.
    pub point: DVec2,
}

/// Number of evenly spaced angles tried for the substitution offset.
const OFFSET_CANDIDATES: usize = 16;

/// Number of Newton steps used to polish each critical angle.
const ANGLE_POLISH_STEPS: usize = 3;

/// Exact maximum of `|linear * p + offset|` over the unit circle.
///
/// With `p = (cos φ, sin φ)` the squared distance is a trigonometric polynomial of
/// degree two in φ. Its critical points are the real roots of a quartic in
/// `u = tan((φ - φ0) / 2)`, solved in closed form. The offset `φ0` is picked so
/// that the derivative is large at `φ0 + π`, which keeps every root of the quartic
/// at a moderate `u`. The maximum is taken among those roots and the four axis
/// points.
pub fn planar_affine_max(linear: DMat2, offset: DVec2) -> PlanarBound {
    planar_affine_max_with(linear, offset, &BoundTolerances::default())
}

/// [`planar_affine_max`] with explicit tolerances.
pub fn planar_affine_max_with(
    linear: DMat2,
    offset: DVec2,
    tolerances: &BoundTolerances,
) -> PlanarBound {
    let derivative = SquaredDistanceSlope::new(linear, offset);

    let roots = if derivative.size() <= tolerances.singularity * derivative.magnitude
        || derivative.size() == 0.0
    {
        // constant distance, or nearly so, over the whole circle
        log::debug!("planar derivative vanishes, evaluating axis points only");
        Vec::new()
    } else {
        let phi0 = (0..OFFSET_CANDIDATES)
            .map(|k| 2.0 * PI * k as f64 / OFFSET_CANDIDATES as f64)
            .fold((0.0, f64::NEG_INFINITY), |(best, largest), phi| {
                let value = derivative.value(phi + PI).abs();
                if value > largest {
                    (phi, value)
                } else {
                    (best, largest)
                }
            })
            .0;
        let [a, b, c, d, e] = derivative.quartic(phi0);
        solve_quartic(a, b, c, d, e)
            .into_iter()
            .map(|u| derivative.polish(phi0 + 2.0 * u.atan()))
            .collect()
    };

    let axis_angles = [0.0, FRAC_PI_2, PI, -FRAC_PI_2];
    let candidates = axis_angles.into_iter().chain(roots);

    let mut best: Option<PlanarBound> = None;
    for phi in candidates {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let point = DVec2::new(cos_phi, sin_phi);
        let bound = (linear * point + offset).length();
        log::trace!("planar candidate phi={phi} error={bound}");

        if best.map_or(true, |current| bound > current.bound) {
            best = Some(PlanarBound { bound, point });
        }
    }

    best.unwrap_or(PlanarBound {
        bound: offset.length(),
        point: DVec2::X,
    })
}

/// Half the derivative of `|N p(φ) + c|^2` in φ,
/// `-P sin 2φ + Q cos 2φ - b_x sin φ + b_y cos φ`.
#[derive(Debug, Clone, Copy)]
struct SquaredDistanceSlope {
    /// `P = (a11 - a22) / 2` with `A = N^T N`.
    half_diff: f64,
    /// `Q = a12`.
    cross: f64,
    /// `b = N^T c`.
    linear_term: DVec2,
    /// `trace(A) + |b|`, the scale the singularity test is relative to.
    magnitude: f64,
}

impl SquaredDistanceSlope {
    fn new(linear: DMat2, offset: DVec2) -> Self {
        // |N p + c|^2 = p^T A p + 2 (N^T c) . p + |c|^2 with A = N^T N
        let a11 = linear.x_axis.length_squared();
        let a22 = linear.y_axis.length_squared();
        let linear_term = linear.transpose() * offset;
        Self {
            half_diff: 0.5 * (a11 - a22),
            cross: linear.x_axis.dot(linear.y_axis),
            linear_term,
            magnitude: a11 + a22 + linear_term.length(),
        }
    }

    fn size(&self) -> f64 {
        self.half_diff.abs() + self.cross.abs() + self.linear_term.length()
    }

    fn value(&self, phi: f64) -> f64 {
        let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        -self.half_diff * sin_2phi + self.cross * cos_2phi - self.linear_term.x * sin_phi
            + self.linear_term.y * cos_phi
    }

    fn slope(&self, phi: f64) -> f64 {
        let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        -2.0 * self.half_diff * cos_2phi
            - 2.0 * self.cross * sin_2phi
            - self.linear_term.x * cos_phi
            - self.linear_term.y * sin_phi
    }

    /// Quartic in `u = tan((φ - phi0) / 2)` whose roots are the critical angles,
    /// highest degree first. Its leading coefficient is `value(phi0 + π)`.
    fn quartic(&self, phi0: f64) -> [f64; 5] {
        // same slope written in ψ = φ - phi0
        let (sin_2phi0, cos_2phi0) = (2.0 * phi0).sin_cos();
        let (sin_phi0, cos_phi0) = phi0.sin_cos();
        let p = self.half_diff * cos_2phi0 + self.cross * sin_2phi0;
        let q = self.cross * cos_2phi0 - self.half_diff * sin_2phi0;
        let bx = self.linear_term.x * cos_phi0 + self.linear_term.y * sin_phi0;
        let by = self.linear_term.y * cos_phi0 - self.linear_term.x * sin_phi0;

        // slope times (1 + u^2)^2
        [
            q - by,
            4.0 * p - 2.0 * bx,
            -6.0 * q,
            -4.0 * p - 2.0 * bx,
            q + by,
        ]
    }

    /// Newton steps on the slope, kept only while they reduce it.
    fn polish(&self, mut phi: f64) -> f64 {
        for _ in 0..ANGLE_POLISH_STEPS {
            let value = self.value(phi);
            let slope = self.slope(phi);
            if value == 0.0 || slope == 0.0 {
                break;
            }
            let next = phi - value / slope;
            if !next.is_finite() || self.value(next).abs() >= value.abs() {
                break;
            }
            phi = next;
        }
        phi
    }
}

/// Exact maximum error between two planar transforms over the unit circle.
///
/// Both transforms must rotate about Z; their Z components are ignored. Any scales,
/// including non-uniform, negative or zero ones, are supported.
pub fn planar_pair_max(raw: &Transform, lossy: &Transform) -> PlanarBound {
    let (linear, offset) = planar_pair_linear(raw, lossy);
    planar_affine_max(linear, offset)
}

/// `lossy(p) - raw(p)` in raw's frame, as a linear map plus an offset.
pub(crate) fn planar_pair_linear(raw: &Transform, lossy: &Transform) -> (DMat2, DVec2) {
    let raw_angle = raw.planar_angle();
    let delta_angle = lossy.planar_angle() - raw_angle;

    let linear = DMat2::from_angle(delta_angle) * DMat2::from_diagonal(lossy.planar_scale())
        - DMat2::from_diagonal(raw.planar_scale());
    let offset =
        DMat2::from_angle(-raw_angle) * (lossy.translation - raw.translation).truncate();

    (linear, offset)
}
